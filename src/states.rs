//! State boundary + yearly series merge.
use crate::keys::{first_key_value, normalize};
use crate::types::{YearValue, PLACEHOLDER_SERIES};
use geojson::{Feature, FeatureCollection, JsonValue};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

pub const DIABETES_PROPERTY: &str = "diabetes";

/// State name -> series, in source order. Re-inserting a name replaces the
/// earlier series in place.
#[derive(Debug, Clone, Default)]
pub struct SeriesTable {
    entries: Vec<(String, Vec<YearValue>)>,
    index: HashMap<String, usize>,
}

/// How a boundary name resolved against a `SeriesTable`.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesMatch<'a> {
    Exact {
        key: &'a str,
        series: &'a [YearValue],
    },
    /// Matched only after normalization. `ambiguous` is set when several
    /// distinct keys normalize to the same name; the first in source order wins.
    CaseInsensitive {
        key: &'a str,
        series: &'a [YearValue],
        ambiguous: bool,
    },
    Missing,
}

impl SeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, series: Vec<YearValue>) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = series,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, series));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[YearValue]> {
        self.index.get(name).map(|&i| self.entries[i].1.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, name: &str) -> SeriesMatch<'_> {
        if let Some(&i) = self.index.get(name) {
            let (key, series) = &self.entries[i];
            return SeriesMatch::Exact { key, series };
        }

        let wanted = normalize(name);
        let mut hits = self.entries.iter().filter(|(k, _)| normalize(k) == wanted);
        match hits.next() {
            Some((key, series)) => SeriesMatch::CaseInsensitive {
                key,
                series,
                ambiguous: hits.next().is_some(),
            },
            None => SeriesMatch::Missing,
        }
    }

    /// Builds the table from the state series GeoJSON, which carries
    /// `properties.NAME` and `properties.diabetes` (`[{year, value}, ...]`).
    pub fn from_collection(collection: &FeatureCollection) -> Self {
        let mut table = SeriesTable::new();
        for feature in &collection.features {
            let name = match feature.property("NAME").and_then(JsonValue::as_str) {
                Some(n) => n.to_string(),
                None => {
                    warn!("Series feature without a NAME property, skipping");
                    continue;
                }
            };
            match series_of(feature) {
                Some(series) if !series.is_empty() => table.insert(name, series),
                Some(_) => warn!("Empty diabetes series for {}, skipping", name),
                None => warn!("Unreadable diabetes series for {}, skipping", name),
            }
        }
        table
    }
}

impl FromIterator<(String, Vec<YearValue>)> for SeriesTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<YearValue>)>>(iter: I) -> Self {
        let mut table = SeriesTable::new();
        for (name, series) in iter {
            table.insert(name, series);
        }
        table
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateMatch {
    pub name: String,
    pub alias: Option<String>, // series key, when it differs from `name`
    pub ambiguous: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateMergeReport {
    pub matched: Vec<StateMatch>,
    pub unmatched: Vec<String>,
    pub unused_series: Vec<String>,
}

impl StateMergeReport {
    pub fn log(&self) {
        info!(
            "State merge: {} matched, {} unmatched, {} unused series",
            self.matched.len(),
            self.unmatched.len(),
            self.unused_series.len()
        );
        for m in &self.matched {
            match (&m.alias, m.ambiguous) {
                (Some(alias), true) => warn!("{} matched {} but the name is ambiguous", m.name, alias),
                (Some(alias), false) => debug!("{} matched as {}", m.name, alias),
                (None, _) => debug!("{} matched", m.name),
            }
        }
        for name in &self.unmatched {
            warn!("No diabetes data for state: {}", name);
        }
        for key in &self.unused_series {
            warn!("Diabetes series never used: {}", key);
        }
    }
}

/// Attaches a `diabetes` series to every boundary feature. Features without
/// a usable name or without a matching series get `PLACEHOLDER_SERIES`.
pub fn merge(
    mut boundaries: FeatureCollection,
    series: &SeriesTable,
    name_keys: &[String],
) -> (FeatureCollection, StateMergeReport) {
    let mut report = StateMergeReport::default();
    let mut consumed: HashSet<String> = HashSet::new();

    for feature in boundaries.features.iter_mut() {
        let Some(name) = first_key_value(feature, name_keys) else {
            report.unmatched.push("UNKNOWN".to_string());
            feature.set_property(DIABETES_PROPERTY, series_to_json(&PLACEHOLDER_SERIES));
            continue;
        };

        let (key, values, ambiguous) = match series.find(&name) {
            SeriesMatch::Exact { key, series } => (key, series, false),
            SeriesMatch::CaseInsensitive { key, series, ambiguous } => (key, series, ambiguous),
            SeriesMatch::Missing => {
                report.unmatched.push(name);
                feature.set_property(DIABETES_PROPERTY, series_to_json(&PLACEHOLDER_SERIES));
                continue;
            }
        };

        if values.is_empty() {
            report.unmatched.push(name);
            feature.set_property(DIABETES_PROPERTY, series_to_json(&PLACEHOLDER_SERIES));
            continue;
        }

        feature.set_property(DIABETES_PROPERTY, series_to_json(values));
        consumed.insert(key.to_string());
        report.matched.push(StateMatch {
            alias: (key != name).then(|| key.to_string()),
            name,
            ambiguous,
        });
    }

    report.unused_series = series
        .keys()
        .filter(|k| !consumed.contains(*k))
        .map(str::to_string)
        .collect();

    (boundaries, report)
}

pub fn series_to_json(series: &[YearValue]) -> JsonValue {
    JsonValue::Array(
        series
            .iter()
            .map(|p| json!({ "year": p.year, "value": p.value }))
            .collect(),
    )
}

/// Reads the `diabetes` property back out of a feature.
pub fn series_of(feature: &Feature) -> Option<Vec<YearValue>> {
    let value = feature.property(DIABETES_PROPERTY)?;
    serde_json::from_value(value.clone()).ok()
}

pub fn value_for_year(feature: &Feature, year: i32) -> Option<f64> {
    series_of(feature)?
        .into_iter()
        .find(|p| p.year == year)
        .map(|p| p.value)
}
