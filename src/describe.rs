//! Per-region details for the hover info panel and data table.
use crate::keys::{derive_fips, first_key_value, normalize, pad_fips};
use crate::legend::color_for;
use crate::numbers::{format_one_decimal, parse_leading_number};
use crate::states::{series_of, value_for_year};
use crate::stats::COUNTY_DATA_YEAR;
use geojson::{Feature, FeatureCollection, JsonValue};

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub region: String,
    pub label: String,
    pub value: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionDescription {
    pub title: String,
    pub headline: String,
    pub caption: String,
    pub color: &'static str,
    pub rows: Vec<TableRow>,
}

fn text(feature: &Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn find_state<'a>(
    states: &'a FeatureCollection,
    name: &str,
    name_keys: &[String],
) -> Option<&'a Feature> {
    let wanted = normalize(name);
    states.features.iter().find(|f| {
        first_key_value(f, name_keys).is_some_and(|n| normalize(&n) == wanted)
    })
}

/// Accepts a bare (`1001`, `01001`) or census-prefixed FIPS code.
pub fn find_county<'a>(
    counties: &'a FeatureCollection,
    fips: &str,
    id_keys: &[String],
) -> Option<&'a Feature> {
    let wanted = pad_fips(&derive_fips(fips.trim()));
    counties.features.iter().find(|f| {
        first_key_value(f, id_keys).is_some_and(|id| derive_fips(&id) == wanted)
    })
}

pub fn describe_state(feature: &Feature, year: i32, name_keys: &[String]) -> RegionDescription {
    let name = first_key_value(feature, name_keys).unwrap_or_else(|| "UNKNOWN".to_string());
    let value = value_for_year(feature, year);
    let value_text = value.map(format_one_decimal).unwrap_or_else(|| "N/A".to_string());

    let rows = series_of(feature)
        .unwrap_or_default()
        .into_iter()
        .map(|point| TableRow {
            region: name.clone(),
            label: point.year.to_string(),
            value: format_one_decimal(point.value),
            highlighted: point.year == year,
        })
        .collect();

    RegionDescription {
        headline: format!("{}% of adults in {}", value_text, year),
        caption: format!("{} diabetes prevalence over time", name),
        color: color_for(value.unwrap_or(0.0)),
        title: name,
        rows,
    }
}

/// `None` when the feature carries no county statistics.
pub fn describe_county(feature: &Feature) -> Option<RegionDescription> {
    let county = text(feature, "county")?;
    let state = text(feature, "state").unwrap_or_default();
    let percent = text(feature, "diabetesPercent");
    let parsed = percent.as_deref().and_then(parse_leading_number);

    let row = |label: &str, value: Option<String>, highlighted: bool| TableRow {
        region: county.clone(),
        label: label.to_string(),
        value: value.unwrap_or_default(),
        highlighted,
    };

    let mut rows = vec![
        row("Overall", percent.clone(), true),
        row("Men", text(feature, "menDiabetesPercent"), false),
        row("Women", text(feature, "womenDiabetesPercent"), false),
    ];

    let men_obese = text(feature, "menObesePercent").filter(|v| !v.is_empty());
    let women_obese = text(feature, "womenObesePercent").filter(|v| !v.is_empty());
    if men_obese.is_some() && women_obese.is_some() {
        rows.push(row("Obesity (Men)", men_obese, false));
        rows.push(row("Obesity (Women)", women_obese, false));
    }

    Some(RegionDescription {
        title: format!("{}, {}", county, state),
        headline: format!(
            "{}% of adults",
            parsed.map(format_one_decimal).unwrap_or_else(|| "N/A".to_string())
        ),
        caption: format!("County Data ({}): {}, {} diabetes statistics", COUNTY_DATA_YEAR, county, state),
        color: color_for(parsed.unwrap_or(0.0)),
        rows,
    })
}
