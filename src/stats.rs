//! National summary statistics for the state and county views.
use crate::counties::DIABETES_PERCENT_PROPERTY;
use crate::numbers::{format_one_decimal, parse_leading_number};
use crate::table::Record;
use crate::types::{Selection, View};
use geojson::{Feature, FeatureCollection, JsonValue};

/// Year the county statistics were collected in.
pub const COUNTY_DATA_YEAR: i32 = 2012;

/// One row of the national yearly table, cells kept as display text.
#[derive(Debug, Clone, PartialEq)]
pub struct NationalYear {
    pub percentage: String,
    pub lower_limit: String,
    pub upper_limit: String,
}

/// Summary over ad hoc observations. `min` starts at 100 and `max` at 0, so an
/// empty set reports the range `100.0% - 0.0%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NationalStat {
    pub average: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl NationalStat {
    pub fn average_label(&self) -> String {
        self.average
            .map(format_one_decimal)
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn range_label(&self) -> String {
        format!("{}% - {}%", format_one_decimal(self.min), format_one_decimal(self.max))
    }
}

/// What the national statistics panel shows for a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct NationalSummary {
    pub caption: String,
    pub rate: String,
    pub range: String,
}

fn cell(record: &Record, field: &str) -> String {
    record
        .get(field)
        .cloned()
        .unwrap_or_else(|| "N/A".to_string())
}

/// First row whose `Year` cell is numerically equal to `year`.
pub fn lookup_year(table: &[Record], year: i32) -> Option<NationalYear> {
    let row = table.iter().find(|r| {
        r.get("Year")
            .and_then(|y| y.trim().parse::<f64>().ok())
            .is_some_and(|y| y == f64::from(year))
    })?;

    Some(NationalYear {
        percentage: cell(row, "Percentage"),
        lower_limit: cell(row, "LowerLimit"),
        upper_limit: cell(row, "UpperLimit"),
    })
}

/// Falsy values (empty string, `0`) are not observations; strings
/// contribute their leading number.
fn diabetes_percent(feature: &Feature) -> Option<f64> {
    match feature.property(DIABETES_PERCENT_PROPERTY)? {
        JsonValue::String(s) => parse_leading_number(s),
        JsonValue::Number(n) => n.as_f64().filter(|v| *v != 0.0 && v.is_finite()),
        _ => None,
    }
}

pub fn aggregate(features: &[Feature]) -> NationalStat {
    let mut total = 0.0;
    let mut count = 0;
    let mut min: f64 = 100.0;
    let mut max: f64 = 0.0;

    for value in features.iter().filter_map(diabetes_percent) {
        total += value;
        count += 1;
        min = min.min(value);
        max = max.max(value);
    }

    NationalStat {
        average: (count > 0).then(|| total / count as f64),
        min,
        max,
        count,
    }
}

/// Builds the national panel for `selection`. `None` means the data the view
/// needs is not loaded, or the year is not in the table.
pub fn national_summary(
    selection: Selection,
    national: &[Record],
    counties: Option<&FeatureCollection>,
) -> Option<NationalSummary> {
    match selection.view {
        View::State => {
            let row = lookup_year(national, selection.year)?;
            Some(NationalSummary {
                caption: "National Statistics".to_string(),
                rate: format!("{}%", row.percentage),
                range: format!("{}% - {}%", row.lower_limit, row.upper_limit),
            })
        }
        View::County => {
            let stat = aggregate(&counties?.features);
            Some(NationalSummary {
                caption: format!("National Statistics (County data: {})", COUNTY_DATA_YEAR),
                rate: format!("{}%", stat.average_label()),
                range: stat.range_label(),
            })
        }
    }
}
