use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One point of a state's diabetes series, `value` in percent of adults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

impl YearValue {
    pub const fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Substituted for any state with no real series.
pub const PLACEHOLDER_SERIES: [YearValue; 5] = [
    YearValue::new(2000, 5.0),
    YearValue::new(2005, 6.0),
    YearValue::new(2010, 7.0),
    YearValue::new(2015, 8.0),
    YearValue::new(2020, 9.0),
];

/// County statistics row keyed by its 5-character FIPS code.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyRecord {
    pub fips: String,
    pub county: Option<String>,
    pub state: Option<String>,
    pub diabetes_percent: String, // one decimal, mean of men and women
    // Raw CSV cells, copied through verbatim
    pub men_diabetes: Option<String>,
    pub women_diabetes: Option<String>,
    pub men_obese: Option<String>,
    pub women_obese: Option<String>,
}

/// Which map the display layer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    #[default]
    State,
    County,
}

/// The display selection passed explicitly into summaries and descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub year: i32,
    pub view: View,
}

impl Selection {
    pub fn new(year: i32, view: View) -> Self {
        Self { year, view }
    }
}
