//! Join-key normalization for state names and county FIPS codes.
use geojson::{Feature, JsonValue};

/// Census GEO_ID marker in front of a county FIPS code, e.g. `0500000US01001`.
pub const CENSUS_COUNTY_PREFIX: &str = "0500000US";

pub const FIPS_LEN: usize = 5;

/// Comparison form of a key. Never stored.
pub fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

pub fn derive_fips(geo_identifier: &str) -> String {
    geo_identifier
        .strip_prefix(CENSUS_COUNTY_PREFIX)
        .unwrap_or(geo_identifier)
        .to_string()
}

/// Left-pads a statistics-table FIPS code (`1001` -> `01001`).
pub fn pad_fips(code: &str) -> String {
    format!("{:0>width$}", code.trim(), width = FIPS_LEN)
}

/// First usable value among `keys` in a feature's properties, trimmed.
/// Strings must be non-empty after trimming; numbers are stringified.
pub fn first_key_value(feature: &Feature, keys: &[String]) -> Option<String> {
    keys.iter().find_map(|key| match feature.property(key)? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
