use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub state_boundaries: PathBuf,
    pub state_series: PathBuf, // GeoJSON carrying properties.NAME + properties.diabetes
    pub county_boundaries: PathBuf,
    pub county_stats: PathBuf,
    pub national_table: PathBuf,
}

/// Ordered candidate property keys used to pull join keys out of boundary
/// features. The first non-empty value wins.
#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    #[serde(default = "default_state_name_keys")]
    pub state_name_keys: Vec<String>,
    #[serde(default = "default_county_id_keys")]
    pub county_id_keys: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            state_name_keys: default_state_name_keys(),
            county_id_keys: default_county_id_keys(),
        }
    }
}

fn default_state_name_keys() -> Vec<String> {
    ["NAME", "name", "State", "STATE_NAME"].iter().map(|k| k.to_string()).collect()
}

fn default_county_id_keys() -> Vec<String> {
    ["GEOID", "GEO_ID"].iter().map(|k| k.to_string()).collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub merged_states: PathBuf,
    pub merged_counties: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_year")]
    pub default_year: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { default_year: default_year() }
    }
}

fn default_year() -> i32 {
    2020
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}
