use crate::config::AppConfig;
use crate::counties::{self, CountyMergeReport};
use crate::states::{self, SeriesTable, StateMergeReport};
use crate::table::{self, Record};
use anyhow::{anyhow, Context, Result};
use geojson::{FeatureCollection, GeoJson};
use std::path::Path;
use tokio::fs;
use tracing::info;

pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection> {
    let geojson: GeoJson = text.parse().context("Failed to parse GeoJSON")?;
    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => Err(anyhow!("GeoJSON must be a FeatureCollection")),
    }
}

pub async fn read_feature_collection(path: &Path) -> Result<FeatureCollection> {
    info!("Reading GeoJSON from {:?}", path);
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to open GeoJSON file: {:?}", path))?;
    parse_feature_collection(&text).with_context(|| format!("Invalid GeoJSON in {:?}", path))
}

pub async fn read_table(path: &Path) -> Result<Vec<Record>> {
    info!("Reading table from {:?}", path);
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    Ok(table::parse(&text))
}

pub async fn write_feature_collection(path: &Path, collection: FeatureCollection) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    }
    let body = GeoJson::from(collection).to_string();
    fs::write(path, body)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;
    info!("Saved merged data to {:?}", path);
    Ok(())
}

/// Reads state boundaries and series concurrently and merges them.
pub async fn load_states(config: &AppConfig) -> Result<(FeatureCollection, StateMergeReport)> {
    let (boundaries, series) = tokio::try_join!(
        read_feature_collection(&config.input.state_boundaries),
        read_feature_collection(&config.input.state_series),
    )?;

    let table = SeriesTable::from_collection(&series);
    info!(
        "Merging {} state boundaries with {} diabetes series",
        boundaries.features.len(),
        table.len()
    );

    let (merged, report) = states::merge(boundaries, &table, &config.matching.state_name_keys);
    report.log();
    Ok((merged, report))
}

pub async fn load_counties(config: &AppConfig) -> Result<(FeatureCollection, CountyMergeReport)> {
    let (boundaries, rows) = tokio::try_join!(
        read_feature_collection(&config.input.county_boundaries),
        read_table(&config.input.county_stats),
    )?;

    let stats = counties::county_records(&rows);
    info!(
        "Loaded statistics for {} counties, {} county boundaries",
        stats.len(),
        boundaries.features.len()
    );

    Ok(counties::merge(&boundaries, &stats, &config.matching.county_id_keys))
}

pub async fn load_national_table(config: &AppConfig) -> Result<Vec<Record>> {
    read_table(&config.input.national_table).await
}

/// Batch state merge: boundaries + series -> merged state GeoJSON.
pub async fn merge_states(config: &AppConfig) -> Result<StateMergeReport> {
    let (merged, report) = load_states(config).await?;
    write_feature_collection(&config.output.merged_states, merged).await?;
    Ok(report)
}

pub async fn merge_counties(config: &AppConfig) -> Result<CountyMergeReport> {
    let (merged, report) = load_counties(config).await?;
    write_feature_collection(&config.output.merged_counties, merged).await?;
    Ok(report)
}
