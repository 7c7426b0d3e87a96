use crate::keys::{derive_fips, first_key_value, pad_fips};
use crate::numbers::{format_one_decimal, parse_leading_number};
use crate::table::Record;
use crate::types::CountyRecord;
use geojson::{Feature, FeatureCollection};
use std::collections::HashMap;
use tracing::{debug, info};

// County statistics CSV columns
pub const FIPS_COLUMN: &str = "FIPS.Codes";
pub const COUNTY_COLUMN: &str = "County";
pub const STATE_COLUMN: &str = "State";
pub const MEN_DIABETES_COLUMN: &str = "percent.men.diabetes";
pub const WOMEN_DIABETES_COLUMN: &str = "percent.women.diabetes";
pub const MEN_OBESE_COLUMN: &str = "percent.men.obese";
pub const WOMEN_OBESE_COLUMN: &str = "percent.women.obese";

/// Property the merged features carry the overall prevalence in.
pub const DIABETES_PERCENT_PROPERTY: &str = "diabetesPercent";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountyMergeReport {
    pub matched: usize,
    pub unmatched: usize,
}

fn percent_or_zero(cell: Option<&String>) -> f64 {
    cell.and_then(|c| parse_leading_number(c)).unwrap_or(0.0)
}

/// Builds the FIPS lookup from parsed county statistics rows. Rows without a
/// FIPS code are dropped; a repeated code replaces the earlier row.
pub fn county_records(records: &[Record]) -> HashMap<String, CountyRecord> {
    let mut by_fips = HashMap::new();

    for record in records {
        let fips = match record.get(FIPS_COLUMN) {
            Some(code) if !code.trim().is_empty() => pad_fips(code),
            _ => {
                debug!("County row without {}, skipping", FIPS_COLUMN);
                continue;
            }
        };

        let men = record.get(MEN_DIABETES_COLUMN);
        let women = record.get(WOMEN_DIABETES_COLUMN);
        let mean = (percent_or_zero(men) + percent_or_zero(women)) / 2.0;

        by_fips.insert(
            fips.clone(),
            CountyRecord {
                fips,
                county: record.get(COUNTY_COLUMN).cloned(),
                state: record.get(STATE_COLUMN).cloned(),
                diabetes_percent: format_one_decimal(mean),
                men_diabetes: men.cloned(),
                women_diabetes: women.cloned(),
                men_obese: record.get(MEN_OBESE_COLUMN).cloned(),
                women_obese: record.get(WOMEN_OBESE_COLUMN).cloned(),
            },
        );
    }

    by_fips
}

fn enrich(feature: &Feature, record: &CountyRecord) -> Feature {
    let mut enriched = feature.clone();

    let optional = [
        ("county", &record.county),
        ("state", &record.state),
    ];
    for (key, value) in optional {
        if let Some(v) = value {
            enriched.set_property(key, v.clone());
        }
    }

    enriched.set_property(DIABETES_PERCENT_PROPERTY, record.diabetes_percent.clone());

    let raw = [
        ("menDiabetesPercent", &record.men_diabetes),
        ("womenDiabetesPercent", &record.women_diabetes),
        ("menObesePercent", &record.men_obese),
        ("womenObesePercent", &record.women_obese),
    ];
    for (key, value) in raw {
        if let Some(v) = value {
            enriched.set_property(key, v.clone());
        }
    }

    enriched
}

/// Joins county boundaries with statistics by FIPS code. Unmatched features
/// come through untouched.
pub fn merge(
    boundaries: &FeatureCollection,
    stats: &HashMap<String, CountyRecord>,
    id_keys: &[String],
) -> (FeatureCollection, CountyMergeReport) {
    let mut report = CountyMergeReport::default();

    let features = boundaries
        .features
        .iter()
        .map(|feature| {
            let record = first_key_value(feature, id_keys)
                .map(|geo_id| derive_fips(&geo_id))
                .and_then(|fips| stats.get(&fips));
            match record {
                Some(record) => {
                    debug!(
                        "County {} matched {}",
                        record.fips,
                        record.county.as_deref().unwrap_or("(unnamed)")
                    );
                    report.matched += 1;
                    enrich(feature, record)
                }
                None => {
                    report.unmatched += 1;
                    feature.clone()
                }
            }
        })
        .collect();

    info!(
        "County merge: {} matched, {} passed through",
        report.matched, report.unmatched
    );

    let merged = FeatureCollection {
        bbox: boundaries.bbox.clone(),
        features,
        foreign_members: boundaries.foreign_members.clone(),
    };
    (merged, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table;
    use serde_json::json;

    const STATS_CSV: &str = "\
County,State,FIPS.Codes,percent.men.diabetes,percent.women.diabetes,percent.men.obese,percent.women.obese
Autauga,Alabama,1001,10.0,12.0,30.1,33.2
Baldwin,Alabama,1003,9.5,
Natrona,Wyoming,56025,n/a,8.0,25.0,26.5
,Nowhere,,5.0,5.0,1.0,1.0
";

    fn stats() -> HashMap<String, CountyRecord> {
        county_records(&table::parse(STATS_CSV))
    }

    fn id_keys() -> Vec<String> {
        crate::config::MatchingConfig::default().county_id_keys
    }

    fn counties(props: &[&str]) -> FeatureCollection {
        let features: Vec<String> = props
            .iter()
            .map(|p| {
                format!(
                    r#"{{"type":"Feature","geometry":{{"type":"Point","coordinates":[-86.6,32.5]}},"properties":{p}}}"#
                )
            })
            .collect();
        format!(r#"{{"type":"FeatureCollection","features":[{}]}}"#, features.join(","))
            .parse()
            .unwrap()
    }

    #[test]
    fn test_county_records_pad_fips_and_average() {
        let stats = stats();
        assert_eq!(stats.len(), 3, "row without FIPS should be skipped");

        let autauga = &stats["01001"];
        assert_eq!(autauga.diabetes_percent, "11.0");
        assert_eq!(autauga.county.as_deref(), Some("Autauga"));
        assert_eq!(autauga.men_obese.as_deref(), Some("30.1"));
    }

    #[test]
    fn test_unparseable_or_missing_percent_counts_as_zero() {
        let stats = stats();
        assert_eq!(stats["01003"].diabetes_percent, "4.8");
        assert_eq!(stats["01003"].women_diabetes.as_deref(), Some(""));
        assert_eq!(stats["01003"].men_obese, None);
        assert_eq!(stats["56025"].diabetes_percent, "4.0");
    }

    #[test]
    fn test_mean_rounds_the_stored_value() {
        let header = "County,State,FIPS.Codes,percent.men.diabetes,percent.women.diabetes\n";
        let stats = county_records(&table::parse(&format!("{}Coffee,Alabama,1031,6.0,6.1\n", header)));
        assert_eq!(stats["01031"].diabetes_percent, "6.0");

        let stats = county_records(&table::parse(&format!("{}Dale,Alabama,1045,10.0,10.5\n", header)));
        assert_eq!(stats["01045"].diabetes_percent, "10.3");
    }

    #[test]
    fn test_percent_cells_with_trailing_text() {
        let header = "County,State,FIPS.Codes,percent.men.diabetes,percent.women.diabetes\n";
        let stats = county_records(&table::parse(&format!("{}Elmore,Alabama,1051,10.5%,9.5 \n", header)));
        assert_eq!(stats["01051"].diabetes_percent, "10.0");
        // Raw cells are still copied verbatim
        assert_eq!(stats["01051"].men_diabetes.as_deref(), Some("10.5%"));
    }

    #[test]
    fn test_records_are_keyed_by_their_fips() {
        let stats = stats();
        assert!(stats.iter().all(|(key, record)| key == &record.fips));
    }

    #[test]
    fn test_merge_enriches_matched_county() {
        let (merged, report) = merge(
            &counties(&[r#"{"GEO_ID":"0500000US01001","NAME":"Autauga","LSAD":"County"}"#]),
            &stats(),
            &id_keys(),
        );
        let props = merged.features[0].properties.as_ref().unwrap();

        assert_eq!(report, CountyMergeReport { matched: 1, unmatched: 0 });
        assert_eq!(props["diabetesPercent"], json!("11.0"));
        assert_eq!(props["county"], json!("Autauga"));
        assert_eq!(props["state"], json!("Alabama"));
        assert_eq!(props["menDiabetesPercent"], json!("10.0"));
        assert_eq!(props["womenDiabetesPercent"], json!("12.0"));
        assert_eq!(props["menObesePercent"], json!("30.1"));
        assert_eq!(props["womenObesePercent"], json!("33.2"));
        assert_eq!(props["LSAD"], json!("County"));
        assert!(merged.features[0].geometry.is_some());
    }

    #[test]
    fn test_absent_source_fields_stay_absent() {
        let (merged, _) = merge(&counties(&[r#"{"GEOID":"01003"}"#]), &stats(), &id_keys());
        let feature = &merged.features[0];
        assert_eq!(feature.property("diabetesPercent"), Some(&json!("4.8")));
        assert!(!feature.contains_property("menObesePercent"));
    }

    #[test]
    fn test_unmatched_county_passes_through_unchanged() {
        let input = counties(&[
            r#"{"GEOID":"99999","NAME":"Atlantis"}"#,
            r#"{"NAME":"No id"}"#,
            r#"{"GEOID":1001}"#,
        ]);
        let (merged, report) = merge(&input, &stats(), &id_keys());

        assert_eq!(report, CountyMergeReport { matched: 0, unmatched: 3 });
        assert_eq!(merged.features, input.features);
    }

    #[test]
    fn test_merge_is_total_and_ordered() {
        let (merged, report) = merge(
            &counties(&[r#"{"GEOID":"56025"}"#, r#"{"GEOID":"00000"}"#, r#"{"GEOID":"01001"}"#]),
            &stats(),
            &id_keys(),
        );
        assert_eq!(merged.features.len(), 3);
        assert_eq!(report.matched, 2);
        assert_eq!(merged.features[0].property("county"), Some(&json!("Natrona")));
        assert!(!merged.features[1].contains_property("county"));
        assert_eq!(merged.features[2].property("county"), Some(&json!("Autauga")));
    }
}
