//! Minimal comma-delimited table reader.
//!
//! Fields are split on commas with no quote handling, and rows shorter than
//! the header simply lack the trailing fields.
use csv::ReaderBuilder;
use std::collections::HashMap;
use tracing::debug;

/// One data row, field name to raw cell text.
pub type Record = HashMap<String, String>;

pub fn parse(text: &str) -> Vec<Record> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = match rdr.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            debug!("Unreadable header row: {}", e);
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                debug!("Skipping row {}: {}", line + 2, e);
                continue;
            }
        };

        // A whitespace-only line comes back as a single field
        if row.len() <= 1 && row.get(0).map_or(true, |f| f.trim().is_empty()) {
            continue;
        }

        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_blank_line_is_skipped() {
        let text = "Year,Percentage\n2019,10.1\n2020,10.5\n\n";
        let records = parse(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Year"], "2019");
        assert_eq!(records[1]["Percentage"], "10.5");
    }

    #[test]
    fn test_whitespace_only_lines_are_skipped() {
        let text = "a,b\n1,2\n   \n3,4\n";
        let records = parse(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["a"], "3");
    }

    #[test]
    fn test_short_row_leaves_trailing_fields_unset() {
        let text = "County,State,FIPS.Codes\nAutauga,Alabama\n";
        let records = parse(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["State"], "Alabama");
        assert!(!records[0].contains_key("FIPS.Codes"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let records = parse("a,b\n1,2,3\n");
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0]["b"], "2");
    }

    #[test]
    fn test_quotes_are_not_interpreted() {
        let records = parse("name,value\n\"Doña Ana, NM\",7\n");
        assert_eq!(records[0]["name"], "\"Doña Ana");
        assert_eq!(records[0]["value"], " NM\"");
    }

    #[test]
    fn test_crlf_line_endings() {
        let records = parse("Year,Percentage\r\n2020,10.5\r\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Percentage"], "10.5");
    }

    #[test]
    fn test_empty_input_has_no_records() {
        assert!(parse("").is_empty());
        assert!(parse("Year,Percentage\n").is_empty());
    }
}
