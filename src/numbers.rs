//! Display rounding and lenient number parsing for percentage cells.
use rust_decimal::prelude::*;

/// Rounds the exact decimal value of `value` to one place, exact ties away
/// from zero, and formats it. `6.05` is stored just below the tie, so it
/// gives `"6.0"`.
pub fn format_one_decimal(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded = exact.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(1);
            rounded.to_string()
        }
        None => format!("{:.1}", value),
    }
}

/// Parses the leading number of a cell, ignoring anything after it
/// (`"10.5%"` -> 10.5). Non-finite results are rejected.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(text.len());
    let candidate = &text[..end];

    (1..=candidate.len())
        .rev()
        .find_map(|i| candidate[..i].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_ties_round_away_from_zero() {
        assert_eq!(format_one_decimal(10.25), "10.3");
        assert_eq!(format_one_decimal(4.75), "4.8");
    }

    #[test]
    fn test_near_ties_follow_the_stored_value() {
        assert_eq!(format_one_decimal((6.0 + 6.1) / 2.0), "6.0");
        assert_eq!(format_one_decimal(6.05), "6.0");
        assert_eq!(format_one_decimal(1.15), "1.1");
    }

    #[test]
    fn test_whole_and_small_values_keep_one_place() {
        assert_eq!(format_one_decimal(11.0), "11.0");
        assert_eq!(format_one_decimal(0.04), "0.0");
        assert_eq!(format_one_decimal(100.0), "100.0");
    }

    #[test]
    fn test_leading_number_prefixes() {
        assert_eq!(parse_leading_number("10.5%"), Some(10.5));
        assert_eq!(parse_leading_number("  9.5 "), Some(9.5));
        assert_eq!(parse_leading_number("12"), Some(12.0));
        assert_eq!(parse_leading_number("1e"), Some(1.0));
        assert_eq!(parse_leading_number("-.5x"), Some(-0.5));
    }

    #[test]
    fn test_non_numbers_are_rejected() {
        assert_eq!(parse_leading_number(""), None);
        assert_eq!(parse_leading_number("n/a"), None);
        assert_eq!(parse_leading_number("NaN"), None);
        assert_eq!(parse_leading_number("inf"), None);
        assert_eq!(parse_leading_number("%10"), None);
    }
}
