// Parsing and formatting helpers for currency and percentage cells.
//
// This module centralizes all the "dirty" text handling so the report code
// can assume clean `f64` values throughout.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a currency cell like `"₹12,345"` into `12345.0`.
///
/// - Strips the rupee symbol and thousands separators, then trims.
/// - Rejects values that still contain alphabetic characters (`"N/A"`).
/// - Rejects negative amounts; revenue and fares are never negative in the
///   upstream export.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_money(s: &str) -> Option<f64> {
    let s = s.replace('₹', "").replace(',', "");
    let s = s.trim();
    if s.is_empty() || s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| *v >= 0.0)
}

/// Parse a percentage cell like `"93%"` into `93.0`.
///
/// The value is passed through as-is; occupancy above 100% is kept, not
/// clamped, so data-quality problems stay visible downstream.
pub fn parse_percent(s: &str) -> Option<f64> {
    let s = s.replace('%', "");
    let s = s.trim();
    if s.is_empty() || s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Format a monetary amount with thousands separators and no decimal
/// places, e.g. `1234.6` -> `"1,235"`. The currency symbol is added by the
/// caller, since the narrative template owns it.
pub fn format_money(n: f64) -> String {
    let neg = n.is_sign_negative();
    // Round to whole units first, then let `num-format` insert the commas.
    let units: i64 = format!("{:.0}", n.abs()).parse().unwrap_or(0);
    let res = units.to_formatted_string(&Locale::en);
    if neg && units != 0 {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Parse a journey date typed at the prompt.
///
/// Accepts `DD-MM-YYYY` (the format the report itself prints) and ISO
/// `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money_strips_symbol_and_separators() {
        assert_eq!(parse_money("₹12,345"), Some(12345.0));
        assert_eq!(parse_money("₹1,234,567.89"), Some(1234567.89));
        assert_eq!(parse_money("₹0"), Some(0.0));
        assert_eq!(parse_money(" 500 "), Some(500.0));
    }

    #[test]
    fn test_parse_money_rejects_garbage() {
        assert_eq!(parse_money("N/A"), None);
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("  "), None);
        assert_eq!(parse_money("-₹500"), None);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("93%"), Some(93.0));
        assert_eq!(parse_percent("87.5%"), Some(87.5));
        // Above 100% passes through untouched.
        assert_eq!(parse_percent("103%"), Some(103.0));
        assert_eq!(parse_percent("full"), None);
        assert_eq!(parse_percent(""), None);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(3000.0), "3,000");
        assert_eq!(format_money(1234567.0), "1,234,567");
        assert_eq!(format_money(549.6), "550");
        assert_eq!(format_money(0.0), "0");
    }

    #[test]
    fn test_parse_date_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("15-01-2024"), Some(expected));
        assert_eq!(parse_date("2024-01-15"), Some(expected));
        assert_eq!(parse_date("Jan 15"), None);
    }
}
