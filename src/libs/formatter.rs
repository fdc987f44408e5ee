//! Value formatting and parsing for display and storage.
//!
//! Dates are stored as `YYYY-MM-DD` text. Older databases may hold full
//! RFC 3339 timestamps (for example `2025-03-01T14:22:05.120Z`), so reads
//! accept either form and keep only the calendar date.
//!
//! Display helpers never fail. Missing economy figures are rendered as an
//! explicit "insufficient data" marker rather than `0.00`.
//!
//! ## Examples
//!
//! ```rust
//! use fuelbook::libs::formatter::{format_economy, format_money, parse_stored_date};
//!
//! assert_eq!(format_money(1016.0), "1016.00");
//! assert_eq!(format_economy(Some(12.5)), "12.50 km/L");
//! assert_eq!(format_economy(None), "insufficient data");
//! assert!(parse_stored_date("2025-03-01T14:22:05.120Z").is_some());
//! ```

use chrono::{DateTime, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const INSUFFICIENT_DATA: &str = "insufficient data";

/// Parses a stored date in `YYYY-MM-DD` or RFC 3339 form.
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    raw.get(..10).and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_optional_date(date: Option<&NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "-".to_string())
}

pub fn format_money(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_economy(value: Option<f64>) -> String {
    match value {
        Some(km_l) => format!("{:.2} km/L", km_l),
        None => INSUFFICIENT_DATA.to_string(),
    }
}

pub fn format_distance(km: f64) -> String {
    format!("{:.1} km", km)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_timestamp_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(parse_stored_date("2025-03-01"), expected);
        assert_eq!(parse_stored_date("2025-03-01T14:22:05.120Z"), expected);
        assert_eq!(parse_stored_date("2025-03-01 08:00:00"), expected);
        assert_eq!(parse_stored_date("yesterday"), None);
    }

    #[test]
    fn optional_date_placeholder() {
        assert_eq!(format_optional_date(None), "-");
    }
}
