//! `YYYYMMDD` dates as used by the ad library.

use chrono::NaiveDate;

/// Parses an 8-digit `YYYYMMDD` date. Anything else, including calendar
/// dates that do not exist, yields `None`.
#[must_use]
pub fn parse_compact_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d").ok()
}

/// Reads a date field that may be a JSON string or an integer.
#[must_use]
pub fn parse_compact_date_value(value: &serde_json::Value) -> Option<NaiveDate> {
    match value {
        serde_json::Value::String(s) => parse_compact_date(s),
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| parse_compact_date(&n.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_compact_dates() {
        assert_eq!(
            parse_compact_date("20240808"),
            NaiveDate::from_ymd_opt(2024, 8, 8)
        );
        assert_eq!(
            parse_compact_date("20240229"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn rejects_other_formats_and_impossible_dates() {
        assert_eq!(parse_compact_date("2024-08-08"), None);
        assert_eq!(parse_compact_date("2024088"), None);
        assert_eq!(parse_compact_date("20230229"), None);
        assert_eq!(parse_compact_date("20241301"), None);
        assert_eq!(parse_compact_date(""), None);
    }

    #[test]
    fn accepts_integer_json_dates() {
        assert_eq!(
            parse_compact_date_value(&json!(20_240_101)),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            parse_compact_date_value(&json!("20240101")),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(parse_compact_date_value(&json!(null)), None);
        assert_eq!(parse_compact_date_value(&json!(2024.5)), None);
    }
}
