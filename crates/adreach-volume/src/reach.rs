//! Parsing of the ad library's reach strings (`"94K"`, `"10K-100K"`, `"1.2M"`)
//! into a numeric estimate of unique viewers.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable reach value: {input:?}")]
pub struct ReachParseError {
    pub input: String,
}

/// Parses a reach string into a non-negative estimate.
///
/// Input is upper-cased and thousands separators are removed first. A value
/// containing a hyphen is a closed range `LOW-HIGH` and yields its midpoint;
/// otherwise a trailing `K` or `M` scales the number by a thousand or a
/// million. Blank input is zero.
///
/// # Errors
///
/// Returns [`ReachParseError`] if either side of a range, or the single
/// value, is not a finite non-negative number after its suffix is removed.
pub fn parse_reach_value(raw: &str) -> Result<f64, ReachParseError> {
    let normalized = raw.trim().to_uppercase().replace(',', "");
    if normalized.is_empty() {
        return Ok(0.0);
    }

    let fail = || ReachParseError {
        input: raw.to_owned(),
    };

    if let Some((low, high)) = normalized.split_once('-') {
        let low = parse_magnitude(low).ok_or_else(fail)?;
        let high = parse_magnitude(high).ok_or_else(fail)?;
        return Ok((low + high) / 2.0);
    }

    parse_magnitude(&normalized).ok_or_else(fail)
}

fn parse_magnitude(value: &str) -> Option<f64> {
    let value = value.trim();
    let (number, scale) = if let Some(n) = value.strip_suffix('K') {
        (n, 1_000.0)
    } else if let Some(n) = value.strip_suffix('M') {
        (n, 1_000_000.0)
    } else {
        (value, 1.0)
    };

    let number = number.trim();
    // Reject signs so "-" only ever means a range.
    if number.is_empty() || number.starts_with(['+', '-']) {
        return None;
    }
    let parsed = number.parse::<f64>().ok()? * scale;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_scale_the_number() {
        assert_eq!(parse_reach_value("94K"), Ok(94_000.0));
        assert_eq!(parse_reach_value("3M"), Ok(3_000_000.0));
        assert_eq!(parse_reach_value("1.5k"), Ok(1_500.0));
        assert_eq!(parse_reach_value("250"), Ok(250.0));
    }

    #[test]
    fn range_yields_midpoint() {
        assert_eq!(parse_reach_value("10K-100K"), Ok(55_000.0));
        assert_eq!(parse_reach_value("1M-10M"), Ok(5_500_000.0));
        assert_eq!(parse_reach_value("0-1K"), Ok(500.0));
    }

    #[test]
    fn thousands_separators_and_whitespace_are_ignored() {
        assert_eq!(parse_reach_value(" 1,000 "), Ok(1_000.0));
        assert_eq!(parse_reach_value("1,000 - 2,000"), Ok(1_500.0));
    }

    #[test]
    fn blank_is_zero() {
        assert_eq!(parse_reach_value(""), Ok(0.0));
        assert_eq!(parse_reach_value("   "), Ok(0.0));
    }

    #[test]
    fn garbage_is_an_error() {
        for input in ["lots", "10X", "K", "10K-", "-5", "10K-abc", "inf", "NaN"] {
            assert_eq!(
                parse_reach_value(input),
                Err(ReachParseError {
                    input: input.to_owned()
                }),
                "input {input:?}"
            );
        }
    }
}
