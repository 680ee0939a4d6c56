//! Normalization of raw ad payloads into [`AdRecord`]s.
//!
//! Three payload shapes are accepted:
//!
//! - detail responses, `{"data": {"ad": {...}, "advertiser": {...}}, "error": {...}}`
//! - search summaries, `{"ad": {...}, "advertiser": {...}}`, or a bare ad object
//! - collector output, `{"id": ..., "basic_info": <search summary>}`
//!
//! Malformed entries are rejected one by one and never abort the batch.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use adreach_core::AdId;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::dates::parse_compact_date_value;
use crate::reach::{parse_reach_value, ReachParseError};

/// Advertiser name used when a payload carries none.
pub const UNKNOWN_ADVERTISER: &str = "Unknown";

/// A well-formed ad with a resolved date range and reach estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdRecord {
    pub id: AdId,
    pub first_shown: NaiveDate,
    /// Inclusive; never before `first_shown`.
    pub last_shown: NaiveDate,
    pub reach_volume: f64,
    pub advertiser: String,
}

/// Why a payload entry did not become an [`AdRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("entry carries a non-ok error status")]
    ErrorStatus,

    #[error("ad has no id")]
    MissingId,

    #[error("ad has no first_shown_date")]
    MissingFirstShown,

    #[error("ad has no last_shown_date")]
    MissingLastShown,

    #[error("invalid {field}: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("first_shown_date is after last_shown_date")]
    InvertedDateRange,

    #[error(transparent)]
    InvalidReach(#[from] ReachParseError),
}

impl Rejection {
    /// Stable short label, used as the key of [`LoadOutcome::rejected`].
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotAnObject => "not_an_object",
            Self::ErrorStatus => "error_status",
            Self::MissingId => "missing_id",
            Self::MissingFirstShown => "missing_first_shown",
            Self::MissingLastShown => "missing_last_shown",
            Self::InvalidDate { .. } => "invalid_date",
            Self::InvertedDateRange => "inverted_date_range",
            Self::InvalidReach(_) => "invalid_reach",
        }
    }
}

/// Result of loading a batch of payloads.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<AdRecord>,
    /// Rejected entry counts keyed by [`Rejection::reason`].
    pub rejected: BTreeMap<&'static str, usize>,
}

impl LoadOutcome {
    #[must_use]
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a JSON file of ad payloads and loads it with [`load_records`].
///
/// # Errors
///
/// Returns [`LoadError::NotFound`] if `path` does not exist,
/// [`LoadError::Io`] on any other read failure, and [`LoadError::Json`] if
/// the file is not JSON.
pub fn load_records_from_path(path: &Path) -> Result<LoadOutcome, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let data: Value = serde_json::from_str(&text).map_err(|e| LoadError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(load_records(&data))
}

/// Loads every well-formed ad from `data`, which is either an array of
/// payloads or a single payload. Rejected entries are counted and logged at
/// `debug`.
#[must_use]
pub fn load_records(data: &Value) -> LoadOutcome {
    let entries: &[Value] = match data {
        Value::Array(items) => items,
        single => std::slice::from_ref(single),
    };

    let mut outcome = LoadOutcome::default();
    for (index, entry) in entries.iter().enumerate() {
        match normalize_entry(entry) {
            Ok(record) => outcome.records.push(record),
            Err(rejection) => {
                tracing::debug!(
                    index,
                    reason = rejection.reason(),
                    error = %rejection,
                    "skipping ad entry"
                );
                *outcome.rejected.entry(rejection.reason()).or_default() += 1;
            }
        }
    }

    tracing::info!(
        entries = entries.len(),
        loaded = outcome.records.len(),
        rejected = outcome.rejected_total(),
        "ad records loaded"
    );
    outcome
}

/// Turns one payload entry into an [`AdRecord`].
///
/// Reach is the larger of the global unique-viewer figure and the sum of the
/// per-country figures.
///
/// # Errors
///
/// Returns the first [`Rejection`] that applies to the entry.
pub fn normalize_entry(entry: &Value) -> Result<AdRecord, Rejection> {
    if !entry.is_object() {
        return Err(Rejection::NotAnObject);
    }

    let item = match (entry.get("id"), entry.get("basic_info")) {
        (Some(_), Some(info)) if info.is_object() => info,
        _ => entry,
    };

    if has_error_status(item) {
        return Err(Rejection::ErrorStatus);
    }

    let (ad, advertiser) = match item.get("data") {
        Some(data) => (data.get("ad"), data.get("advertiser")),
        None => (Some(item.get("ad").unwrap_or(item)), item.get("advertiser")),
    };
    let ad = ad.ok_or(Rejection::MissingId)?;

    let id = ad
        .get("id")
        .and_then(AdId::from_json)
        .ok_or(Rejection::MissingId)?;

    let first_shown = date_field(ad, "first_shown_date", Rejection::MissingFirstShown)?;
    let last_shown = date_field(ad, "last_shown_date", Rejection::MissingLastShown)?;
    if first_shown > last_shown {
        return Err(Rejection::InvertedDateRange);
    }

    let reach = ad.get("reach");
    let global = reach_figure(reach.and_then(|r| r.get("unique_users_seen")))?;
    let by_country = match reach
        .and_then(|r| r.get("unique_users_seen_by_country"))
        .and_then(Value::as_object)
    {
        Some(countries) => countries
            .values()
            .map(|v| reach_figure(Some(v)))
            .sum::<Result<f64, _>>()?,
        None => 0.0,
    };

    let advertiser = advertiser
        .and_then(|a| a.get("business_name"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_ADVERTISER)
        .to_owned();

    Ok(AdRecord {
        id,
        first_shown,
        last_shown,
        reach_volume: global.max(by_country),
        advertiser,
    })
}

/// An `error` object whose `code` is anything but `"ok"`, or an `error`
/// string left by a failed detail fetch.
fn has_error_status(item: &Value) -> bool {
    match item.get("error") {
        None | Some(Value::Null) => false,
        Some(Value::Object(status)) => status.get("code").and_then(Value::as_str) != Some("ok"),
        Some(_) => true,
    }
}

fn date_field(ad: &Value, field: &'static str, missing: Rejection) -> Result<NaiveDate, Rejection> {
    let raw = match ad.get(field) {
        None | Some(Value::Null) => return Err(missing),
        Some(raw) => raw,
    };
    parse_compact_date_value(raw).ok_or_else(|| Rejection::InvalidDate {
        field,
        value: raw
            .as_str()
            .map_or_else(|| raw.to_string(), str::to_owned),
    })
}

/// Reach figures are normally strings; plain numbers are taken literally
/// and an absent figure counts as zero.
fn reach_figure(value: Option<&Value>) -> Result<f64, ReachParseError> {
    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::String(s)) => parse_reach_value(s),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| ReachParseError {
                input: n.to_string(),
            }),
        Some(other) => Err(ReachParseError {
            input: other.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;
