//! Ad library API request and response types.
//!
//! Search results are kept as raw `serde_json::Value` payloads: the collector
//! only needs the identifier, and the rest is persisted verbatim as the ad's
//! `basic_info`.

use adreach_core::AdId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by the ad library for filters and ad dates.
pub const API_DATE_FORMAT: &str = "%Y%m%d";

/// Bearer token returned by the OAuth client-credentials exchange.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    /// Lifetime in seconds as reported by the server.
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[redacted]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// One search request against the ad query endpoint, minus the offset.
#[derive(Debug, Clone)]
pub struct AdQuery<'a> {
    pub search_term: &'a str,
    pub country: &'a str,
    /// Inclusive lower bound of the published-date filter.
    pub min_date: NaiveDate,
    /// Inclusive upper bound of the published-date filter.
    pub max_date: NaiveDate,
    pub max_count: u32,
}

impl AdQuery<'_> {
    pub(crate) fn request_body(&self, offset: u64) -> AdQueryRequest<'_> {
        AdQueryRequest {
            filters: QueryFilters {
                ad_published_date_range: DateRange {
                    min: self.min_date.format(API_DATE_FORMAT).to_string(),
                    max: self.max_date.format(API_DATE_FORMAT).to_string(),
                },
                country: self.country,
            },
            search_term: self.search_term,
            search_type: "fuzzy_phrase",
            max_count: self.max_count,
            offset,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AdQueryRequest<'a> {
    pub filters: QueryFilters<'a>,
    pub search_term: &'a str,
    pub search_type: &'static str,
    pub max_count: u32,
    pub offset: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryFilters<'a> {
    pub ad_published_date_range: DateRange,
    pub country: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DateRange {
    pub min: String,
    pub max: String,
}

/// Envelope of the ad query endpoint: `{"data": {...}, "error": {...}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct AdQueryResponse {
    #[serde(default)]
    pub data: Option<AdQueryPage>,
    #[serde(default)]
    pub error: Option<ApiStatus>,
}

/// The `error` object the API attaches to every response. A `code` of `"ok"`
/// means success.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiStatus {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A single page of search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdQueryPage {
    /// Ad summaries, each shaped `{"ad": {"id": ...}, "advertiser": {...}}`.
    #[serde(default)]
    pub ads: Vec<serde_json::Value>,
    /// Offset for the next page, when the server declares one.
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub has_more: bool,
}

impl AdQueryPage {
    /// Offset to request next: the server-declared one, or the current
    /// offset advanced by the page size.
    #[must_use]
    pub fn next_offset(&self, current: u64, max_count: u32) -> u64 {
        self.offset
            .unwrap_or_else(|| current.saturating_add(u64::from(max_count)))
    }
}

/// An ad discovered by the collector: its identifier plus the search
/// summary it came with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedAd {
    pub id: AdId,
    pub basic_info: serde_json::Value,
}

impl CollectedAd {
    /// Builds a `CollectedAd` from a search summary, or `None` when the
    /// summary carries no `ad.id`.
    #[must_use]
    pub fn from_summary(summary: serde_json::Value) -> Option<Self> {
        let id = summary
            .get("ad")
            .and_then(|ad| ad.get("id"))
            .and_then(AdId::from_json)?;
        Some(Self {
            id,
            basic_info: summary,
        })
    }
}
