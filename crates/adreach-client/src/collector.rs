//! Date-windowed, paginated collection of ad identifiers for one search term.
//!
//! The lookback window is split into fixed-length chunks ([`crate::window`]),
//! and each chunk is paged through the search endpoint until the server
//! reports no more results or a safety cap is hit. Identifiers are
//! deduplicated across every page and chunk of the run: chunk filters are
//! applied server-side, so the same ad regularly resurfaces near chunk
//! boundaries and is dropped on its second sighting.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use adreach_core::{AdId, AppConfig};
use chrono::NaiveDate;

use crate::client::AdLibraryClient;
use crate::error::ClientError;
use crate::rate_limit::retry_rate_limited;
use crate::types::{AdQuery, AdQueryPage, CollectedAd, API_DATE_FORMAT};
use crate::window::{DateChunk, DateWindow};

/// A source of search result pages. Implemented by [`AdLibraryClient`];
/// tests drive the collector with scripted implementations.
pub trait AdSearch {
    /// Fetches one page for `query` starting at `offset`. A single attempt;
    /// rate-limit retries are handled by the collector.
    fn search_page(
        &self,
        query: &AdQuery<'_>,
        offset: u64,
    ) -> impl Future<Output = Result<AdQueryPage, ClientError>>;
}

impl AdSearch for AdLibraryClient {
    async fn search_page(
        &self,
        query: &AdQuery<'_>,
        offset: u64,
    ) -> Result<AdQueryPage, ClientError> {
        self.query_ads_page(query, offset).await
    }
}

/// What to search for.
#[derive(Debug, Clone, Copy)]
pub struct SearchTarget<'a> {
    pub term: &'a str,
    /// Two-letter ISO country code.
    pub country: &'a str,
    pub months_back: u32,
}

/// Pagination and pacing tunables for a collection run.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub chunk_days: u32,
    pub max_ads_per_request: u32,
    pub max_pages_per_chunk: u32,
    pub max_total_ads: usize,
    /// Pause between pages of a chunk when more results are pending.
    pub inter_request_delay: Duration,
    /// Fixed wait before re-sending a rate-limited request.
    pub rate_limit_backoff: Duration,
    /// `None` retries rate-limited requests without limit.
    pub rate_limit_max_retries: Option<u32>,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            chunk_days: 10,
            max_ads_per_request: 20,
            max_pages_per_chunk: 1000,
            max_total_ads: 10_000,
            inter_request_delay: Duration::from_secs(1),
            rate_limit_backoff: Duration::from_secs(5),
            rate_limit_max_retries: None,
        }
    }
}

impl CollectorSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chunk_days: config.chunk_days,
            max_ads_per_request: config.max_ads_per_request,
            max_pages_per_chunk: config.max_pages_per_chunk,
            max_total_ads: config.max_total_ads,
            inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
            rate_limit_backoff: Duration::from_secs(config.rate_limit_backoff_secs),
            rate_limit_max_retries: config.rate_limit_max_retries,
        }
    }
}

/// Why a collection run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every chunk of the window was traversed (or abandoned).
    WindowExhausted,
    /// The per-term ad cap was reached before the window was exhausted.
    TotalCapReached,
}

/// Result of collecting one search term.
#[derive(Debug, Clone)]
pub struct Collection {
    pub term: String,
    pub country: String,
    pub window: DateWindow,
    /// Unique ads in order of first discovery.
    pub ads: Vec<CollectedAd>,
    pub pages_fetched: usize,
    /// Chunks whose pagination was cut short by a request failure.
    pub chunks_abandoned: usize,
    pub stop: StopReason,
}

/// Insertion-ordered set of ads seen during one term's run.
#[derive(Debug, Default)]
struct SeenAds {
    ids: HashSet<AdId>,
    ads: Vec<CollectedAd>,
}

impl SeenAds {
    /// Records `ad` unless its id was already seen. Returns whether it was new.
    fn insert(&mut self, ad: CollectedAd) -> bool {
        if !self.ids.insert(ad.id.clone()) {
            return false;
        }
        self.ads.push(ad);
        true
    }

    fn len(&self) -> usize {
        self.ads.len()
    }
}

/// Collects the unique ads matching `target` over its lookback window,
/// ending yesterday relative to `today`.
///
/// Per-request failures other than rate limiting abandon the current chunk
/// and move on to the next one; they never abort the term. Reaching the
/// per-chunk page cap or the per-term ad cap is a normal stop.
pub async fn collect_ad_ids<S: AdSearch>(
    search: &S,
    target: &SearchTarget<'_>,
    settings: &CollectorSettings,
    today: NaiveDate,
) -> Collection {
    let window = DateWindow::lookback(today, target.months_back);
    let mut seen = SeenAds::default();
    let mut pages_fetched = 0usize;
    let mut chunks_abandoned = 0usize;
    let mut stop = StopReason::WindowExhausted;

    for chunk in window.chunks(settings.chunk_days) {
        if seen.len() >= settings.max_total_ads {
            stop = StopReason::TotalCapReached;
            break;
        }

        tracing::info!(
            term = target.term,
            from = %chunk.start.format(API_DATE_FORMAT),
            to = %chunk.end.format(API_DATE_FORMAT),
            "searching ads"
        );

        if let Err(e) =
            collect_chunk(search, target, settings, chunk, &mut seen, &mut pages_fetched).await
        {
            chunks_abandoned += 1;
            tracing::warn!(
                term = target.term,
                from = %chunk.start.format(API_DATE_FORMAT),
                to = %chunk.end.format(API_DATE_FORMAT),
                error = %e,
                "request failed; abandoning chunk"
            );
        }
    }

    if seen.len() >= settings.max_total_ads {
        stop = StopReason::TotalCapReached;
    }

    tracing::info!(
        term = target.term,
        ads = seen.len(),
        pages_fetched,
        chunks_abandoned,
        ?stop,
        "collection finished"
    );

    Collection {
        term: target.term.to_owned(),
        country: target.country.to_owned(),
        window,
        ads: seen.ads,
        pages_fetched,
        chunks_abandoned,
        stop,
    }
}

/// Pages through one chunk, adding new ads to `seen`.
async fn collect_chunk<S: AdSearch>(
    search: &S,
    target: &SearchTarget<'_>,
    settings: &CollectorSettings,
    chunk: DateChunk,
    seen: &mut SeenAds,
    pages_fetched: &mut usize,
) -> Result<(), ClientError> {
    let query = AdQuery {
        search_term: target.term,
        country: target.country,
        min_date: chunk.start,
        max_date: chunk.end,
        max_count: settings.max_ads_per_request,
    };

    let mut offset = 0u64;
    let mut page_count = 0u32;

    while page_count < settings.max_pages_per_chunk && seen.len() < settings.max_total_ads {
        if page_count > 0 && !settings.inter_request_delay.is_zero() {
            tokio::time::sleep(settings.inter_request_delay).await;
        }
        page_count += 1;

        let page = retry_rate_limited(
            settings.rate_limit_backoff,
            settings.rate_limit_max_retries,
            || search.search_page(&query, offset),
        )
        .await?;
        *pages_fetched += 1;

        let returned = page.ads.len();
        let mut added = 0usize;
        for summary in page.ads.iter().cloned() {
            if seen.len() >= settings.max_total_ads {
                break;
            }
            if let Some(ad) = CollectedAd::from_summary(summary) {
                if seen.insert(ad) {
                    added += 1;
                }
            }
        }

        tracing::debug!(
            term = target.term,
            offset,
            returned,
            added,
            has_more = page.has_more,
            "page processed"
        );

        offset = page.next_offset(offset, settings.max_ads_per_request);
        if !page.has_more {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "collector_test.rs"]
mod tests;
