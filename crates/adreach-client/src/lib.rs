//! Client for the TikTok Commercial Content ad library API.
//!
//! Exchanges client credentials for an access token, queries the ad search
//! endpoint page by page, fetches per-ad details, and drives the
//! date-windowed collection of ad identifiers for a search term.

pub mod client;
pub mod collector;
pub mod error;
pub mod rate_limit;
pub mod types;
pub mod window;

pub use client::AdLibraryClient;
pub use collector::{
    collect_ad_ids, AdSearch, Collection, CollectorSettings, SearchTarget, StopReason,
};
pub use error::ClientError;
pub use types::{AccessToken, AdQuery, AdQueryPage, CollectedAd};
pub use window::{DateChunk, DateWindow};
