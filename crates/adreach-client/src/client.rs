//! HTTP client for the TikTok Commercial Content ad library.
//!
//! Wraps `reqwest` with the OAuth client-credentials exchange, the ad query
//! (search) endpoint, and the ad detail endpoint. Rate limiting is surfaced
//! as [`ClientError::RateLimited`]; retrying is the caller's decision (see
//! [`crate::rate_limit`]).

use std::time::Duration;

use adreach_core::{AdId, ApiCredentials};
use reqwest::{Client, StatusCode, Url};

use crate::error::ClientError;
use crate::types::{AccessToken, AdQuery, AdQueryPage, AdQueryResponse, TokenResponse};

const DEFAULT_BASE_URL: &str = "https://open.tiktokapis.com/";

const TOKEN_PATH: &str = "v2/oauth/token/";
const AD_QUERY_PATH: &str = "v2/research/adlib/ad/query/";
const AD_DETAIL_PATH: &str = "v2/research/adlib/ad/detail/";

/// Fields requested from the search endpoint. Enough to identify the ad and
/// its advertiser; reach comes from the detail endpoint.
const QUERY_FIELDS: &str = "ad.id,ad.first_shown_date,ad.last_shown_date,advertiser.business_name";

const DETAIL_FIELDS: &str = "ad.id,ad.first_shown_date,ad.last_shown_date,\
ad.image_urls,ad.videos,ad.reach,ad.rejection_info,\
ad_group.targeting_info,advertiser.business_id,\
advertiser.business_name,advertiser.paid_for_by,advertiser.profile_url";

/// Client for the ad library API.
///
/// Use [`AdLibraryClient::new`] for production or
/// [`AdLibraryClient::with_base_url`] to point at a mock server in tests.
/// Every data endpoint requires a prior successful
/// [`AdLibraryClient::authenticate`].
pub struct AdLibraryClient {
    client: Client,
    base_url: Url,
    access_token: Option<AccessToken>,
}

impl AdLibraryClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joined paths append rather than
        // replace the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            access_token: None,
        })
    }

    /// Exchanges client credentials for an access token and keeps it for
    /// subsequent requests.
    ///
    /// The token is valid for a couple of hours and is not refreshed.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ClientError::Deserialize`] if the body is not JSON.
    /// - [`ClientError::Auth`] if the response carries no `access_token`.
    pub async fn authenticate(
        &mut self,
        credentials: &ApiCredentials,
    ) -> Result<AccessToken, ClientError> {
        let url = self.endpoint(TOKEN_PATH)?;
        let form = [
            ("client_key", credentials.client_key.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self.client.post(url.clone()).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: "token exchange".to_owned(),
                source: e,
            })?;

        let Some(token) = parsed.access_token.filter(|t| !t.is_empty()) else {
            let reason = parsed
                .error_description
                .unwrap_or_else(|| "response did not include an access_token".to_owned());
            return Err(ClientError::Auth(reason));
        };

        let token = AccessToken {
            token,
            expires_in: parsed.expires_in,
        };
        tracing::info!(expires_in = ?token.expires_in, "access token obtained");
        self.access_token = Some(token.clone());
        Ok(token)
    }

    /// Fetches one page of search results. Makes a single attempt.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotAuthenticated`] if no token is held.
    /// - [`ClientError::RateLimited`] on HTTP 429.
    /// - [`ClientError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body does not match the
    ///   expected envelope.
    pub async fn query_ads_page(
        &self,
        query: &AdQuery<'_>,
        offset: u64,
    ) -> Result<AdQueryPage, ClientError> {
        let token = self.token()?;
        let mut url = self.endpoint(AD_QUERY_PATH)?;
        url.query_pairs_mut().append_pair("fields", QUERY_FIELDS);

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(token)
            .json(&query.request_body(offset))
            .send()
            .await?;
        let body = Self::check_status(response, &url, "ad/query").await?;

        let envelope: AdQueryResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: format!(
                    "ad query page (term={}, offset={offset})",
                    query.search_term
                ),
                source: e,
            })?;

        if let Some(status) = envelope.error.as_ref() {
            if status.code.as_deref().is_some_and(|code| code != "ok") {
                tracing::warn!(
                    code = ?status.code,
                    message = ?status.message,
                    search_term = query.search_term,
                    offset,
                    "ad query returned a non-ok status"
                );
            }
        }

        Ok(envelope.data.unwrap_or_default())
    }

    /// Fetches the full detail payload for one ad.
    ///
    /// The payload is returned verbatim, including its `error` status object,
    /// for persistence and later normalization.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotAuthenticated`] if no token is held.
    /// - [`ClientError::RateLimited`] on HTTP 429.
    /// - [`ClientError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not JSON.
    pub async fn fetch_ad_details(&self, ad_id: &AdId) -> Result<serde_json::Value, ClientError> {
        let token = self.token()?;
        let mut url = self.endpoint(AD_DETAIL_PATH)?;
        url.query_pairs_mut().append_pair("fields", DETAIL_FIELDS);

        let payload = serde_json::json!({ "ad_id": ad_id.to_request_value() });
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;
        let body = Self::check_status(response, &url, "ad/detail").await?;

        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: format!("ad detail (id={ad_id})"),
            source: e,
        })
    }

    fn token(&self) -> Result<&str, ClientError> {
        self.access_token
            .as_ref()
            .map(|t| t.token.as_str())
            .ok_or(ClientError::NotAuthenticated)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Maps 429 and other non-2xx statuses to typed errors and returns the
    /// body text otherwise.
    async fn check_status(
        response: reqwest::Response,
        url: &Url,
        endpoint: &str,
    ) -> Result<String, ClientError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited {
                endpoint: endpoint.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
