use crate::ConfigError;

/// Client credentials for the ad library OAuth token exchange.
#[derive(Clone)]
pub struct ApiCredentials {
    pub client_key: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("client_key", &self.client_key)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

/// Longest accepted lookback, in months.
pub const MAX_MONTHS_BACK: u32 = 120;

#[derive(Clone)]
pub struct AppConfig {
    pub client_key: Option<String>,
    pub client_secret: Option<String>,
    pub log_level: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub country: String,
    pub months_back: u32,
    pub chunk_days: u32,
    pub max_ads_per_request: u32,
    pub max_pages_per_chunk: u32,
    pub max_total_ads: usize,
    pub inter_request_delay_ms: u64,
    pub rate_limit_backoff_secs: u64,
    /// `None` retries rate-limited requests indefinitely.
    pub rate_limit_max_retries: Option<u32>,
}

impl AppConfig {
    /// Returns the API credentials, failing if either half is unset.
    ///
    /// Commands that talk to the API call this before any network activity
    /// so a missing credential aborts the run up front.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming `TIKTOK_CLIENT_KEY`
    /// (checked first) or `TIKTOK_CLIENT_SECRET`.
    pub fn require_credentials(&self) -> Result<ApiCredentials, ConfigError> {
        let client_key = self
            .client_key
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("TIKTOK_CLIENT_KEY".to_string()))?;
        let client_secret = self
            .client_secret
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("TIKTOK_CLIENT_SECRET".to_string()))?;
        Ok(ApiCredentials {
            client_key,
            client_secret,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("client_key", &self.client_key)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("country", &self.country)
            .field("months_back", &self.months_back)
            .field("chunk_days", &self.chunk_days)
            .field("max_ads_per_request", &self.max_ads_per_request)
            .field("max_pages_per_chunk", &self.max_pages_per_chunk)
            .field("max_total_ads", &self.max_total_ads)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("rate_limit_backoff_secs", &self.rate_limit_backoff_secs)
            .field("rate_limit_max_retries", &self.rate_limit_max_retries)
            .finish()
    }
}
