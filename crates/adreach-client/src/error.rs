use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 429 from the ad library.
    #[error("rate limited by {endpoint}")]
    RateLimited { endpoint: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The token exchange succeeded at the HTTP level but returned no token.
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("client has no access token; call authenticate first")]
    NotAuthenticated,

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
