//! Shared configuration and identifier types for adreach.

mod ad_id;
mod app_config;
mod config;

pub use ad_id::AdId;
pub use app_config::{ApiCredentials, AppConfig, MAX_MONTHS_BACK};
pub use config::{load_app_config, load_app_config_from_env, parse_country};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
