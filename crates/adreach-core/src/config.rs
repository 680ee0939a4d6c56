use crate::app_config::{AppConfig, MAX_MONTHS_BACK};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a tunable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a tunable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials are optional here; commands that need them call
/// [`AppConfig::require_credentials`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let value = parse_u32(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let client_key = optional("TIKTOK_CLIENT_KEY");
    let client_secret = optional("TIKTOK_CLIENT_SECRET");

    let log_level = or_default("ADREACH_LOG_LEVEL", "info");
    let api_base_url = or_default("ADREACH_API_BASE_URL", "https://open.tiktokapis.com/");
    let request_timeout_secs = parse_u64("ADREACH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ADREACH_USER_AGENT", "adreach/0.1 (ad-transparency)");

    let country = parse_country(&or_default("ADREACH_COUNTRY", "NL"))
        .map_err(|reason| invalid("ADREACH_COUNTRY", reason))?;
    let months_back = parse_u32("ADREACH_MONTHS_BACK", "12")?;
    if months_back > MAX_MONTHS_BACK {
        return Err(invalid(
            "ADREACH_MONTHS_BACK",
            format!("must be at most {MAX_MONTHS_BACK}"),
        ));
    }
    let chunk_days = parse_positive_u32("ADREACH_CHUNK_DAYS", "10")?;
    let max_ads_per_request = parse_positive_u32("ADREACH_MAX_ADS_PER_REQUEST", "20")?;
    let max_pages_per_chunk = parse_positive_u32("ADREACH_MAX_PAGES_PER_CHUNK", "1000")?;
    let max_total_ads = parse_usize("ADREACH_MAX_TOTAL_ADS", "10000")?;
    let inter_request_delay_ms = parse_u64("ADREACH_INTER_REQUEST_DELAY_MS", "1000")?;
    let rate_limit_backoff_secs = parse_u64("ADREACH_RATE_LIMIT_BACKOFF_SECS", "5")?;
    let rate_limit_max_retries = optional("ADREACH_RATE_LIMIT_MAX_RETRIES")
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|e| invalid("ADREACH_RATE_LIMIT_MAX_RETRIES", e.to_string()))
        })
        .transpose()?;

    Ok(AppConfig {
        client_key,
        client_secret,
        log_level,
        api_base_url,
        request_timeout_secs,
        user_agent,
        country,
        months_back,
        chunk_days,
        max_ads_per_request,
        max_pages_per_chunk,
        max_total_ads,
        inter_request_delay_ms,
        rate_limit_backoff_secs,
        rate_limit_max_retries,
    })
}

/// Validates a two-letter ISO country code and returns it upper-cased.
///
/// # Errors
///
/// Returns a human-readable reason when the input is not exactly two ASCII
/// letters.
pub fn parse_country(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(format!("expected a two-letter country code, got \"{raw}\""))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
