use crate::app_config::AppConfig;
use crate::geo::SearchRadius;
use crate::ConfigError;

const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let google_maps_api_key = require("GOOGLE_MAPS_API_KEY")?;

    let log_level = or_default("MEDSPA_LOG_LEVEL", "info");
    let places_base_url = or_default("MEDSPA_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    if !places_base_url.starts_with("http://") && !places_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "MEDSPA_PLACES_BASE_URL".to_string(),
            reason: format!("'{places_base_url}' is not an http(s) URL"),
        });
    }

    let request_timeout_secs = parse_u64("MEDSPA_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("MEDSPA_USER_AGENT", "medspa/0.1 (clinic-locator)");
    let max_retries = parse_u32("MEDSPA_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("MEDSPA_RETRY_BACKOFF_BASE_MS", "500")?;

    let default_radius = or_default("MEDSPA_DEFAULT_RADIUS_MILES", "10")
        .parse::<SearchRadius>()
        .map_err(|reason| ConfigError::InvalidEnvVar {
            var: "MEDSPA_DEFAULT_RADIUS_MILES".to_string(),
            reason,
        })?;

    let keywords_path = lookup("MEDSPA_KEYWORDS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let geolocation_timeout_secs = parse_u64("MEDSPA_GEOLOCATION_TIMEOUT_SECS", "10")?;
    if geolocation_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "MEDSPA_GEOLOCATION_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        log_level,
        google_maps_api_key,
        places_base_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        default_radius,
        keywords_path,
        geolocation_timeout_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
