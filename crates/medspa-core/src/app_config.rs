use std::path::PathBuf;

use crate::geo::SearchRadius;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub google_maps_api_key: String,
    pub places_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub default_radius: SearchRadius,
    pub keywords_path: Option<PathBuf>,
    pub geolocation_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("google_maps_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("default_radius", &self.default_radius)
            .field("keywords_path", &self.keywords_path)
            .field("geolocation_timeout_secs", &self.geolocation_timeout_secs)
            .finish()
    }
}
