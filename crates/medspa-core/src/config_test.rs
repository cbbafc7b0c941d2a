use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GOOGLE_MAPS_API_KEY", "test-key");
    m
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GOOGLE_MAPS_API_KEY"),
        "expected MissingEnvVar(GOOGLE_MAPS_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_MAPS_API_KEY", "  ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.google_maps_api_key, "test-key");
    assert_eq!(cfg.places_base_url, "https://maps.googleapis.com/maps/api/");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "medspa/0.1 (clinic-locator)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.default_radius, SearchRadius::Ten);
    assert!(cfg.keywords_path.is_none());
    assert_eq!(cfg.geolocation_timeout_secs, 10);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = full_env();
    map.insert("MEDSPA_LOG_LEVEL", "debug");
    map.insert("MEDSPA_MAX_RETRIES", "0");
    map.insert("MEDSPA_DEFAULT_RADIUS_MILES", "25");
    map.insert("MEDSPA_KEYWORDS_PATH", "./config/keywords.yaml");
    map.insert("MEDSPA_PLACES_BASE_URL", "http://127.0.0.1:9000/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.default_radius, SearchRadius::TwentyFive);
    assert_eq!(
        cfg.keywords_path.as_deref(),
        Some(std::path::Path::new("./config/keywords.yaml"))
    );
    assert_eq!(cfg.places_base_url, "http://127.0.0.1:9000/");
}

#[test]
fn build_app_config_rejects_radius_outside_menu() {
    let mut map = full_env();
    map.insert("MEDSPA_DEFAULT_RADIUS_MILES", "15");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MEDSPA_DEFAULT_RADIUS_MILES"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = full_env();
    map.insert("MEDSPA_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MEDSPA_REQUEST_TIMEOUT_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_geolocation_timeout() {
    let mut map = full_env();
    map.insert("MEDSPA_GEOLOCATION_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = full_env();
    map.insert("MEDSPA_PLACES_BASE_URL", "ftp://maps.example");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MEDSPA_PLACES_BASE_URL"),
        "got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-key"), "{rendered}");
    assert!(rendered.contains("[redacted]"));
}
