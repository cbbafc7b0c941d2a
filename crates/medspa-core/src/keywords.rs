use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Keywords searched when no keywords file is configured, in search order.
pub const DEFAULT_KEYWORDS: [&str; 7] = [
    "med spa",
    "aesthetic clinic",
    "dermatology",
    "botox",
    "lip filler",
    "facial spa",
    "cosmetic dermatology",
];

#[derive(Debug, Deserialize)]
pub struct KeywordsFile {
    pub keywords: Vec<String>,
}

/// Load and validate a keyword list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_keywords(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::KeywordsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_keywords(&content)
}

/// Returns the keywords from `path` when given, otherwise [`DEFAULT_KEYWORDS`].
///
/// # Errors
///
/// Returns `ConfigError` if a configured file cannot be loaded.
pub fn resolve_keywords(path: Option<&Path>) -> Result<Vec<String>, ConfigError> {
    match path {
        Some(path) => load_keywords(path),
        None => Ok(DEFAULT_KEYWORDS.iter().map(ToString::to_string).collect()),
    }
}

fn parse_keywords(content: &str) -> Result<Vec<String>, ConfigError> {
    let file: KeywordsFile = serde_yaml::from_str(content)?;
    let keywords: Vec<String> = file
        .keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .collect();
    validate_keywords(&keywords)?;
    Ok(keywords)
}

fn validate_keywords(keywords: &[String]) -> Result<(), ConfigError> {
    if keywords.is_empty() {
        return Err(ConfigError::Validation(
            "keyword list must not be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for keyword in keywords {
        if keyword.is_empty() {
            return Err(ConfigError::Validation(
                "keywords must be non-empty".to_string(),
            ));
        }
        if !seen.insert(keyword.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate keyword: '{keyword}'"
            )));
        }
    }

    Ok(())
}
