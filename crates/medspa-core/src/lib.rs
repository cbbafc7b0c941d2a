pub mod app_config;
pub mod clinic;
pub mod config;
pub mod geo;
pub mod keywords;

pub use app_config::AppConfig;
pub use clinic::{
    EnrichedCandidate, Enrichment, PlaceDetails, RankedResult, RawCandidate, SearchQuery,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_miles, Coordinate, SearchRadius, METERS_PER_MILE};
pub use keywords::{load_keywords, resolve_keywords, DEFAULT_KEYWORDS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read keywords file {path}: {source}")]
    KeywordsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse keywords file: {0}")]
    KeywordsFileParse(#[from] serde_yaml::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
