use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod app_config;
pub mod canonical;
pub mod config;
pub mod families;
pub mod matcher;

pub use app_config::{AppConfig, Environment};
pub use canonical::canonicalize;
pub use config::{load_app_config, load_app_config_from_env};
pub use families::{load_families, FamiliesFile, FamilyConfig, FamilyIndex};
pub use matcher::StoreMatcher;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// The resolved coordinate and label for a store query.
///
/// Immutable once produced; cached at the memory and persistent tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
    /// The candidate name that passed the signature matcher.
    pub matched_name: String,
}

/// Optional scraper-supplied data passed alongside a store name to bias
/// matching toward known address/alias information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreGeocodeMetadata {
    /// A physical address string (or provider store ID) from the scraper.
    pub hint: Option<String>,
    /// Extra display names this store is known under.
    pub aliases: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read families file at {path}: {source}")]
    FamiliesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse families file: {0}")]
    FamiliesFileParse(#[from] serde_yaml::Error),

    #[error("families validation error: {0}")]
    Validation(String),
}
