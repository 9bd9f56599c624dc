//! Application configuration
//!
//! Loaded from a JSON file (default `./listings.json`). Every field has a
//! default, so an empty object is a valid configuration. The
//! `LISTINGS_API_KEY` environment variable, when set, adds an accepted API
//! key on top of the configured ones.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;
use crate::planner::DEFAULT_LIMIT;
use crate::store::IndexPolicy;

/// Environment variable holding an extra accepted API key
pub const API_KEY_ENV: &str = "LISTINGS_API_KEY";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: HttpServerConfig,

    /// Accepted values for the `x-api-key` header
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Collection holding listings (default: "listings")
    #[serde(default = "default_collection")]
    pub collection: String,

    /// JSON array of listings loaded into the store at startup
    #[serde(default)]
    pub seed_path: Option<PathBuf>,

    /// Composite indexes the store serves
    #[serde(default)]
    pub index_policy: IndexPolicy,

    /// Result cap for searches that do not pick one (default: 20)
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_collection() -> String {
    "listings".to_string()
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            api_keys: Vec::new(),
            collection: default_collection(),
            seed_path: None,
            index_policy: IndexPolicy::default(),
            default_limit: default_limit(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path`, then applies environment overrides.
    ///
    /// A relative `seed_path` is resolved against the config file's directory.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&content)?;

        if let (Some(seed), Some(dir)) = (config.seed_path.as_mut(), path.parent()) {
            if seed.is_relative() {
                *seed = dir.join(&*seed);
            }
        }

        config.apply_env(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Parses and validates configuration JSON
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Appends an API key taken from the environment
    pub fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            if !self.api_keys.contains(&key) {
                self.api_keys.push(key);
            }
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.default_limit == 0 {
            return Err(ConfigError::Invalid("default_limit must be > 0".into()));
        }
        self.server.validate().map_err(ConfigError::Invalid)?;
        if self.collection.is_empty() {
            return Err(ConfigError::Invalid("collection must not be empty".into()));
        }
        if self.api_keys.iter().any(String::is_empty) {
            return Err(ConfigError::Invalid("api_keys must not contain empty keys".into()));
        }
        Ok(())
    }
}
