//! # Configuration
//!
//! Repository-level settings for the metadata merge. Today that is only the
//! tarball path prefix, loaded from a JSON file and optionally overridden by the
//! `NPM_META_PATH_PREFIX` environment variable.
//!
//! ```rust,no_run
//! use npm_meta::MetaConfig;
//!
//! // Load from file with fallback to defaults, then apply the environment
//! let config = MetaConfig::load_or_default("npm-meta.json")?.with_env_overrides();
//! # Ok::<(), npm_meta::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Environment variable overriding [`MetaConfig::path_prefix`]
pub const PATH_PREFIX_ENV: &str = "NPM_META_PATH_PREFIX";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings for metadata updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    /// Prefix for rewritten tarball URLs, e.g. `https://registry.example.com/npm/`.
    /// `None` keeps tarball URLs exactly as uploaded.
    pub path_prefix: Option<String>,
}

impl MetaConfig {
    pub fn new(path_prefix: Option<String>) -> Self {
        Self {
            path_prefix: normalize_prefix(path_prefix),
        }
    }

    /// Load configuration from a JSON file. Fails if the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: MetaConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.display().to_string(),
                source,
            })?;
        debug!(path = %path.display(), prefix = ?config.path_prefix, "Loaded npm-meta config");
        Ok(Self::new(config.path_prefix))
    }

    /// Load configuration from a JSON file, or use defaults if it does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply `NPM_META_PATH_PREFIX` if it is set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(PATH_PREFIX_ENV) {
            Some(prefix) => {
                debug!(prefix = %prefix, "Path prefix overridden from environment");
                self.with_path_prefix(Some(prefix))
            }
            None => self,
        }
    }

    pub fn with_path_prefix(mut self, path_prefix: Option<String>) -> Self {
        self.path_prefix = normalize_prefix(path_prefix);
        self
    }
}

// Blank prefixes disable rewriting.
fn normalize_prefix(prefix: Option<String>) -> Option<String> {
    prefix.filter(|p| !p.trim().is_empty())
}
