//! Run configuration — API access, window planning, and output location.
//!
//! Loaded from a TOML file; every key is optional. The subscription key can
//! also come from the `PJM_SUBSCRIPTION_KEY` environment variable, which wins
//! over the file.

use crate::data::query::DEFAULT_BASE_URL;
use crate::data::range::BoundaryStep;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides `api.subscription_key`.
pub const SUBSCRIPTION_KEY_ENV: &str = "PJM_SUBSCRIPTION_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no API subscription key: set api.subscription_key or PJM_SUBSCRIPTION_KEY")]
    MissingKey,

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub subscription_key: String,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            subscription_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// The subscription key, or `MissingKey` if none was configured.
    pub fn require_key(&self) -> Result<&str, ConfigError> {
        let key = self.subscription_key.trim();
        if key.is_empty() {
            Err(ConfigError::MissingKey)
        } else {
            Ok(key)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// `rowCount` sent with every window's request.
    pub row_count: u32,
    /// Widest range a single request may cover, in days.
    pub max_span_days: u32,
    pub boundary_step: BoundaryStep,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            row_count: 1000,
            max_span_days: 2,
            boundary_step: BoundaryStep::Day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory; each feed writes into `{root}/{endpoint}/`.
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("DataLake/Raw"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PJM_SUBSCRIPTION_KEY` if it is set and non-empty.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var(SUBSCRIPTION_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.subscription_key = key;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.row_count == 0 {
            return Err(ConfigError::Invalid("fetch.row_count must be positive".into()));
        }
        if self.fetch.max_span_days == 0 {
            return Err(ConfigError::Invalid(
                "fetch.max_span_days must be positive".into(),
            ));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        Ok(())
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, "https://api.pjm.com/api/v1");
        assert_eq!(config.fetch.row_count, 1000);
        assert_eq!(config.fetch.max_span_days, 2);
        assert_eq!(config.fetch.boundary_step, BoundaryStep::Day);
        assert_eq!(config.output.root, PathBuf::from("DataLake/Raw"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            subscription_key = "abc"

            [fetch]
            max_span_days = 3
            boundary_step = "minute"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.require_key().unwrap(), "abc");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.fetch.max_span_days, 3);
        assert_eq!(config.fetch.row_count, 1000);
        assert_eq!(config.fetch.boundary_step, BoundaryStep::Minute);
    }

    #[test]
    fn zero_span_is_invalid() {
        let err = Config::from_toml("[fetch]\nmax_span_days = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_boundary_step_is_a_parse_error() {
        let err = Config::from_toml("[fetch]\nboundary_step = \"hour\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn blank_key_is_missing() {
        let mut config = Config::default();
        config.api.subscription_key = "   ".into();
        assert!(matches!(config.api.require_key(), Err(ConfigError::MissingKey)));
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = Config::default();
        config.api.subscription_key = "k".into();
        config.fetch.boundary_step = BoundaryStep::Minute;
        let parsed = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::from_file(Path::new("/nonexistent/pjmlake.toml")).unwrap_err();
        match err {
            ConfigError::Read { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/pjmlake.toml"))
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
