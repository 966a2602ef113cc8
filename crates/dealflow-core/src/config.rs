//! Core configuration.
//!
//! Everything the core needs at runtime is passed in as one `CoreConfig`
//! value. Every field has a default, so `{}` is a complete config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolver::ResolverPolicy;
use crate::timeline::TimelineOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub resolver: ResolverPolicy,
    pub timeline: TimelineOptions,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default_config() {
        assert_eq!(CoreConfig::from_json_str("{}").unwrap(), CoreConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config =
            CoreConfig::from_json_str(r#"{"resolver": {"max_conflict_retries": 7}}"#).unwrap();
        assert_eq!(config.resolver.max_conflict_retries, 7);
        assert_eq!(config.timeline, TimelineOptions::default());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            CoreConfig::from_json_str("{resolver"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CoreConfig::load("/nonexistent/dealflow.json").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/dealflow.json"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
