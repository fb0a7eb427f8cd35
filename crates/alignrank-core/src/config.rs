//! Pipeline configuration.
//!
//! Loaded from TOML; every key is optional and falls back to its default.
//!
//! ```
//! use alignrank_core::PipelineConfig;
//!
//! let config = PipelineConfig::from_toml_str(r#"
//!     rater_model = "gemini-2.0-flash-exp"
//!
//!     [ranker]
//!     limit = 3
//! "#).unwrap();
//!
//! assert_eq!(config.ranker.limit, 3);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{RankError, Result};
use crate::ranker::DEFAULT_LIMIT;

/// Ranker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Maximum number of sequences selected per substandard.
    pub limit: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl RankerConfig {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Settings for a remap run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ranker: RankerConfig,
    /// Label of the model that produced the ratings, recorded in output metadata.
    pub rater_model: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ranker: RankerConfig::default(),
            rater_model: "gemini-2.0-flash-exp".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> std::result::Result<(), RankError> {
        if self.ranker.limit == 0 {
            return Err(RankError::InvalidArgument(
                "ranker.limit must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AlignError;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.ranker.limit, 5);
        assert_eq!(config.rater_model, "gemini-2.0-flash-exp");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = PipelineConfig::from_toml_str("[ranker]\nlimit = 8\n").unwrap();
        assert_eq!(config.ranker.limit, 8);
        assert_eq!(config.rater_model, "gemini-2.0-flash-exp");
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = PipelineConfig::from_toml_str("[ranker]\nlimit = 0\n").unwrap_err();
        assert!(matches!(err, AlignError::Rank(RankError::InvalidArgument(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = PipelineConfig::from_toml_str("[ranker\nlimit = 3").unwrap_err();
        assert!(matches!(err, AlignError::Config(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alignrank.toml");
        std::fs::write(&path, "rater_model = \"offline-fixture\"\n").unwrap();
        let config = PipelineConfig::from_path(&path).unwrap();
        assert_eq!(config.rater_model, "offline-fixture");
        assert_eq!(config.ranker.limit, 5);
    }
}
