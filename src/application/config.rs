//! Miner configuration.
//!
//! All parameters are fixed when the miner is built and never change
//! afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of leading tokens used to discriminate tree paths.
pub const DEFAULT_DEPTH: usize = 4;
/// Default fan-out cap per tree node.
pub const DEFAULT_MAX_CHILDREN: usize = 100;
/// Default similarity value. Accepted for compatibility, not used for matching.
pub const DEFAULT_SIMILARITY: f64 = 0.5;
/// Default number of distinct raw lines sampled per cluster.
pub const DEFAULT_MAX_RAW_SAMPLES: usize = 64;

/// Error returned when a miner configuration is invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Every node would overflow into the wildcard child immediately
    #[error("max_children must be greater than 0")]
    ZeroMaxChildren,
    /// Similarity must be a finite number
    #[error("similarity must be a finite number, got {0}")]
    InvalidSimilarity(f64),
}

/// Construction-time parameters of a [`TemplateMiner`](crate::TemplateMiner).
///
/// Deserializes from partial documents; missing fields take their defaults.
///
/// ```
/// use log_template_miner::MinerConfig;
///
/// let config: MinerConfig = serde_json::from_str(r#"{ "depth": 2 }"#).unwrap();
/// assert_eq!(config.depth, 2);
/// assert_eq!(config.max_children, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Number of leading tokens used to discriminate tree paths
    pub depth: usize,
    /// Children per node before unseen tokens fall back to the wildcard child
    pub max_children: usize,
    /// Similarity threshold. Stored and reported, never consulted
    pub similarity: f64,
    /// Distinct raw lines sampled per cluster for diagnostics
    pub max_raw_samples: usize,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            max_children: DEFAULT_MAX_CHILDREN,
            similarity: DEFAULT_SIMILARITY,
            max_raw_samples: DEFAULT_MAX_RAW_SAMPLES,
        }
    }
}

impl MinerConfig {
    /// Check the configuration for values the miner cannot work with.
    ///
    /// # Errors
    /// Returns `ConfigError` if `max_children` is zero or `similarity` is
    /// NaN or infinite. Any finite similarity is accepted since matching
    /// never reads it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_children == 0 {
            return Err(ConfigError::ZeroMaxChildren);
        }
        if !self.similarity.is_finite() {
            return Err(ConfigError::InvalidSimilarity(self.similarity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MinerConfig::default();
        assert_eq!(config.depth, 4);
        assert_eq!(config.max_children, 100);
        assert!((config.similarity - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.max_raw_samples, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_children_rejected() {
        let config = MinerConfig {
            max_children: 0,
            ..MinerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxChildren));
    }

    #[test]
    fn test_similarity_bounds() {
        // Out-of-range values load, as older configs may carry them
        for similarity in [0.0, 0.25, 1.0, -0.1, 1.5, 40.0] {
            let config = MinerConfig {
                similarity,
                ..MinerConfig::default()
            };
            assert!(config.validate().is_ok(), "{} should be valid", similarity);
        }

        for similarity in [f64::INFINITY, f64::NEG_INFINITY] {
            let config = MinerConfig {
                similarity,
                ..MinerConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidSimilarity(similarity))
            );
        }

        let config = MinerConfig {
            similarity: f64::NAN,
            ..MinerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSimilarity(_))
        ));
    }

    #[test]
    fn test_zero_depth_is_valid() {
        let config = MinerConfig {
            depth: 0,
            ..MinerConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: MinerConfig =
            serde_json::from_str(r#"{ "max_children": 8, "similarity": 0.7 }"#).unwrap();
        assert_eq!(config.depth, DEFAULT_DEPTH);
        assert_eq!(config.max_children, 8);
        assert!((config.similarity - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConfigError::ZeroMaxChildren.to_string(),
            "max_children must be greater than 0"
        );
        assert_eq!(
            ConfigError::InvalidSimilarity(f64::INFINITY).to_string(),
            "similarity must be a finite number, got inf"
        );
    }
}
