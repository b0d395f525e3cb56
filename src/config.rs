//! Configuration for rating validation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a `RatingMatrix`.
///
/// The accepted score range is a validation rule, not a property of the
/// structure itself; matrices with different ranges behave identically
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Smallest accepted score (inclusive, default: 1.0)
    pub min_score: f64,
    /// Largest accepted score (inclusive, default: 5.0)
    pub max_score: f64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            min_score: 1.0,
            max_score: 5.0,
        }
    }
}

impl MatrixConfig {
    /// Create a config that accepts any finite score.
    pub fn unbounded() -> Self {
        Self {
            min_score: f64::MIN,
            max_score: f64::MAX,
        }
    }

    /// Builder method to set the accepted score range (inclusive on both ends).
    pub fn with_score_range(mut self, min: f64, max: f64) -> Self {
        self.min_score = min;
        self.max_score = max;
        self
    }

    /// Check a score against the configured range.
    ///
    /// Non-finite scores are rejected regardless of the range.
    pub(crate) fn validate_score(&self, score: f64) -> Result<()> {
        if !score.is_finite() {
            return Err(Error::invalid_input(format!(
                "score {score} is not a finite number"
            )));
        }
        if score < self.min_score || score > self.max_score {
            return Err(Error::invalid_input(format!(
                "score {score} outside {}..={}",
                self.min_score, self.max_score
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range() {
        let config = MatrixConfig::default();
        assert!(config.validate_score(1.0).is_ok());
        assert!(config.validate_score(5.0).is_ok());
        assert!(config.validate_score(3.5).is_ok());
        assert!(config.validate_score(0.5).is_err());
        assert!(config.validate_score(5.5).is_err());
    }

    #[test]
    fn test_non_finite_scores_rejected() {
        let config = MatrixConfig::unbounded();
        assert!(config.validate_score(f64::NAN).is_err());
        assert!(config.validate_score(f64::INFINITY).is_err());
        assert!(config.validate_score(f64::NEG_INFINITY).is_err());
        assert!(config.validate_score(-1e300).is_ok());
    }

    #[test]
    fn test_builder() {
        let config = MatrixConfig::default().with_score_range(0.0, 10.0);
        assert!(config.validate_score(0.0).is_ok());
        assert!(config.validate_score(10.0).is_ok());
        assert!(config.validate_score(10.1).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = MatrixConfig::default().with_score_range(0.0, 100.0);
        let json = serde_json::to_string(&config).unwrap();
        let back: MatrixConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
