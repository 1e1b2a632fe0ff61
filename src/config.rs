use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ProsodyError;

/// Relative weights of the three ranking sub-scores.
///
/// Weights are normalized by their sum, so `(2, 1, 1)` and `(1.0, 0.5, 0.5)`
/// rank identically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankWeights {
    pub syllable: f64,
    pub rhyme: f64,
    pub meter: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            syllable: 1.0,
            rhyme: 1.0,
            meter: 1.0,
        }
    }
}

impl RankWeights {
    pub fn total(&self) -> f64 {
        self.syllable + self.rhyme + self.meter
    }
}

/// Tunable thresholds for checking and ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(default, build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum meter fit before a line is flagged. Range: 0.0–1.0, default 0.8.
    pub meter_threshold: f64,
    pub weights: RankWeights,
    /// Rhyme sub-score awarded for a slant rhyme. Default 0.7.
    pub slant_credit: f64,
    /// Syllable sub-score lost per syllable of deviation. Default 0.2.
    pub syllable_penalty: f64,
    /// Largest syllable delta downgraded to a warning when the count rests
    /// on heuristic pronunciations. Default 1.
    pub heuristic_tolerance: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            meter_threshold: 0.8,
            weights: RankWeights::default(),
            slant_credit: 0.7,
            syllable_penalty: 0.2,
            heuristic_tolerance: 1,
        }
    }
}

impl EngineConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            meter_threshold: self.meter_threshold.unwrap_or(defaults.meter_threshold),
            weights: self.weights.unwrap_or(defaults.weights),
            slant_credit: self.slant_credit.unwrap_or(defaults.slant_credit),
            syllable_penalty: self.syllable_penalty.unwrap_or(defaults.syllable_penalty),
            heuristic_tolerance: self
                .heuristic_tolerance
                .unwrap_or(defaults.heuristic_tolerance),
        };
        config.check()
    }
}

impl From<EngineConfigBuilderError> for ProsodyError {
    fn from(err: EngineConfigBuilderError) -> Self {
        ProsodyError::Config(err.to_string())
    }
}

impl EngineConfig {
    /// Parse a JSON object. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ProsodyError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| ProsodyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ProsodyError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProsodyError> {
        self.check().map_err(ProsodyError::Config)
    }

    fn check(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.meter_threshold) {
            return Err(format!(
                "meter_threshold must be within 0.0..=1.0, got {}",
                self.meter_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.slant_credit) {
            return Err(format!(
                "slant_credit must be within 0.0..=1.0, got {}",
                self.slant_credit
            ));
        }
        if !(self.syllable_penalty >= 0.0 && self.syllable_penalty.is_finite()) {
            return Err(format!(
                "syllable_penalty must be a non-negative number, got {}",
                self.syllable_penalty
            ));
        }
        let w = &self.weights;
        if [w.syllable, w.rhyme, w.meter]
            .iter()
            .any(|x| !(x.is_finite() && *x >= 0.0))
        {
            return Err("rank weights must be non-negative numbers".to_string());
        }
        if w.total() <= 0.0 {
            return Err("at least one rank weight must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineConfig, EngineConfigBuilder, RankWeights};
    use crate::error::ProsodyError;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.meter_threshold, 0.8);
        assert_eq!(config.slant_credit, 0.7);
        assert_eq!(config.heuristic_tolerance, 1);
        assert_eq!(config.weights.total(), 3.0);
        config.validate().unwrap();
    }

    #[test]
    fn builder_fills_unset_fields_with_defaults() {
        let config = EngineConfigBuilder::default()
            .meter_threshold(0.6)
            .build()
            .unwrap();
        assert_eq!(config.meter_threshold, 0.6);
        assert_eq!(config.slant_credit, 0.7);

        let err = EngineConfigBuilder::default()
            .slant_credit(1.5)
            .build()
            .unwrap_err();
        assert!(ProsodyError::from(err).to_string().contains("slant_credit"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"weights": {"meter": 3.0}, "heuristic_tolerance": 0}"#)
                .unwrap();
        assert_eq!(
            config.weights,
            RankWeights {
                syllable: 1.0,
                rhyme: 1.0,
                meter: 3.0
            }
        );
        assert_eq!(config.heuristic_tolerance, 0);
        assert_eq!(config.meter_threshold, 0.8);
    }

    #[test]
    fn rejects_bad_values() {
        for json in [
            r#"{"meter_threshold": 1.2}"#,
            r#"{"weights": {"syllable": 0, "rhyme": 0, "meter": 0}}"#,
            r#"{"weights": {"rhyme": -1}}"#,
            r#"{"syllable_penalty": -0.1}"#,
            "[1, 2]",
        ] {
            assert!(
                matches!(EngineConfig::from_json_str(json), Err(ProsodyError::Config(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("prosody-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"slant_credit": 0.5}"#).unwrap();
        let config = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.slant_credit, 0.5);

        assert!(matches!(
            EngineConfig::load(std::path::Path::new("/nonexistent/prosody.json")),
            Err(ProsodyError::Io(_))
        ));
    }
}
