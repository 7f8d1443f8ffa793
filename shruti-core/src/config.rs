//! Configuration parameters for pitch-contour analysis

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::AnalysisError;

/// Default Sa: middle C (C4).
pub const DEFAULT_TONIC_HZ: f32 = 261.63;

/// Frames at or below this voicing probability are discarded.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.6;

/// Upper bound on points kept in the displayed contour.
pub const DEFAULT_MAX_POINTS: usize = 300;

/// Time step between extractor frames: hop of 256 samples at 16 kHz.
pub const DEFAULT_HOP_SECONDS: f32 = 256.0 / 16_000.0;

/// Analysis configuration parameters.
///
/// Every field is optional in the JSON form; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Frequency of the singer's Sa in Hz (default: 261.63)
    pub tonic_hz: f32,

    /// Minimum confidence for a voiced frame to be used (default: 0.6, exclusive)
    pub confidence_threshold: f32,

    /// Maximum number of contour points kept after downsampling (default: 300)
    pub max_points: usize,

    /// Seconds between consecutive extractor frames (default: 0.016)
    pub hop_seconds: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tonic_hz: DEFAULT_TONIC_HZ,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_points: DEFAULT_MAX_POINTS,
            hop_seconds: DEFAULT_HOP_SECONDS,
        }
    }
}

impl AnalysisConfig {
    /// Same defaults with a different tonic.
    pub fn with_tonic(tonic_hz: f32) -> Self {
        Self {
            tonic_hz,
            ..Self::default()
        }
    }

    /// Checks the parameters that do not depend on the tonic.
    ///
    /// The tonic is validated separately so that a bad tonic is always
    /// reported as [`AnalysisError::InvalidTonic`].
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(0.0..1.0).contains(&self.confidence_threshold) {
            return Err(AnalysisError::InvalidConfig(format!(
                "confidence_threshold must be in [0, 1), got {}",
                self.confidence_threshold
            )));
        }
        if self.max_points < 2 {
            return Err(AnalysisError::InvalidConfig(format!(
                "max_points must be at least 2, got {}",
                self.max_points
            )));
        }
        if !self.hop_seconds.is_finite() || self.hop_seconds <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "hop_seconds must be positive, got {}",
                self.hop_seconds
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let config: AnalysisConfig =
            serde_json::from_str(json).map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file written as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&data)?;
        log::debug!("Loaded analysis config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_points, 300);
        assert!((config.hop_seconds - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AnalysisConfig::from_json_str(r#"{ "tonic_hz": 220.0 }"#).unwrap();
        assert_eq!(config.tonic_hz, 220.0);
        assert_eq!(config.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(config.max_points, DEFAULT_MAX_POINTS);
    }

    #[test]
    fn test_rejects_bad_values() {
        let result = AnalysisConfig::from_json_str(r#"{ "max_points": 1 }"#);
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));

        let result = AnalysisConfig::from_json_str(r#"{ "hop_seconds": 0.0 }"#);
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));

        let result = AnalysisConfig::from_json_str("not json");
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = AnalysisConfig::load("/definitely/not/here/shruti.json");
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }
}
