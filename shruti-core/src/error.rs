//! Error types for the shruti analysis pipeline

use std::fmt;

/// Outcomes that stop an analysis run before a result is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No frame survived the voicing/confidence filter.
    ///
    /// A silent or fully unvoiced recording is a legitimate end state, so
    /// callers usually report this to the singer rather than treat it as a fault.
    NoVoiceDetected,

    /// Tonic frequency was zero, negative or not finite
    InvalidTonic(f32),

    /// The pitch track from the extractor could not be interpreted
    MalformedInput(String),

    /// Configuration could not be read or failed validation
    InvalidConfig(String),
}

impl AnalysisError {
    /// True for the "nothing was sung" outcome.
    pub fn is_no_voice(&self) -> bool {
        matches!(self, AnalysisError::NoVoiceDetected)
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::NoVoiceDetected => write!(f, "No voice detected in the recording"),
            AnalysisError::InvalidTonic(hz) => write!(f, "Invalid tonic frequency: {} Hz", hz),
            AnalysisError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            AnalysisError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
