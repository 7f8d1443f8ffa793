//! The seam between the analysis and whatever writes the prose.

use std::fmt;

use super::engine::RuleBasedFeedback;
use super::request::FeedbackRequest;

/// Why a generator produced no text.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackError {
    /// The generator could not be reached or returned nothing usable
    GenerationUnavailable(String),
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackError::GenerationUnavailable(msg) => {
                write!(f, "Feedback generation unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for FeedbackError {}

/// Anything that turns an analysed note into a single prose critique.
///
/// External implementations would typically send [`FeedbackRequest::prompt`]
/// to a language model; [`RuleBasedFeedback`] composes text locally.
pub trait FeedbackGenerator {
    fn generate(&self, request: &FeedbackRequest) -> Result<String, FeedbackError>;
}

/// Picks the external generator when one is configured and falls back to the
/// rule-based engine otherwise, so callers always get a complete critique.
#[derive(Default)]
pub struct FeedbackService {
    external: Option<Box<dyn FeedbackGenerator + Send + Sync>>,
    fallback: RuleBasedFeedback,
}

impl FeedbackService {
    /// A service that only uses the rule-based engine.
    pub fn rule_based() -> Self {
        Self::default()
    }

    /// A service that tries `generator` first.
    pub fn with_generator(generator: Box<dyn FeedbackGenerator + Send + Sync>) -> Self {
        Self {
            external: Some(generator),
            fallback: RuleBasedFeedback,
        }
    }

    pub fn has_external_generator(&self) -> bool {
        self.external.is_some()
    }

    /// Produces the critique; never fails.
    pub fn feedback(&self, request: &FeedbackRequest) -> String {
        if let Some(generator) = &self.external {
            match generator.generate(request) {
                Ok(text) if !text.trim().is_empty() => return text,
                Ok(_) => log::warn!("External generator returned empty text, using rule-based feedback"),
                Err(e) => log::warn!("{}, using rule-based feedback", e),
            }
        }
        self.fallback.critique(request).text
    }
}

impl fmt::Debug for FeedbackService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackService")
            .field("external", &self.external.is_some())
            .finish()
    }
}
