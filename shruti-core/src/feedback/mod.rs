//! # Feedback Engine
//!
//! Turns an [`AnalysisResult`](crate::AnalysisResult) into a short spoken-style
//! critique. Feature extraction and text selection are pure; the only seam
//! is [`FeedbackGenerator`], which lets a caller plug in an external writer
//! while the rule-based engine stays the default and the fallback.

pub mod bands;
pub mod engine;
pub mod features;
pub mod generator;
pub mod request;

pub use bands::{AccuracyBand, DetailBand, QuickVerdict};
pub use engine::{compose_critique, quick_verdict, Critique, RuleBasedFeedback};
pub use features::{Drift, DriftDirection, FeedbackContext, Steadiness, Wobble, WobbleSeverity};
pub use generator::{FeedbackError, FeedbackGenerator, FeedbackService};
pub use request::FeedbackRequest;
