// shruti-core/src/lib.rs

//! The core logic for the shruti practice trainer.
//! This crate turns a per-frame pitch track into a tonic-relative contour,
//! measures how closely the singer held Sa, and writes a critique.
//! It is completely headless, performs no I/O during analysis and
//! contains no GUI code.
//!
//! ## Pipeline
//!
//! ```text
//! frames → filter → cents → contour sample → metrics / swara → bands → feedback
//! ```
//!
//! ```
//! use shruti_core::{analyze, AnalysisConfig, RawPitchFrame};
//!
//! let frames = vec![RawPitchFrame::new(261.63, true, 0.9, 0)];
//! let result = analyze(&frames, &AnalysisConfig::default())?;
//! assert_eq!(result.detected_swara, "Sa");
//! # Ok::<(), shruti_core::AnalysisError>(())
//! ```

pub mod annotate;
pub mod cents;
pub mod config;
pub mod contour;
pub mod error;
pub mod feedback;
pub mod frames;
pub mod metrics;
pub mod swara;

use serde::Serialize;

pub use annotate::PitchBand;
pub use cents::{CentsPoint, TonicReference};
pub use config::AnalysisConfig;
pub use contour::ContourSample;
pub use error::AnalysisError;
pub use feedback::{FeedbackRequest, FeedbackService};
pub use frames::{PitchTrack, RawPitchFrame};

/// Outcome of analysing one recording against Sa.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// The swara the singer was asked to hold; always Sa.
    pub target_swara: String,
    /// Position of the target; always 0.
    pub target_cents: f32,
    /// The swara closest to what was actually sung.
    pub detected_swara: String,
    /// Tonic the run was measured against, in Hz.
    pub tonic_hz: f32,
    /// Median of the contour on the octave circle, in `[0, 1200)`.
    pub median_cents: f32,
    /// Signed shortest distance from Sa in cents, in `[-600, 600)`.
    pub deviation: f32,
    /// Population standard deviation of the contour in cents.
    pub stability: f32,
    /// `max(0, 100 - |deviation|)`, truncated.
    pub score: u32,
    /// Sampled contour in folded cents.
    pub pitch_contour: Vec<f32>,
    /// Time of each contour point in seconds.
    pub time_points: Vec<f32>,
    /// Flat reference line at the target, one entry per contour point.
    pub target_line: Vec<f32>,
    /// Accuracy band of each contour point.
    pub deviation_colors: Vec<PitchBand>,
}

impl AnalysisResult {
    /// The request handed to a feedback generator.
    pub fn feedback_request(&self) -> FeedbackRequest {
        FeedbackRequest::from_result(self)
    }
}

/// Main analysis function.
///
/// # Arguments
/// * `frames` - Output of the external pitch extractor, in frame order
/// * `config` - Tonic, confidence threshold, contour size and frame step
///
/// # Errors
/// * [`AnalysisError::InvalidTonic`] - checked before any frame is looked at
/// * [`AnalysisError::InvalidConfig`] - other parameters out of range
/// * [`AnalysisError::MalformedInput`] - unusable frame data
/// * [`AnalysisError::NoVoiceDetected`] - nothing voiced and confident enough
pub fn analyze(
    frames: &[RawPitchFrame],
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let tonic = TonicReference::new(config.tonic_hz)?;
    config.validate()?;

    log::debug!(
        "Starting pitch analysis: {} frames, tonic {:.2} Hz",
        frames.len(),
        tonic.frequency_hz()
    );

    let voiced = frames::filter_frames(frames, config.confidence_threshold)?;
    let points = cents::map_frames(&voiced, tonic, config.hop_seconds);
    let contour = ContourSample::from_points(&points, config.max_points);
    let metrics = metrics::compute_metrics(&contour)?;
    let detected = swara::find_nearest_swara(metrics.median_cents);
    let deviation_colors = annotate::annotate(contour.cents());

    log::debug!(
        "Analysis finished: {} contour points, detected {}, deviation {:.1}c",
        contour.len(),
        detected.name,
        metrics.deviation
    );

    let (pitch_contour, time_points) = contour.into_parts();
    Ok(AnalysisResult {
        target_swara: swara::TARGET_SWARA.to_string(),
        target_cents: swara::TARGET_CENTS,
        detected_swara: detected.name.to_string(),
        tonic_hz: tonic.frequency_hz(),
        median_cents: metrics.median_cents,
        deviation: metrics.deviation,
        stability: metrics.stability,
        score: metrics.score,
        target_line: vec![swara::TARGET_CENTS; pitch_contour.len()],
        pitch_contour,
        time_points,
        deviation_colors,
    })
}

/// Analyses a column-oriented pitch track.
///
/// The tonic is validated before the columns are zipped, so a bad tonic is
/// reported even when the track is also malformed.
pub fn analyze_track(
    track: &PitchTrack,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    TonicReference::new(config.tonic_hz)?;
    let frames = track.frames()?;
    analyze(&frames, config)
}
