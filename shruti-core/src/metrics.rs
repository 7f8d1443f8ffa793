//! Central tendency and dispersion of a sampled contour.
//!
//! Statistics are taken on the contour unwrapped around its own circular
//! mean: each point is moved by a whole octave when that brings it within
//! half an octave of the mean. The seam then sits opposite wherever the voice
//! actually is, so a singer hovering at 1195 and 5 cents is 10 cents wide and
//! one hovering at 595 and 605 cents stays near the tritone.

use serde::Serialize;

use crate::cents::{circular_mean, fold_cents, unwrap_near, wrap_deviation};
use crate::contour::ContourSample;
use crate::error::AnalysisError;
use crate::swara::TARGET_CENTS;

/// Scalar summary of one contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchMetrics {
    /// Median position on the octave circle, in `[0, 1200)`
    pub median_cents: f32,
    /// Signed distance from Sa, in `[-600, 600)`
    pub deviation: f32,
    /// Population standard deviation in cents
    pub stability: f32,
    /// `max(0, 100 - |deviation|)`, truncated
    pub score: u32,
}

/// Contour values unwrapped around the contour's circular mean.
///
/// The result is continuous (no 1200-cent jumps) for any contour narrower
/// than half an octave; values are not folded.
pub fn unwrap_contour(cents: &[f32]) -> Vec<f32> {
    match circular_mean(cents) {
        Some(anchor) => cents.iter().map(|&c| unwrap_near(c, anchor)).collect(),
        None => Vec::new(),
    }
}

/// Median; the mean of the two middle values for even lengths.
pub fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Population (not sample) standard deviation.
pub fn population_std(values: &[f32]) -> Option<f32> {
    let first = *values.first()?;
    if values.iter().all(|&v| v == first) {
        return Some(0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    Some(variance.sqrt() as f32)
}

/// Signed deviation of a folded position from Sa.
pub fn deviation_from_target(norm_cents: f32) -> f32 {
    wrap_deviation(norm_cents, TARGET_CENTS)
}

/// Illustrative 0-100 score.
pub fn score(deviation: f32) -> u32 {
    (100.0 - deviation.abs()).max(0.0) as u32
}

/// Computes all metrics for a sampled contour.
///
/// # Errors
/// * [`AnalysisError::NoVoiceDetected`] for an empty contour
pub fn compute_metrics(contour: &ContourSample) -> Result<PitchMetrics, AnalysisError> {
    let unwrapped = unwrap_contour(contour.cents());
    let center = median(&unwrapped).ok_or(AnalysisError::NoVoiceDetected)?;
    let stability = population_std(&unwrapped).ok_or(AnalysisError::NoVoiceDetected)?;

    let median_cents = fold_cents(center);
    let deviation = deviation_from_target(median_cents);

    log::debug!(
        "Metrics over {} points: median {:.1}c, deviation {:.1}c, stability {:.1}c",
        unwrapped.len(),
        median_cents,
        deviation,
        stability
    );

    Ok(PitchMetrics {
        median_cents,
        deviation,
        stability,
        score: score(deviation),
    })
}
