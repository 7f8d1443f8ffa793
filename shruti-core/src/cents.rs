//! # Cents Module
//!
//! Tonic-relative pitch arithmetic on the 1200-cent octave circle.
//!
//! - 100 cents = 1 semitone
//! - 1200 cents = 1 octave
//! - All interpretation happens after folding into `[0, 1200)`, so a note sung
//!   an octave above or below the tonic lands on the same position

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::frames::RawPitchFrame;

/// Cents in one octave.
pub const OCTAVE_CENTS: f32 = 1200.0;

/// Half an octave, the largest possible circular distance.
pub const HALF_OCTAVE_CENTS: f32 = 600.0;

/// The user's Sa. Constructing one is the only way past tonic validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TonicReference {
    frequency_hz: f32,
}

impl TonicReference {
    /// # Errors
    /// * [`AnalysisError::InvalidTonic`] for zero, negative or non-finite input
    pub fn new(frequency_hz: f32) -> Result<Self, AnalysisError> {
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return Err(AnalysisError::InvalidTonic(frequency_hz));
        }
        Ok(Self { frequency_hz })
    }

    pub fn frequency_hz(&self) -> f32 {
        self.frequency_hz
    }
}

/// A filtered, tonic-relative, octave-folded sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentsPoint {
    /// Position on the octave circle, always in `[0, 1200)`
    pub cents: f32,
    /// Time of the originating frame in seconds
    pub time_sec: f32,
}

/// Unfolded distance from the tonic in cents (positive = above).
pub fn cents_from_tonic(freq: f32, tonic: TonicReference) -> f32 {
    1200.0 * (freq / tonic.frequency_hz).log2()
}

/// Folds any cents value into `[0, 1200)`; negative values wrap forward.
pub fn fold_cents(cents: f32) -> f32 {
    let folded = cents.rem_euclid(OCTAVE_CENTS);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if folded >= OCTAVE_CENTS { 0.0 } else { folded }
}

/// Signed shortest path from `target` to `cents` around the circle, in `[-600, 600)`.
pub fn wrap_deviation(cents: f32, target: f32) -> f32 {
    fold_cents(cents - target + HALF_OCTAVE_CENTS) - HALF_OCTAVE_CENTS
}

/// Unsigned distance on the octave circle, in `[0, 600]`.
pub fn circular_distance(a: f32, b: f32) -> f32 {
    let d = (fold_cents(a) - fold_cents(b)).abs();
    d.min(OCTAVE_CENTS - d)
}

/// Mean direction of a set of positions on the octave circle, in `[0, 1200)`.
///
/// Returns `None` for an empty slice. When the positions cancel out exactly
/// the result is 0.
pub fn circular_mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let to_radians = std::f64::consts::TAU / OCTAVE_CENTS as f64;
    let (sin, cos) = values.iter().fold((0.0f64, 0.0f64), |(s, c), &v| {
        let angle = v as f64 * to_radians;
        (s + angle.sin(), c + angle.cos())
    });
    Some(fold_cents((sin.atan2(cos) / to_radians) as f32))
}

/// Moves a folded position by a whole octave, if needed, so it lies within
/// half an octave of `anchor`. The value itself is never rounded.
pub fn unwrap_near(cents: f32, anchor: f32) -> f32 {
    let d = cents - anchor;
    if d > HALF_OCTAVE_CENTS {
        cents - OCTAVE_CENTS
    } else if d < -HALF_OCTAVE_CENTS {
        cents + OCTAVE_CENTS
    } else {
        cents
    }
}

/// Maps filtered frames onto the octave circle.
///
/// `hop_seconds` is the extractor's frame step; the frame index is kept as
/// the time base so gaps left by the filter stay visible on the time axis.
pub fn map_frames(
    frames: &[RawPitchFrame],
    tonic: TonicReference,
    hop_seconds: f32,
) -> Vec<CentsPoint> {
    frames
        .iter()
        .map(|frame| CentsPoint {
            cents: fold_cents(cents_from_tonic(frame.frequency_hz, tonic)),
            time_sec: frame.frame_index as f32 * hop_seconds,
        })
        .collect()
}
