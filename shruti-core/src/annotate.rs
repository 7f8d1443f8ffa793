//! Per-point accuracy bands for coloring a contour trace.

use serde::{Deserialize, Serialize};

use crate::cents::fold_cents;

/// Distance from Sa below which a point counts as on target.
pub const ON_TARGET_CENTS: f32 = 10.0;

/// Distance from Sa below which a point counts as near.
pub const NEAR_CENTS: f32 = 25.0;

/// Three-tier accuracy label for a single contour point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchBand {
    OnTarget,
    Near,
    Off,
}

impl PitchBand {
    /// Classifies a point by its distance from Sa (0 cents).
    pub fn classify(cents: f32) -> Self {
        let v = fold_cents(cents);
        let dist = v.abs().min((v - 1200.0).abs());
        if dist < ON_TARGET_CENTS {
            PitchBand::OnTarget
        } else if dist < NEAR_CENTS {
            PitchBand::Near
        } else {
            PitchBand::Off
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            PitchBand::OnTarget => "on target",
            PitchBand::Near => "near",
            PitchBand::Off => "off",
        }
    }
}

/// One band per contour point, index-aligned with the input.
pub fn annotate(cents: &[f32]) -> Vec<PitchBand> {
    cents.iter().map(|&c| PitchBand::classify(c)).collect()
}
