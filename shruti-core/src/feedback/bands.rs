//! Deviation bands used to pick critique text.
//!
//! Three tables coexist and are deliberately not merged: the opening-line
//! classification (10/20/35), the detailed fallback paragraph (15/30) and
//! the one-line quick verdict (10/25). Callers branch on each of them
//! independently. All of them look at the deviation capped at 100 cents.

use serde::Serialize;

/// Deviation cap applied before banding.
pub const DISPLAY_DEVIATION_CAP: f32 = 100.0;

/// `min(|deviation|, 100)`
pub fn display_deviation(deviation: f32) -> f32 {
    deviation.abs().min(DISPLAY_DEVIATION_CAP)
}

/// Classification behind the opening line and the generator prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyBand {
    /// under 10 cents
    Excellent,
    /// under 20 cents
    Good,
    /// under 35 cents
    NeedsPractice,
    Beginner,
}

impl AccuracyBand {
    pub fn classify(deviation: f32) -> Self {
        let d = display_deviation(deviation);
        if d < 10.0 {
            AccuracyBand::Excellent
        } else if d < 20.0 {
            AccuracyBand::Good
        } else if d < 35.0 {
            AccuracyBand::NeedsPractice
        } else {
            AccuracyBand::Beginner
        }
    }

    /// How the swara sounded relative to the drone.
    pub fn accuracy_phrase(&self) -> &'static str {
        match self {
            AccuracyBand::Excellent => "perfectly on shruti",
            AccuracyBand::Good => "close to shruti but slightly off",
            AccuracyBand::NeedsPractice => "noticeably off shruti",
            AccuracyBand::Beginner => "quite far from shruti",
        }
    }

    pub fn skill_level(&self) -> &'static str {
        match self {
            AccuracyBand::Excellent => "excellent",
            AccuracyBand::Good => "good",
            AccuracyBand::NeedsPractice => "needs practice",
            AccuracyBand::Beginner => "beginner",
        }
    }

    /// First sentence of a critique for this band.
    pub fn opening_line(&self, swara: &str) -> String {
        match self {
            AccuracyBand::Excellent => format!("Beautiful! Your {} was perfectly in tune", swara),
            AccuracyBand::Good => "Good attempt, but I heard you go slightly off the shruti".to_string(),
            AccuracyBand::NeedsPractice | AccuracyBand::Beginner => format!(
                "Your {} didn't quite hit the shruti - I could hear it was off",
                swara
            ),
        }
    }
}

/// Classification behind the detailed rule-based paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailBand {
    /// under 15 cents
    OnShruti,
    /// under 30 cents
    Close,
    FarOff,
}

impl DetailBand {
    pub fn classify(deviation: f32) -> Self {
        let d = display_deviation(deviation);
        if d < 15.0 {
            DetailBand::OnShruti
        } else if d < 30.0 {
            DetailBand::Close
        } else {
            DetailBand::FarOff
        }
    }
}

/// Classification behind the one-sentence verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickVerdict {
    /// under 10 cents
    InTune,
    /// under 25 cents
    SlightlyOff,
    OffShruti,
}

impl QuickVerdict {
    pub fn classify(deviation: f32) -> Self {
        let d = display_deviation(deviation);
        if d < 10.0 {
            QuickVerdict::InTune
        } else if d < 25.0 {
            QuickVerdict::SlightlyOff
        } else {
            QuickVerdict::OffShruti
        }
    }

    pub fn sentence(&self, swara: &str) -> String {
        match self {
            QuickVerdict::InTune => format!(
                "Excellent! Your {} is perfectly in tune with the shruti. Keep up the great work!",
                swara
            ),
            QuickVerdict::SlightlyOff => format!(
                "Good attempt! Your {} is close but slightly off the shruti. Listen more carefully to the tanpura.",
                swara
            ),
            QuickVerdict::OffShruti => format!(
                "Your {} went off shruti. Focus on matching the tanpura drone exactly and practice slowly.",
                swara
            ),
        }
    }
}
