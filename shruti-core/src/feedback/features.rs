//! Contour features the critique is built from.
//!
//! Everything here is derived from the sampled contour and its time axis,
//! never from raw frames. The contour is unwrapped around its own circular
//! mean first, so a voice crossing the octave seam, wherever it sings, does
//! not look like a 1200-cent leap.

use linreg::linear_regression;
use serde::Serialize;

use crate::metrics::unwrap_contour;

/// Points averaged at each end of the contour to measure drift.
pub const DRIFT_WINDOW: usize = 5;
/// Minimum points before drift is measured.
pub const DRIFT_MIN_POINTS: usize = 10;
/// Drift must exceed this to be reported.
pub const DRIFT_THRESHOLD_CENTS: f32 = 20.0;

/// Minimum points before mid-section wobble is measured.
pub const WOBBLE_MIN_POINTS: usize = 20;
pub const WOBBLE_MILD_CENTS: f32 = 30.0;
pub const WOBBLE_SEVERE_CENTS: f32 = 50.0;

/// Minimum time points before the held duration is judged.
pub const DURATION_MIN_POINTS: usize = 5;
/// Notes held for less than this are flagged as released early.
pub const MIN_HOLD_SECONDS: f32 = 1.5;

/// Slopes gentler than this, in cents per second, count as holding level.
pub const TREND_LEVEL_CENTS_PER_SEC: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftDirection {
    Higher,
    Lower,
}

/// A reportable change between the start and the end of the note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Drift {
    pub direction: DriftDirection,
    /// Absolute change in cents
    pub magnitude: f32,
}

impl Drift {
    pub fn sentence(&self) -> &'static str {
        match self.direction {
            DriftDirection::Higher => "Your pitch drifted higher towards the end",
            DriftDirection::Lower => "Your pitch drifted lower as you held the note",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WobbleSeverity {
    Mild,
    Severe,
}

/// Reportable pitch movement in the middle third of the note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wobble {
    pub severity: WobbleSeverity,
    /// max - min over the middle third, in cents
    pub range: f32,
}

impl Wobble {
    pub fn sentence(&self) -> &'static str {
        match self.severity {
            WobbleSeverity::Severe => "Your voice was shaking quite a bit in the middle",
            WobbleSeverity::Mild => "There's some wavering when you hold the note",
        }
    }
}

/// Bucketed stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Steadiness {
    /// stability < 8
    RockSteady,
    /// 8 to 25, nothing worth remarking on
    Steady,
    /// stability > 25
    NeedsWork,
    /// stability > 40
    VeryUnsteady,
}

impl Steadiness {
    pub fn from_stability(stability: f32) -> Self {
        if stability > 40.0 {
            Steadiness::VeryUnsteady
        } else if stability > 25.0 {
            Steadiness::NeedsWork
        } else if stability < 8.0 {
            Steadiness::RockSteady
        } else {
            Steadiness::Steady
        }
    }

    pub fn sentence(&self) -> Option<&'static str> {
        match self {
            Steadiness::VeryUnsteady => Some("Your pitch is very unsteady throughout"),
            Steadiness::NeedsWork => Some("Your pitch stability needs work"),
            Steadiness::RockSteady => Some("Your pitch is rock steady"),
            Steadiness::Steady => None,
        }
    }
}

/// Features of one contour, alive only while a critique is produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackContext {
    pub drift: Option<Drift>,
    pub wobble: Option<Wobble>,
    /// Last time minus first time, when enough time points exist
    pub held_seconds: Option<f32>,
    pub released_early: bool,
    pub steadiness: Steadiness,
    /// Least-squares slope of the contour in cents per second
    pub trend_cents_per_sec: Option<f32>,
}

impl FeedbackContext {
    /// Extracts features from a sampled contour (folded cents) and its time axis.
    pub fn extract(contour: &[f32], times: &[f32], stability: f32) -> Self {
        let offsets = unwrap_contour(contour);
        let held_seconds = held_duration(times);

        Self {
            drift: measure_drift(&offsets),
            wobble: measure_wobble(&offsets),
            held_seconds,
            released_early: held_seconds.is_some_and(|d| d < MIN_HOLD_SECONDS),
            steadiness: Steadiness::from_stability(stability),
            trend_cents_per_sec: trend(times, &offsets),
        }
    }

    /// A context with nothing to remark on beyond steadiness.
    pub fn empty(stability: f32) -> Self {
        Self {
            drift: None,
            wobble: None,
            held_seconds: None,
            released_early: false,
            steadiness: Steadiness::from_stability(stability),
            trend_cents_per_sec: None,
        }
    }

    /// Overall direction of the fitted slope. Kept out of `observations`,
    /// which drive the rule-based paragraphs.
    pub fn trend_sentence(&self) -> Option<&'static str> {
        match self.trend_cents_per_sec {
            Some(slope) if slope >= TREND_LEVEL_CENTS_PER_SEC => Some("Your pitch kept rising steadily"),
            Some(slope) if slope <= -TREND_LEVEL_CENTS_PER_SEC => Some("Your pitch kept sinking steadily"),
            _ => None,
        }
    }

    pub fn timing_sentence(&self) -> Option<&'static str> {
        self.released_early.then_some("You released the note too quickly")
    }

    /// Everything worth saying, in priority order: drift, wobble, timing, steadiness.
    pub fn observations(&self) -> Vec<&'static str> {
        [
            self.drift.map(|d| d.sentence()),
            self.wobble.map(|w| w.sentence()),
            self.timing_sentence(),
            self.steadiness.sentence(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Mean of the last window minus mean of the first, reported past the threshold.
fn measure_drift(offsets: &[f32]) -> Option<Drift> {
    if offsets.len() < DRIFT_MIN_POINTS {
        return None;
    }
    let window = DRIFT_WINDOW as f32;
    let start = offsets[..DRIFT_WINDOW].iter().sum::<f32>() / window;
    let end = offsets[offsets.len() - DRIFT_WINDOW..].iter().sum::<f32>() / window;
    let drift = end - start;

    if drift.abs() <= DRIFT_THRESHOLD_CENTS {
        return None;
    }
    Some(Drift {
        direction: if drift > 0.0 {
            DriftDirection::Higher
        } else {
            DriftDirection::Lower
        },
        magnitude: drift.abs(),
    })
}

/// Range over the middle third `[n/3, 2n/3)`.
fn measure_wobble(offsets: &[f32]) -> Option<Wobble> {
    let n = offsets.len();
    if n < WOBBLE_MIN_POINTS {
        return None;
    }
    let mid = &offsets[n / 3..2 * n / 3];
    let max = mid.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let min = mid.iter().copied().fold(f32::INFINITY, f32::min);
    let range = max - min;

    let severity = if range > WOBBLE_SEVERE_CENTS {
        WobbleSeverity::Severe
    } else if range > WOBBLE_MILD_CENTS {
        WobbleSeverity::Mild
    } else {
        return None;
    };
    Some(Wobble { severity, range })
}

fn held_duration(times: &[f32]) -> Option<f32> {
    if times.len() < DURATION_MIN_POINTS {
        return None;
    }
    Some(times[times.len() - 1] - times[0])
}

fn trend(times: &[f32], offsets: &[f32]) -> Option<f32> {
    if times.len() < 2 || times.len() != offsets.len() {
        return None;
    }
    let (xs, ys): (Vec<f64>, Vec<f64>) = times
        .iter()
        .zip(offsets)
        .map(|(&t, &c)| (t as f64, c as f64))
        .unzip();

    match linear_regression::<_, _, f64>(&xs, &ys) {
        Ok((slope, _intercept)) if slope.is_finite() => Some(slope as f32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(n: usize, step: f32) -> Vec<f32> {
        (0..n).map(|i| i as f32 * step).collect()
    }

    #[test]
    fn test_rising_contour_drifts_higher() {
        // 12 points from 0 to 100 cents
        let contour: Vec<f32> = (0..12).map(|i| i as f32 * 100.0 / 11.0).collect();
        let ctx = FeedbackContext::extract(&contour, &times(12, 0.2), 30.0);
        let drift = ctx.drift.expect("drift should be reported");
        assert_eq!(drift.direction, DriftDirection::Higher);
        assert!(drift.magnitude >= 20.0);
        assert!(ctx.trend_cents_per_sec.unwrap() > 0.0);
    }

    #[test]
    fn test_falling_contour_across_the_seam() {
        // 30 -> -30 cents, stored folded
        let contour: Vec<f32> = (0..12)
            .map(|i| crate::cents::fold_cents(30.0 - i as f32 * 60.0 / 11.0))
            .collect();
        let ctx = FeedbackContext::extract(&contour, &times(12, 0.2), 20.0);
        let drift = ctx.drift.unwrap();
        assert_eq!(drift.direction, DriftDirection::Lower);
        assert!(drift.magnitude < 100.0);
    }

    #[test]
    fn test_steady_note_at_the_tritone() {
        let contour: Vec<f32> = (0..30).map(|i| if i % 2 == 0 { 595.0 } else { 605.0 }).collect();
        let ctx = FeedbackContext::extract(&contour, &times(30, 0.1), 5.0);
        assert!(ctx.drift.is_none());
        assert!(ctx.wobble.is_none());
        assert!(ctx.trend_cents_per_sec.unwrap().abs() < TREND_LEVEL_CENTS_PER_SEC);
        assert_eq!(ctx.trend_sentence(), None);
    }

    #[test]
    fn test_trend_sentence() {
        let rising: Vec<f32> = (0..12).map(|i| i as f32 * 100.0 / 11.0).collect();
        let ctx = FeedbackContext::extract(&rising, &times(12, 0.2), 30.0);
        assert_eq!(ctx.trend_sentence(), Some("Your pitch kept rising steadily"));

        let falling: Vec<f32> = rising.iter().rev().copied().collect();
        let ctx = FeedbackContext::extract(&falling, &times(12, 0.2), 30.0);
        assert_eq!(ctx.trend_sentence(), Some("Your pitch kept sinking steadily"));

        assert_eq!(FeedbackContext::empty(5.0).trend_sentence(), None);
    }

    #[test]
    fn test_drift_needs_ten_points() {
        let contour: Vec<f32> = (0..9).map(|i| i as f32 * 20.0).collect();
        let ctx = FeedbackContext::extract(&contour, &times(9, 0.5), 10.0);
        assert!(ctx.drift.is_none());
    }

    #[test]
    fn test_small_drift_is_not_reported() {
        let mut contour = vec![0.0; 5];
        contour.extend(vec![20.0; 5]);
        let ctx = FeedbackContext::extract(&contour, &times(10, 0.5), 10.0);
        assert!(ctx.drift.is_none());
    }

    #[test]
    fn test_wobble_tiers() {
        let mut contour = vec![0.0; 30];
        contour[12] = 40.0;
        let ctx = FeedbackContext::extract(&contour, &times(30, 0.1), 10.0);
        assert_eq!(ctx.wobble.unwrap().severity, WobbleSeverity::Mild);

        contour[14] = 1180.0; // -20 once unwrapped, range 60
        let ctx = FeedbackContext::extract(&contour, &times(30, 0.1), 10.0);
        let wobble = ctx.wobble.unwrap();
        assert_eq!(wobble.severity, WobbleSeverity::Severe);
        assert!((wobble.range - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_wobble_outside_middle_third_is_ignored() {
        let mut contour = vec![0.0; 30];
        contour[0] = 80.0;
        contour[29] = 80.0;
        let ctx = FeedbackContext::extract(&contour, &times(30, 0.1), 10.0);
        assert!(ctx.wobble.is_none());
    }

    #[test]
    fn test_early_release() {
        let contour = vec![0.0; 6];
        let ctx = FeedbackContext::extract(&contour, &times(6, 0.1), 0.0);
        assert!(ctx.released_early);
        assert!((ctx.held_seconds.unwrap() - 0.5).abs() < 1e-5);

        let ctx = FeedbackContext::extract(&contour, &times(6, 1.0), 0.0);
        assert!(!ctx.released_early);

        let ctx = FeedbackContext::extract(&contour[..4], &times(4, 0.1), 0.0);
        assert!(ctx.held_seconds.is_none());
        assert!(!ctx.released_early);
    }

    #[test]
    fn test_steadiness_buckets() {
        assert_eq!(Steadiness::from_stability(0.0), Steadiness::RockSteady);
        assert_eq!(Steadiness::from_stability(8.0), Steadiness::Steady);
        assert_eq!(Steadiness::from_stability(25.0), Steadiness::Steady);
        assert_eq!(Steadiness::from_stability(25.1), Steadiness::NeedsWork);
        assert_eq!(Steadiness::from_stability(40.1), Steadiness::VeryUnsteady);
    }

    #[test]
    fn test_observation_order() {
        let ctx = FeedbackContext {
            drift: Some(Drift {
                direction: DriftDirection::Lower,
                magnitude: 30.0,
            }),
            wobble: Some(Wobble {
                severity: WobbleSeverity::Mild,
                range: 35.0,
            }),
            held_seconds: Some(1.0),
            released_early: true,
            steadiness: Steadiness::NeedsWork,
            trend_cents_per_sec: None,
        };
        assert_eq!(
            ctx.observations(),
            vec![
                "Your pitch drifted lower as you held the note",
                "There's some wavering when you hold the note",
                "You released the note too quickly",
                "Your pitch stability needs work",
            ]
        );
    }
}
