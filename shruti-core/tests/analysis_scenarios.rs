//! End-to-end scenarios for the analysis pipeline and its feedback

use shruti_core::feedback::{AccuracyBand, DetailBand, DriftDirection, RuleBasedFeedback};
use shruti_core::{
    analyze, analyze_track, AnalysisConfig, AnalysisError, FeedbackService, PitchBand, PitchTrack, RawPitchFrame,
};

const TONIC: f32 = 261.63;

/// Frequency `cents` above the test tonic.
fn freq_at(cents: f32) -> f32 {
    TONIC * 2.0_f32.powf(cents / 1200.0)
}

fn voiced_frames(cents: &[f32]) -> Vec<RawPitchFrame> {
    cents
        .iter()
        .enumerate()
        .map(|(i, &c)| RawPitchFrame::new(freq_at(c), true, 0.9, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame_on_tonic() {
        let frames = vec![RawPitchFrame::new(261.63, true, 0.9, 0)];
        let result = analyze(&frames, &AnalysisConfig::with_tonic(TONIC)).expect("analysis should succeed");

        assert_eq!(result.pitch_contour.len(), 1);
        assert!(result.pitch_contour[0] < 1e-3 || result.pitch_contour[0] > 1199.999);
        assert!(result.deviation.abs() < 1e-3);
        assert_eq!(result.detected_swara, "Sa");
        assert_eq!(result.target_swara, "Sa");
        assert_eq!(result.stability, 0.0);
        assert_eq!(result.score, 100);
        assert_eq!(result.deviation_colors, vec![PitchBand::OnTarget]);
        assert_eq!(result.target_line, vec![0.0]);

        let critique = RuleBasedFeedback.critique(&result.feedback_request());
        assert_eq!(critique.accuracy, AccuracyBand::Excellent);
        assert_eq!(critique.opening_line, "Beautiful! Your Sa was perfectly in tune");
    }

    #[test]
    fn test_rising_contour_reports_drift() {
        let cents: Vec<f32> = (0..12).map(|i| i as f32 * 100.0 / 11.0).collect();
        let result = analyze(&voiced_frames(&cents), &AnalysisConfig::with_tonic(TONIC)).unwrap();

        assert_eq!(result.pitch_contour.len(), 12);
        // median of the ramp is its midpoint
        assert!((result.deviation - 50.0).abs() < 0.1, "deviation {}", result.deviation);

        let request = result.feedback_request();
        let drift = request.context().drift.expect("drift should be detected");
        assert_eq!(drift.direction, DriftDirection::Higher);
        assert!(drift.magnitude >= 20.0);

        let critique = RuleBasedFeedback.critique(&request);
        assert_eq!(critique.accuracy, AccuracyBand::classify(result.deviation));
        assert!(critique.text.contains("Your pitch drifted higher towards the end"));
    }

    #[test]
    fn test_no_confident_frames() {
        let frames: Vec<RawPitchFrame> = (0..50)
            .map(|i| RawPitchFrame::new(261.63, true, if i % 2 == 0 { 0.6 } else { 0.3 }, i))
            .collect();
        let result = analyze(&frames, &AnalysisConfig::default());
        assert_eq!(result, Err(AnalysisError::NoVoiceDetected));
        assert!(result.unwrap_err().is_no_voice());
    }

    #[test]
    fn test_zero_tonic_rejected_before_frames() {
        // frames are malformed too; the tonic must be reported first
        let frames = vec![RawPitchFrame::new(f32::NAN, true, 7.0, 0)];
        let result = analyze(&frames, &AnalysisConfig::with_tonic(0.0));
        assert_eq!(result, Err(AnalysisError::InvalidTonic(0.0)));

        let track = PitchTrack {
            frequencies: vec![Some(261.63)],
            voiced: vec![],
            confidences: vec![],
        };
        let result = analyze_track(&track, &AnalysisConfig::with_tonic(-1.0));
        assert_eq!(result, Err(AnalysisError::InvalidTonic(-1.0)));
    }

    #[test]
    fn test_mismatched_track_is_malformed() {
        let track = PitchTrack {
            frequencies: vec![Some(261.63), Some(261.63)],
            voiced: vec![true, true],
            confidences: vec![0.9],
        };
        let result = analyze_track(&track, &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::MalformedInput(_))));
    }

    #[test]
    fn test_long_recording_is_downsampled() {
        let cents: Vec<f32> = (0..1000).map(|i| (i % 7) as f32 - 3.0).collect();
        let mut frames = voiced_frames(&cents);
        // an unvoiced gap in the middle
        for frame in frames.iter_mut().skip(400).take(100) {
            frame.voiced = false;
        }
        let config = AnalysisConfig::default();
        let result = analyze(&frames, &config).unwrap();

        assert_eq!(result.pitch_contour.len(), 300);
        assert_eq!(result.time_points.len(), 300);
        assert_eq!(result.deviation_colors.len(), 300);
        assert_eq!(result.target_line.len(), 300);
        assert_eq!(result.time_points[0], 0.0);
        assert!((result.time_points[299] - 999.0 * config.hop_seconds).abs() < 1e-4);
        assert!(result.time_points.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(result.detected_swara, "Sa");
        assert!(result.stability > 0.0);
    }

    #[test]
    fn test_octave_errors_do_not_move_the_result() {
        let mut frames = voiced_frames(&[5.0; 40]);
        for frame in frames.iter_mut().step_by(5) {
            frame.frequency_hz *= 2.0;
        }
        let result = analyze(&frames, &AnalysisConfig::with_tonic(TONIC)).unwrap();
        assert!((result.deviation - 5.0).abs() < 0.05);
        assert!(result.stability < 0.05);
    }

    #[test]
    fn test_holding_the_tritone_is_far_off() {
        let cents: Vec<f32> = (0..30).map(|i| if i % 2 == 0 { 595.0 } else { 605.0 }).collect();
        let result = analyze(&voiced_frames(&cents), &AnalysisConfig::with_tonic(TONIC)).unwrap();

        assert_eq!(result.detected_swara, "Ma2");
        assert!((result.median_cents - 600.0).abs() < 0.1, "median {}", result.median_cents);
        assert!(result.deviation.abs() > 599.0, "deviation {}", result.deviation);
        assert_eq!(result.score, 0);
        assert!((result.stability - 5.0).abs() < 0.1, "stability {}", result.stability);

        let request = result.feedback_request();
        let context = request.context();
        assert!(context.drift.is_none());
        assert!(context.wobble.is_none());

        let critique = RuleBasedFeedback.critique(&request);
        assert_eq!(critique.accuracy, AccuracyBand::Beginner);
        assert_eq!(critique.detail, DetailBand::FarOff);
        let text = FeedbackService::rule_based().feedback(&request);
        assert!(!text.starts_with("Beautiful"), "{}", text);
    }

    #[test]
    fn test_singing_pa() {
        let result = analyze(&voiced_frames(&[700.0; 30]), &AnalysisConfig::with_tonic(TONIC)).unwrap();
        assert_eq!(result.detected_swara, "Pa");
        assert!((result.deviation - -500.0).abs() < 0.05);
        assert_eq!(result.score, 0);
        assert!(result.deviation_colors.iter().all(|&b| b == PitchBand::Off));
    }

    #[test]
    fn test_same_input_same_output() {
        let cents: Vec<f32> = (0..80).map(|i| ((i as f32) * 0.3).sin() * 40.0).collect();
        let frames = voiced_frames(&cents);
        let a = analyze(&frames, &AnalysisConfig::with_tonic(TONIC)).unwrap();
        let b = analyze(&frames, &AnalysisConfig::with_tonic(TONIC)).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            RuleBasedFeedback.critique(&a.feedback_request()),
            RuleBasedFeedback.critique(&b.feedback_request())
        );
    }

    #[test]
    fn test_concurrent_callers() {
        let handles: Vec<_> = (0..8)
            .map(|k| {
                std::thread::spawn(move || {
                    let cents = vec![k as f32 * 100.0; 20];
                    analyze(&voiced_frames(&cents), &AnalysisConfig::with_tonic(TONIC))
                        .map(|r| r.detected_swara)
                })
            })
            .collect();
        let names: Vec<String> = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked").expect("analysis failed"))
            .collect();
        assert_eq!(names[0], "Sa");
        assert_eq!(names[7], "Pa");
    }

    #[test]
    fn test_result_serializes_for_display() {
        let result = analyze(&voiced_frames(&[0.0, 12.0, 30.0]), &AnalysisConfig::with_tonic(TONIC)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["target_swara"], "Sa");
        assert_eq!(json["deviation_colors"][0], "on_target");
        assert_eq!(json["deviation_colors"][1], "near");
        assert_eq!(json["deviation_colors"][2], "off");
        assert_eq!(json["pitch_contour"].as_array().unwrap().len(), 3);
    }
}
