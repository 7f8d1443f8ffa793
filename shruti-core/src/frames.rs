//! # Pitch Frames
//!
//! Input side of the pipeline: the per-frame output of the external pitch
//! extractor and the filter that decides which frames are worth analysing.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// One analysis frame as emitted by the pitch extractor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPitchFrame {
    /// Estimated fundamental in Hz (meaningless when unvoiced)
    pub frequency_hz: f32,
    /// Whether the extractor considered the frame voiced
    pub voiced: bool,
    /// Voicing probability in [0, 1]
    pub confidence: f32,
    /// Position of the frame in the extractor's output
    pub frame_index: usize,
}

impl RawPitchFrame {
    pub fn new(frequency_hz: f32, voiced: bool, confidence: f32, frame_index: usize) -> Self {
        Self {
            frequency_hz,
            voiced,
            confidence,
            frame_index,
        }
    }
}

/// Column-oriented pitch track, the shape pYIN-style extractors return.
///
/// Unvoiced frames typically carry `null` frequencies in the JSON form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchTrack {
    pub frequencies: Vec<Option<f32>>,
    pub voiced: Vec<bool>,
    pub confidences: Vec<f32>,
}

impl PitchTrack {
    /// Zips the three columns into frames.
    ///
    /// # Errors
    /// * [`AnalysisError::MalformedInput`] if the columns differ in length
    pub fn frames(&self) -> Result<Vec<RawPitchFrame>, AnalysisError> {
        let n = self.frequencies.len();
        if self.voiced.len() != n || self.confidences.len() != n {
            return Err(AnalysisError::MalformedInput(format!(
                "pitch track columns differ in length: {} frequencies, {} voiced flags, {} confidences",
                n,
                self.voiced.len(),
                self.confidences.len()
            )));
        }

        Ok(self
            .frequencies
            .iter()
            .zip(&self.voiced)
            .zip(&self.confidences)
            .enumerate()
            .map(|(i, ((freq, &voiced), &confidence))| {
                RawPitchFrame::new(freq.unwrap_or(f32::NAN), voiced, confidence, i)
            })
            .collect())
    }
}

/// Keeps the frames that are voiced and more confident than `threshold`.
///
/// # Errors
/// * [`AnalysisError::MalformedInput`] if a frame that passes the filter has a
///   confidence that is not a probability or no usable frequency
/// * [`AnalysisError::NoVoiceDetected`] if nothing survives
pub fn filter_frames(
    frames: &[RawPitchFrame],
    threshold: f32,
) -> Result<Vec<RawPitchFrame>, AnalysisError> {
    let mut kept = Vec::with_capacity(frames.len());

    for frame in frames {
        if !frame.voiced || frame.confidence <= threshold {
            continue;
        }
        if !frame.confidence.is_finite() || !(0.0..=1.0).contains(&frame.confidence) {
            return Err(AnalysisError::MalformedInput(format!(
                "frame {} has confidence {} outside [0, 1]",
                frame.frame_index, frame.confidence
            )));
        }
        if !frame.frequency_hz.is_finite() || frame.frequency_hz <= 0.0 {
            return Err(AnalysisError::MalformedInput(format!(
                "voiced frame {} has unusable frequency {}",
                frame.frame_index, frame.frequency_hz
            )));
        }
        kept.push(*frame);
    }

    log::debug!("Frame filter kept {} of {} frames", kept.len(), frames.len());

    if kept.is_empty() {
        return Err(AnalysisError::NoVoiceDetected);
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_voiced_confident_frames() {
        let frames = vec![
            RawPitchFrame::new(261.63, true, 0.9, 0),
            RawPitchFrame::new(261.63, false, 0.9, 1),
            RawPitchFrame::new(261.63, true, 0.6, 2), // threshold is exclusive
            RawPitchFrame::new(262.0, true, 0.61, 3),
        ];
        let kept = filter_frames(&frames, 0.6).unwrap();
        let indices: Vec<usize> = kept.iter().map(|f| f.frame_index).collect();
        assert_eq!(indices, vec![0, 3]);
    }

    #[test]
    fn test_filter_no_voice() {
        let frames = vec![
            RawPitchFrame::new(261.63, true, 0.5, 0),
            RawPitchFrame::new(261.63, true, 0.6, 1),
        ];
        assert_eq!(filter_frames(&frames, 0.6), Err(AnalysisError::NoVoiceDetected));
        assert_eq!(filter_frames(&[], 0.6), Err(AnalysisError::NoVoiceDetected));
    }

    #[test]
    fn test_unvoiced_nan_frequency_is_ignored() {
        let frames = vec![
            RawPitchFrame::new(f32::NAN, false, 0.1, 0),
            RawPitchFrame::new(300.0, true, 0.95, 1),
        ];
        assert_eq!(filter_frames(&frames, 0.6).unwrap().len(), 1);
    }

    #[test]
    fn test_voiced_nan_frequency_is_malformed() {
        let frames = vec![RawPitchFrame::new(f32::NAN, true, 0.95, 0)];
        assert!(matches!(
            filter_frames(&frames, 0.6),
            Err(AnalysisError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_confidence_out_of_range_is_malformed() {
        let frames = vec![RawPitchFrame::new(261.63, true, 1.5, 0)];
        assert!(matches!(
            filter_frames(&frames, 0.6),
            Err(AnalysisError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_dropped_frames_are_not_validated() {
        let frames = vec![
            RawPitchFrame::new(261.63, false, 1.5, 0),
            RawPitchFrame::new(261.63, true, -0.2, 1),
            RawPitchFrame::new(261.63, false, f32::NAN, 2),
            RawPitchFrame::new(261.63, true, 0.9, 3),
        ];
        let kept = filter_frames(&frames, 0.6).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].frame_index, 3);
    }

    #[test]
    fn test_voiced_nan_confidence_is_malformed() {
        let frames = vec![RawPitchFrame::new(261.63, true, f32::NAN, 0)];
        assert!(matches!(
            filter_frames(&frames, 0.6),
            Err(AnalysisError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_pitch_track_length_mismatch() {
        let track = PitchTrack {
            frequencies: vec![Some(261.63), None],
            voiced: vec![true, false],
            confidences: vec![0.9],
        };
        assert!(matches!(track.frames(), Err(AnalysisError::MalformedInput(_))));
    }

    #[test]
    fn test_pitch_track_from_json() {
        let json = r#"{
            "frequencies": [261.63, null, 262.0],
            "voiced": [true, false, true],
            "confidences": [0.9, 0.1, 0.8]
        }"#;
        let track: PitchTrack = serde_json::from_str(json).unwrap();
        let frames = track.frames().unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames[1].frequency_hz.is_nan());
        assert_eq!(frames[2].frame_index, 2);
    }
}
