//! # Contour Sampler
//!
//! Bounds the number of points handed to displays and to the feedback
//! engine. Downsampling picks existing samples at an even stride; values are
//! never averaged or interpolated.

use serde::Serialize;

use crate::cents::CentsPoint;

/// Time-ordered cents values with an index-aligned time axis.
///
/// The two arrays can only be built together, so they always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContourSample {
    cents: Vec<f32>,
    times: Vec<f32>,
}

impl ContourSample {
    /// Builds the sample from mapped points, keeping at most `max_points`.
    pub fn from_points(points: &[CentsPoint], max_points: usize) -> Self {
        let indices = sample_indices(points.len(), max_points);
        let (cents, times) = indices
            .into_iter()
            .map(|i| (points[i].cents, points[i].time_sec))
            .unzip();
        Self { cents, times }
    }

    pub fn cents(&self) -> &[f32] {
        &self.cents
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.cents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cents.is_empty()
    }

    /// Splits into `(cents, times)`.
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>) {
        (self.cents, self.times)
    }
}

/// Indices kept when reducing `len` points to at most `max_points`.
///
/// Above the limit this is `floor(i * (len - 1) / (max_points - 1))` for
/// `i in 0..max_points`: evenly spaced, first and last always included.
pub fn sample_indices(len: usize, max_points: usize) -> Vec<usize> {
    if len <= max_points {
        return (0..len).collect();
    }
    if max_points == 0 {
        return Vec::new();
    }
    if max_points == 1 {
        return vec![0];
    }

    let last = len - 1;
    let steps = max_points - 1;
    // Integer arithmetic keeps the endpoints exact
    (0..max_points).map(|i| i * last / steps).collect()
}
