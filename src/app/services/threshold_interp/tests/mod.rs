//! Tests for the threshold interpolation service

pub mod interp_tests;

use crate::app::services::threshold_interp::ThresholdInterpolator;
use ndarray::Array2;

/// Curve with evenly spaced values per point: point p holds
/// `(p + 1) * ptile` at each native percentile, so interpolation is exact.
pub fn linear_curve(ptiles: &[f64], npoints: usize) -> ThresholdInterpolator {
    let values = Array2::from_shape_fn((ptiles.len(), npoints), |(t, p)| {
        ((p + 1) as f64 * ptiles[t]) as f32
    });
    ThresholdInterpolator::new(ptiles.to_vec(), values).unwrap()
}
