//! NaN-skipping reductions over the forecast-hour axis.
//!
//! Leaf reads for one date land in a `[fhr, point]` scratch buffer
//! pre-filled with NaN; these helpers collapse the fhr dimension with the
//! configured statistic. A point with no surviving value reduces to NaN
//! under both statistics.

use crate::config::FhrStat;
use ndarray::{Array1, ArrayView2};

/// Mean of non-NaN values; NaN when none survive
pub fn nan_mean(values: impl Iterator<Item = f32>) -> f32 {
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for v in values {
        if !v.is_nan() {
            sum += v as f64;
            count += 1;
        }
    }
    if count == 0 {
        f32::NAN
    } else {
        (sum / count as f64) as f32
    }
}

/// Sum of non-NaN values; NaN when none survive
pub fn nan_sum(values: impl Iterator<Item = f32>) -> f32 {
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for v in values {
        if !v.is_nan() {
            sum += v as f64;
            count += 1;
        }
    }
    if count == 0 {
        f32::NAN
    } else {
        sum as f32
    }
}

/// Collapse a `[fhr, point]` scratch buffer to one value per point
pub fn reduce_fhr(scratch: ArrayView2<'_, f32>, stat: FhrStat) -> Array1<f32> {
    let npoints = scratch.ncols();
    Array1::from_shape_fn(npoints, |p| {
        let lane = scratch.column(p);
        match stat {
            FhrStat::Mean => nan_mean(lane.iter().copied()),
            FhrStat::Sum => nan_sum(lane.iter().copied()),
        }
    })
}
