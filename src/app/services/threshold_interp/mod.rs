//! Percentile/raw-value threshold interpolation.
//!
//! A [`ThresholdInterpolator`] wraps one climatology curve block: an
//! ascending list of native percentiles, each mapped per grid point to a
//! value (raw physical values, or probabilities-of-exceedance). It
//! converts between percentile space and value space with monotone
//! piecewise-linear interpolation, extrapolating linearly beyond the
//! curve ends. All interpolation is per-grid-point independent and NaN
//! propagating; a NaN point never aborts the batch.

pub mod curve;

#[cfg(test)]
pub mod tests;

use crate::app::models::{ThresholdKind, ThresholdSet};
use crate::{Error, Result};
use curve::{interp1, is_strictly_ascending};
use ndarray::{Array1, Array2, ArrayView1};

/// Interpolator over one `[ptile, point]` climatology curve block
#[derive(Debug, Clone)]
pub struct ThresholdInterpolator {
    ptiles: Vec<f64>,
    values: Array2<f32>,
}

impl ThresholdInterpolator {
    /// Build an interpolator from native percentiles and their per-point
    /// values.
    ///
    /// Percentiles must be strictly ascending within [0, 100] and match
    /// the first axis of `values`; at least two are needed to define a
    /// segment.
    pub fn new(ptiles: Vec<f64>, values: Array2<f32>) -> Result<Self> {
        if ptiles.len() < 2 {
            return Err(Error::threshold(
                "climatology curve needs at least 2 percentiles",
            ));
        }
        if !is_strictly_ascending(&ptiles) {
            return Err(Error::threshold(
                "climatology percentiles must be strictly ascending",
            ));
        }
        if ptiles.iter().any(|p| !(0.0..=100.0).contains(p)) {
            return Err(Error::threshold("percentiles must lie in [0, 100]"));
        }
        if ptiles.len() != values.nrows() {
            return Err(Error::threshold(format!(
                "curve has {} percentiles but {} value rows",
                ptiles.len(),
                values.nrows()
            )));
        }
        Ok(Self { ptiles, values })
    }

    pub fn ptiles(&self) -> &[f64] {
        &self.ptiles
    }

    pub fn point_count(&self) -> usize {
        self.values.ncols()
    }

    /// Curve value at one percentile, per grid point.
    ///
    /// Percentiles outside [0, 100] extrapolate along the end segments.
    pub fn value_at_ptile(&self, ptile: f64) -> Array1<f32> {
        Array1::from_shape_fn(self.point_count(), |p| {
            let ys: Vec<f64> = self.values.column(p).iter().map(|&v| v as f64).collect();
            interp1(ptile, &self.ptiles, &ys) as f32
        })
    }

    /// Curve value at a per-point percentile array
    pub fn value_at_ptiles(&self, ptile_per_point: ArrayView1<'_, f32>) -> Result<Array1<f32>> {
        self.check_points(ptile_per_point.len())?;
        Ok(Array1::from_shape_fn(self.point_count(), |p| {
            let ys: Vec<f64> = self.values.column(p).iter().map(|&v| v as f64).collect();
            interp1(ptile_per_point[p] as f64, &self.ptiles, &ys) as f32
        }))
    }

    /// Inverse lookup: the percentile at which the curve reaches each
    /// point's query value.
    ///
    /// Assumes a monotone (ascending) climatology curve per point; a
    /// point whose curve contains NaN yields NaN.
    pub fn ptile_at_value(&self, value_per_point: ArrayView1<'_, f32>) -> Result<Array1<f32>> {
        self.check_points(value_per_point.len())?;
        Ok(Array1::from_shape_fn(self.point_count(), |p| {
            let xs: Vec<f64> = self.values.column(p).iter().map(|&v| v as f64).collect();
            if xs.iter().any(|v| v.is_nan()) {
                return f32::NAN;
            }
            interp1(value_per_point[p] as f64, &xs, &self.ptiles) as f32
        }))
    }

    /// Express a desired threshold set as per-point percentiles,
    /// reconciling threshold kinds through this curve when they differ.
    ///
    /// Result shape: `[threshold, point]`.
    pub fn thresholds_to_ptiles(&self, desired: &ThresholdSet) -> Result<Array2<f32>> {
        let npoints = self.point_count();
        let mut out = Array2::from_elem((desired.len(), npoints), f32::NAN);
        for (t, &value) in desired.values.iter().enumerate() {
            let row = match desired.kind {
                ThresholdKind::Percentile => Array1::from_elem(npoints, value as f32),
                ThresholdKind::Raw => {
                    let query = Array1::from_elem(npoints, value as f32);
                    self.ptile_at_value(query.view())?
                }
            };
            out.row_mut(t).assign(&row);
        }
        Ok(out)
    }

    fn check_points(&self, got: usize) -> Result<()> {
        if got != self.point_count() {
            return Err(Error::threshold(format!(
                "query has {} points, curve has {}",
                got,
                self.point_count()
            )));
        }
        Ok(())
    }
}

/// Derive tercile category probabilities from the probabilities of
/// exceedance at the lower and upper thresholds.
///
/// `below = CDF(lower) = 1 - POE(lower)`, `above = POE(upper)`,
/// `normal = POE(lower) - POE(upper)`; NaN propagates per point.
pub fn tercile_probs(
    poe_lower: ArrayView1<'_, f32>,
    poe_upper: ArrayView1<'_, f32>,
) -> Result<(Array1<f32>, Array1<f32>, Array1<f32>)> {
    if poe_lower.len() != poe_upper.len() {
        return Err(Error::threshold(format!(
            "tercile POE arrays differ in length: {} vs {}",
            poe_lower.len(),
            poe_upper.len()
        )));
    }
    let below = poe_lower.mapv(|v| 1.0 - v);
    let normal = &poe_lower - &poe_upper;
    let above = poe_upper.to_owned();
    Ok((below, normal, above))
}

/// Enforce the exactly-two-thresholds rule of tercile mode
pub fn validate_tercile_thresholds(thresholds: &ThresholdSet) -> Result<()> {
    if thresholds.len() != 2 {
        return Err(Error::threshold(
            "tercile mode requires exactly 2 thresholds",
        ));
    }
    Ok(())
}
