//! Conversion of POE and value arrays into text reports.
//!
//! Entry points that pull a probability-of-exceedance block (or a plain
//! per-location value array) through the threshold interpolator and hand
//! the resulting columns to the report writer. Threshold-space
//! reconciliation that needs a climatology fails with a configuration
//! error before any file is touched.

use crate::app::models::{ThresholdKind, ThresholdSet};
use crate::app::services::report_writer::{self, ReportSpec};
use crate::app::services::threshold_interp::{
    tercile_probs, validate_tercile_thresholds, ThresholdInterpolator,
};
use crate::config::ConversionConfig;
use crate::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use std::path::Path;
use tracing::debug;

/// Convert a POE block into a delimited text report.
///
/// `poe` holds the probability of exceeding each native climatology
/// percentile, shaped `[ptile, point]` with `ptiles` naming the rows.
/// Raw-value output thresholds are mapped into percentile space through
/// `climo` first; requesting them without a climatology is a
/// configuration error.
pub fn poe_to_report(
    path: &Path,
    poe: ArrayView2<'_, f32>,
    ptiles: &[f64],
    climo: Option<&ThresholdInterpolator>,
    ids: Option<&[String]>,
    config: &ConversionConfig,
) -> Result<()> {
    config.validate()?;
    let desired = ThresholdSet::new(config.output_threshold_type, config.thresholds.clone())?;
    if config.terciles {
        validate_tercile_thresholds(&desired)?;
    }

    let poe_curve = ThresholdInterpolator::new(ptiles.to_vec(), poe.to_owned())?;
    let ptile_rows = reconcile_thresholds(&desired, climo, poe_curve.point_count())?;

    let mut columns = Vec::with_capacity(desired.len());
    for row in ptile_rows.rows() {
        columns.push(poe_curve.value_at_ptiles(row)?);
    }
    debug!(
        thresholds = desired.len(),
        points = poe_curve.point_count(),
        "interpolated POE at output thresholds"
    );

    let (headers, columns) = if config.terciles {
        let (below, normal, above) = tercile_probs(columns[0].view(), columns[1].view())?;
        (tercile_headers(), vec![below, normal, above])
    } else {
        (threshold_headers(&desired), columns)
    };

    let views: Vec<ArrayView1<'_, f32>> = columns.iter().map(|c| c.view()).collect();
    report_writer::write_report(path, ids, &headers, &views, &report_spec(config))
}

/// Convert a per-location value array into a one-column text report.
///
/// Percentile-space output needs a climatology curve to invert each
/// value; without one the call fails before any file I/O.
pub fn values_to_report(
    path: &Path,
    values: ArrayView1<'_, f32>,
    climo: Option<&ThresholdInterpolator>,
    ids: Option<&[String]>,
    config: &ConversionConfig,
) -> Result<()> {
    config.validate()?;
    let (header, column) = match config.output_threshold_type {
        ThresholdKind::Raw => ("rawval".to_string(), values.to_owned()),
        ThresholdKind::Percentile => {
            let climo = climo.ok_or_else(|| {
                Error::configuration("percentile output requires a climatology")
            })?;
            ("ptile".to_string(), climo.ptile_at_value(values)?)
        }
    };
    report_writer::write_report(path, ids, &[header], &[column.view()], &report_spec(config))
}

/// Express the desired thresholds as per-point percentile rows.
///
/// Percentile thresholds broadcast directly; raw-value thresholds are
/// inverted through the climatology curve per point.
fn reconcile_thresholds(
    desired: &ThresholdSet,
    climo: Option<&ThresholdInterpolator>,
    npoints: usize,
) -> Result<Array2<f32>> {
    match desired.kind {
        ThresholdKind::Percentile => {
            let mut rows = Array2::zeros((desired.len(), npoints));
            for (t, &value) in desired.values.iter().enumerate() {
                rows.row_mut(t).fill(value as f32);
            }
            Ok(rows)
        }
        ThresholdKind::Raw => {
            let climo = climo.ok_or_else(|| {
                Error::configuration("raw-value output thresholds require a climatology")
            })?;
            if climo.point_count() != npoints {
                return Err(Error::configuration(format!(
                    "climatology has {} points, data has {}",
                    climo.point_count(),
                    npoints
                )));
            }
            climo.thresholds_to_ptiles(desired)
        }
    }
}

fn tercile_headers() -> Vec<String> {
    vec![
        "below".to_string(),
        "normal".to_string(),
        "above".to_string(),
    ]
}

fn threshold_headers(desired: &ThresholdSet) -> Vec<String> {
    let prefix = match desired.kind {
        ThresholdKind::Percentile => "ptile",
        ThresholdKind::Raw => "rawval",
    };
    desired
        .values
        .iter()
        .map(|v| {
            if v.fract() == 0.0 {
                format!("{}{:02}", prefix, *v as i64)
            } else {
                format!("{}{}", prefix, v)
            }
        })
        .collect()
}

fn report_spec(config: &ConversionConfig) -> ReportSpec {
    ReportSpec {
        delimiter: config.delimiter,
        precision: config.precision,
        missing_sentinel: config.missing_sentinel.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};
    use tempfile::tempdir;

    /// POE curve falling linearly from 1 at ptile 0 to 0 at ptile 100,
    /// identical at both points
    fn linear_poe() -> (Array2<f32>, Vec<f64>) {
        let ptiles = vec![0.0, 33.0, 67.0, 100.0];
        let poe = Array2::from_shape_fn((4, 2), |(t, _)| 1.0 - (ptiles[t] / 100.0) as f32);
        (poe, ptiles)
    }

    /// Climatology where point p's raw value equals `(p + 1) * ptile`
    fn linear_climo(ptiles: &[f64]) -> ThresholdInterpolator {
        let values = Array2::from_shape_fn((ptiles.len(), 2), |(t, p)| {
            ((p + 1) as f64 * ptiles[t]) as f32
        });
        ThresholdInterpolator::new(ptiles.to_vec(), values).unwrap()
    }

    #[test]
    fn test_poe_report_with_percentile_thresholds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("poe.txt");
        let (poe, ptiles) = linear_poe();
        let config = ConversionConfig::new(ThresholdKind::Percentile, vec![33.0, 67.0])
            .with_precision(2);

        poe_to_report(&path, poe.view(), &ptiles, None, None, &config).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "id ptile33 ptile67");
        assert_eq!(lines.next().unwrap(), "0 0.67 0.33");
    }

    #[test]
    fn test_poe_report_terciles_partition_unity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terciles.txt");
        let (poe, ptiles) = linear_poe();
        let config = ConversionConfig::new(ThresholdKind::Percentile, vec![33.0, 67.0])
            .with_terciles()
            .with_precision(2);

        poe_to_report(&path, poe.view(), &ptiles, None, None, &config).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "id below normal above");
        assert_eq!(lines.next().unwrap(), "0 0.33 0.34 0.33");
    }

    #[test]
    fn test_raw_thresholds_without_climo_fail_before_io() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("poe.txt");
        let (poe, ptiles) = linear_poe();
        let config = ConversionConfig::new(ThresholdKind::Raw, vec![30.0]);

        let result = poe_to_report(&path, poe.view(), &ptiles, None, None, &config);
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_raw_thresholds_through_climo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("poe.txt");
        let (poe, ptiles) = linear_poe();
        let climo = linear_climo(&ptiles);
        let config = ConversionConfig::new(ThresholdKind::Raw, vec![30.0]).with_precision(2);

        poe_to_report(&path, poe.view(), &ptiles, Some(&climo), None, &config).unwrap();

        // raw 30 is ptile 30 at point 0 and ptile 15 at point 1
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "id rawval30");
        assert_eq!(lines.next().unwrap(), "0 0.70");
        assert_eq!(lines.next().unwrap(), "1 0.85");
    }

    #[test]
    fn test_values_report_ptile_space_requires_climo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("values.txt");
        let values = array![10.0f32, 20.0];
        let config = ConversionConfig::new(ThresholdKind::Percentile, vec![50.0]);

        let result = values_to_report(&path, values.view(), None, None, &config);
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_values_report_raw_passthrough() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("values.txt");
        let values: Array1<f32> = array![10.0, f32::NAN];
        let config = ConversionConfig::new(ThresholdKind::Raw, vec![50.0])
            .with_missing_sentinel("-999")
            .with_precision(1);

        values_to_report(&path, values.view(), None, None, &config).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "id rawval\n0 10.0\n1 -999\n");
    }

    #[test]
    fn test_values_report_rejects_inconsistent_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("values.txt");
        let values = array![10.0f32, 20.0];
        let config = ConversionConfig::new(ThresholdKind::Raw, vec![50.0]).with_terciles();

        let result = values_to_report(&path, values.view(), None, None, &config);
        assert!(result.is_err());
        assert!(!path.exists());

        let config = ConversionConfig::new(ThresholdKind::Percentile, vec![150.0]);
        let climo = linear_climo(&[0.0, 50.0, 100.0]);
        let result = values_to_report(&path, values.view(), Some(&climo), None, &config);
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_tercile_mode_rejects_three_thresholds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("poe.txt");
        let (poe, ptiles) = linear_poe();
        let config =
            ConversionConfig::new(ThresholdKind::Percentile, vec![25.0, 50.0, 75.0]).with_terciles();

        let err = poe_to_report(&path, poe.view(), &ptiles, None, None, &config).unwrap_err();
        assert!(err.to_string().contains("exactly 2"));
        assert!(!path.exists());
    }
}
