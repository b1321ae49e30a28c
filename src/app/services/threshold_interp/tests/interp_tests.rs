use super::linear_curve;
use crate::app::models::{ThresholdKind, ThresholdSet};
use crate::app::services::threshold_interp::{
    tercile_probs, validate_tercile_thresholds, ThresholdInterpolator,
};
use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};

#[test]
fn test_value_at_ptile_interior_and_knot() {
    let interp = linear_curve(&[10.0, 50.0, 90.0], 2);

    let at_knot = interp.value_at_ptile(50.0);
    assert_abs_diff_eq!(at_knot[0], 50.0, epsilon = 1e-4);
    assert_abs_diff_eq!(at_knot[1], 100.0, epsilon = 1e-4);

    let midway = interp.value_at_ptile(30.0);
    assert_abs_diff_eq!(midway[0], 30.0, epsilon = 1e-4);
    assert_abs_diff_eq!(midway[1], 60.0, epsilon = 1e-4);
}

#[test]
fn test_value_at_ptile_extrapolates_past_ends() {
    let interp = linear_curve(&[10.0, 50.0, 90.0], 1);
    assert_abs_diff_eq!(interp.value_at_ptile(0.0)[0], 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(interp.value_at_ptile(100.0)[0], 100.0, epsilon = 1e-4);
}

#[test]
fn test_ptile_value_round_trip() {
    let interp = linear_curve(&[10.0, 33.0, 67.0, 90.0], 3);

    let ptiles = array![25.0f32, 40.0, 75.0];
    let raw = interp.value_at_ptiles(ptiles.view()).unwrap();
    let back = interp.ptile_at_value(raw.view()).unwrap();

    for p in 0..3 {
        assert_abs_diff_eq!(back[p], ptiles[p], epsilon = 1e-3);
    }
}

#[test]
fn test_nan_query_propagates_without_aborting() {
    let interp = linear_curve(&[10.0, 50.0, 90.0], 2);

    let query = array![f32::NAN, 30.0];
    let raw = interp.value_at_ptiles(query.view()).unwrap();
    assert!(raw[0].is_nan());
    assert_abs_diff_eq!(raw[1], 60.0, epsilon = 1e-4);
}

#[test]
fn test_nan_curve_point_yields_nan_inverse() {
    let values = array![[10.0f32, f32::NAN], [20.0, f32::NAN], [30.0, f32::NAN]];
    let interp = ThresholdInterpolator::new(vec![10.0, 50.0, 90.0], values).unwrap();

    let back = interp.ptile_at_value(array![15.0f32, 15.0].view()).unwrap();
    assert_abs_diff_eq!(back[0], 30.0, epsilon = 1e-4);
    assert!(back[1].is_nan());
}

#[test]
fn test_thresholds_to_ptiles_reconciles_raw_kind() {
    let interp = linear_curve(&[10.0, 50.0, 90.0], 2);

    // raw value 30 sits at ptile 30 for point 0, ptile 15 for point 1
    let raw = ThresholdSet::new(ThresholdKind::Raw, vec![30.0]).unwrap();
    let ptiles = interp.thresholds_to_ptiles(&raw).unwrap();
    assert_eq!(ptiles.dim(), (1, 2));
    assert_abs_diff_eq!(ptiles[[0, 0]], 30.0, epsilon = 1e-3);
    assert_abs_diff_eq!(ptiles[[0, 1]], 15.0, epsilon = 1e-3);

    // percentile thresholds pass through unchanged
    let pct = ThresholdSet::new(ThresholdKind::Percentile, vec![33.0, 67.0]).unwrap();
    let ptiles = interp.thresholds_to_ptiles(&pct).unwrap();
    assert_abs_diff_eq!(ptiles[[0, 0]], 33.0, epsilon = 1e-6);
    assert_abs_diff_eq!(ptiles[[1, 1]], 67.0, epsilon = 1e-6);
}

#[test]
fn test_tercile_probs_partition_unity() {
    let poe_lower = array![0.67f32, 0.9];
    let poe_upper = array![0.33f32, 0.5];

    let (below, normal, above) = tercile_probs(poe_lower.view(), poe_upper.view()).unwrap();
    assert_abs_diff_eq!(below[0], 0.33, epsilon = 1e-6);
    assert_abs_diff_eq!(normal[0], 0.34, epsilon = 1e-6);
    assert_abs_diff_eq!(above[0], 0.33, epsilon = 1e-6);
    for p in 0..2 {
        assert_abs_diff_eq!(below[p] + normal[p] + above[p], 1.0, epsilon = 1e-6);
    }
}

#[test]
fn test_tercile_probs_nan_point_propagates() {
    let poe_lower = array![f32::NAN, 0.9];
    let poe_upper = array![0.33f32, 0.5];

    let (below, normal, above) = tercile_probs(poe_lower.view(), poe_upper.view()).unwrap();
    assert!(below[0].is_nan());
    assert!(normal[0].is_nan());
    assert_abs_diff_eq!(above[0], 0.33, epsilon = 1e-6);
    assert_abs_diff_eq!(below[1], 0.1, epsilon = 1e-6);
}

#[test]
fn test_tercile_probs_length_mismatch() {
    let err = tercile_probs(array![0.5f32].view(), array![0.3f32, 0.2].view());
    assert!(err.is_err());
}

#[test]
fn test_tercile_mode_needs_exactly_two_thresholds() {
    let one = ThresholdSet::new(ThresholdKind::Percentile, vec![50.0]).unwrap();
    let err = validate_tercile_thresholds(&one).unwrap_err();
    assert!(err.to_string().contains("exactly 2"));

    let two = ThresholdSet::new(ThresholdKind::Percentile, vec![33.0, 67.0]).unwrap();
    assert!(validate_tercile_thresholds(&two).is_ok());
}

#[test]
fn test_constructor_rejects_bad_curves() {
    let values = Array2::<f32>::zeros((2, 4));
    assert!(ThresholdInterpolator::new(vec![50.0], Array2::zeros((1, 4))).is_err());
    assert!(ThresholdInterpolator::new(vec![67.0, 33.0], values.clone()).is_err());
    assert!(ThresholdInterpolator::new(vec![33.0, 101.0], values.clone()).is_err());
    assert!(ThresholdInterpolator::new(vec![33.0, 67.0], Array2::zeros((3, 4))).is_err());
    assert!(ThresholdInterpolator::new(vec![33.0, 67.0], values).is_ok());
}
