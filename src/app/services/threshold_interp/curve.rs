//! Scalar monotone piecewise-linear interpolation.
//!
//! Queries outside the curve's range extrapolate linearly along the
//! nearest segment; this is defined behavior, not an error. NaN anywhere
//! in the query or the touched segment propagates to a NaN result.

/// Interpolate `x` along the curve `(xs, ys)`.
///
/// `xs` must be ascending and at least two points long; callers validate
/// that once, at curve construction.
pub fn interp1(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(xs.len() >= 2);

    if x.is_nan() {
        return f64::NAN;
    }

    // Segment index: clamp to the end segments for extrapolation
    let upper = xs.partition_point(|&v| v < x).clamp(1, xs.len() - 1);
    let (x0, x1) = (xs[upper - 1], xs[upper]);
    let (y0, y1) = (ys[upper - 1], ys[upper]);

    if x1 == x0 {
        // degenerate flat segment
        return y0;
    }
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

/// Check that a curve axis is strictly ascending and NaN-free
pub fn is_strictly_ascending(xs: &[f64]) -> bool {
    xs.len() >= 2 && xs.windows(2).all(|w| w[0] < w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const XS: &[f64] = &[10.0, 20.0, 40.0];
    const YS: &[f64] = &[1.0, 2.0, 4.0];

    #[test]
    fn test_interior_interpolation() {
        assert_abs_diff_eq!(interp1(15.0, XS, YS), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(interp1(30.0, XS, YS), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exact_knots() {
        assert_abs_diff_eq!(interp1(10.0, XS, YS), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(interp1(40.0, XS, YS), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolation_uses_end_segments() {
        assert_abs_diff_eq!(interp1(0.0, XS, YS), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(interp1(50.0, XS, YS), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_query_propagates() {
        assert!(interp1(f64::NAN, XS, YS).is_nan());
    }

    #[test]
    fn test_nan_segment_propagates() {
        let ys = &[f64::NAN, 2.0, 4.0];
        assert!(interp1(15.0, XS, ys).is_nan());
        // segments away from the NaN stay usable
        assert_abs_diff_eq!(interp1(30.0, XS, ys), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_is_strictly_ascending() {
        assert!(is_strictly_ascending(&[1.0, 2.0, 3.0]));
        assert!(!is_strictly_ascending(&[1.0, 1.0, 3.0]));
        assert!(!is_strictly_ascending(&[1.0]));
        assert!(!is_strictly_ascending(&[1.0, f64::NAN, 3.0]));
    }
}
