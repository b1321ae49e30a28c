//! Core data model for assembled datasets.
//!
//! A [`Dataset`] is the aggregate result of one load call: a [`LoadAudit`]
//! QC header shared by all kinds plus a kind-specific [`DataPayload`]
//! block. Downstream consumers dispatch on [`DataKind`] rather than on the
//! concrete payload type.
//!
//! Also defines the axis and threshold value types used to drive a load:
//! [`AxisSpec`] (ordered date/fhr/member values with zero-padding) and
//! [`ThresholdSet`] (percentile- or raw-space threshold descriptors).

pub mod audit;

pub use audit::LoadAudit;

use crate::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate};
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Tag discriminating dataset variants for downstream dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataKind {
    Observation,
    Forecast,
    Climatology,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Observation => "observation",
            DataKind::Forecast => "forecast",
            DataKind::Climatology => "climatology",
        }
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate result of a load operation: QC header plus data block.
///
/// Created empty by the assembler, populated slice-by-slice, returned
/// complete and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub kind: DataKind,
    pub audit: LoadAudit,
    pub payload: DataPayload,
}

impl Dataset {
    /// Observation array `[date, point]`, if this is an observation dataset
    pub fn obs(&self) -> Option<&Array2<f32>> {
        match &self.payload {
            DataPayload::Observation { obs } => Some(obs),
            _ => None,
        }
    }

    /// Forecast array `[date, point]`, if this is a deterministic forecast
    pub fn fcst(&self) -> Option<&Array2<f32>> {
        match &self.payload {
            DataPayload::DeterministicForecast { fcst } => Some(fcst),
            _ => None,
        }
    }

    /// Ensemble data block, if this is an ensemble forecast
    pub fn ensemble(&self) -> Option<&EnsembleData> {
        match &self.payload {
            DataPayload::EnsembleForecast(ens) => Some(ens),
            _ => None,
        }
    }

    /// Climatology data block, if this is a climatology dataset
    pub fn climatology(&self) -> Option<&ClimatologyData> {
        match &self.payload {
            DataPayload::Climatology(climo) => Some(climo),
            _ => None,
        }
    }
}

/// Kind-specific data block of a [`Dataset`]
#[derive(Debug, Clone)]
pub enum DataPayload {
    /// Observations: `obs[date, point]`
    Observation { obs: Array2<f32> },
    /// Deterministic forecast, fhr-reduced: `fcst[date, point]`
    DeterministicForecast { fcst: Array2<f32> },
    /// Ensemble forecast, fhr-reduced per member
    EnsembleForecast(EnsembleData),
    /// Climatology keyed by day-of-year
    Climatology(ClimatologyData),
}

/// Ensemble forecast block with lazily derived mean and spread.
///
/// `ens_mean`/`ens_spread` are computed across the member axis on first
/// access and cached; the stored `ens` array is never mutated.
#[derive(Debug, Clone, Default)]
pub struct EnsembleData {
    /// Member values, fhr-reduced: `ens[date, member, point]`
    pub ens: Array3<f32>,
    mean: OnceLock<Array2<f32>>,
    spread: OnceLock<Array2<f32>>,
}

impl EnsembleData {
    pub fn new(ens: Array3<f32>) -> Self {
        Self {
            ens,
            mean: OnceLock::new(),
            spread: OnceLock::new(),
        }
    }

    /// NaN-skipping mean across the member axis: `[date, point]`.
    ///
    /// A point with all members missing stays NaN.
    pub fn ens_mean(&self) -> &Array2<f32> {
        self.mean.get_or_init(|| {
            let (ndates, _, npoints) = self.ens.dim();
            Array2::from_shape_fn((ndates, npoints), |(d, p)| {
                nan_mean(self.ens.slice(ndarray::s![d, .., p]).iter().copied())
            })
        })
    }

    /// NaN-skipping population standard deviation across the member axis:
    /// `[date, point]`
    pub fn ens_spread(&self) -> &Array2<f32> {
        self.spread.get_or_init(|| {
            let (ndates, _, npoints) = self.ens.dim();
            Array2::from_shape_fn((ndates, npoints), |(d, p)| {
                nan_std_pop(self.ens.slice(ndarray::s![d, .., p]).iter().copied())
            })
        })
    }
}

/// Mean over non-NaN values; NaN when no value survives
fn nan_mean(values: impl Iterator<Item = f32>) -> f32 {
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

/// Population standard deviation over non-NaN values; NaN when none survive
fn nan_std_pop(values: impl Iterator<Item = f32>) -> f32 {
    let kept: Vec<f64> = values.filter(|v| !v.is_nan()).map(|v| v as f64).collect();
    if kept.is_empty() {
        return f32::NAN;
    }
    let mean = kept.iter().sum::<f64>() / kept.len() as f64;
    let var = kept.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / kept.len() as f64;
    (var.sqrt()) as f32
}

/// Climatology block keyed by day-of-year.
///
/// `climo[day, ptile, point]`; the ptile axis has length 1 when no
/// percentile list was supplied.
#[derive(Debug, Clone)]
pub struct ClimatologyData {
    /// Day-of-year keys (MMDD), in request order
    pub day_keys: Vec<String>,
    /// Native percentiles of the ptile axis, when supplied
    pub ptiles: Option<Vec<f64>>,
    pub climo: Array3<f32>,
}

/// Step size for generated date axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Days,
    Years,
}

/// An ordered, non-empty sequence of concrete axis values.
///
/// Immutable once constructed. Numeric axes are zero-padded to the width
/// of the widest element before formatting into file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSpec {
    values: Vec<String>,
}

impl AxisSpec {
    /// Build an axis from pre-formatted string values
    pub fn from_strings<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(Error::configuration("axis values cannot be empty"));
        }
        if values.iter().any(|v| v.is_empty()) {
            return Err(Error::configuration("axis values cannot contain empty strings"));
        }
        Ok(Self { values })
    }

    /// Build a numeric axis, zero-padding every value to the widest element
    pub fn from_numbers(values: &[i64]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::configuration("axis values cannot be empty"));
        }
        if let Some(v) = values.iter().find(|v| **v < 0) {
            return Err(Error::configuration(format!(
                "numeric axis values must be non-negative, got {}",
                v
            )));
        }
        let width = values
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);
        let values = values.iter().map(|v| format!("{:0width$}", v)).collect();
        Ok(Self { values })
    }

    /// Generate a date axis from `start` to `end` inclusive.
    ///
    /// Keys are `YYYYMMDD` or `YYYYMMDDCC`; a cycle suffix on `start` is
    /// carried onto every generated key. `Interval::Years` steps by
    /// calendar year keeping the month/day of `start`.
    pub fn date_range(start: &str, end: &str, interval: Interval) -> Result<Self> {
        let (start_date, cycle) = parse_date_key(start)?;
        let (end_date, _) = parse_date_key(end)?;
        if start_date > end_date {
            return Err(Error::configuration(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        let suffix = cycle.unwrap_or_default();
        let mut values = Vec::new();
        match interval {
            Interval::Days => {
                let mut current = start_date;
                while current <= end_date {
                    values.push(format!("{}{}", current.format("%Y%m%d"), suffix));
                    current += Duration::days(1);
                }
            }
            Interval::Years => {
                let mut year = start_date.year();
                while year <= end_date.year() {
                    // Feb 29 starts collapse to Feb 28 in non-leap years
                    let date = NaiveDate::from_ymd_opt(year, start_date.month(), start_date.day())
                        .or_else(|| NaiveDate::from_ymd_opt(year, start_date.month(), 28))
                        .ok_or_else(|| {
                            Error::configuration(format!("cannot build date for year {}", year))
                        })?;
                    if date <= end_date {
                        values.push(format!("{}{}", date.format("%Y%m%d"), suffix));
                    }
                    year += 1;
                }
            }
        }
        Self::from_strings(values)
    }

    /// Check that every value parses as a `YYYYMMDD[CC]` date key
    pub fn validate_dates(&self) -> Result<()> {
        for value in &self.values {
            parse_date_key(value)?;
        }
        Ok(())
    }

    /// Check that every value parses as an `MMDD` day-of-year key
    pub fn validate_days(&self) -> Result<()> {
        for value in &self.values {
            parse_day_key(value)?;
        }
        Ok(())
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.values.iter()
    }
}

/// Parse a `YYYYMMDD` or `YYYYMMDDCC` date key into its calendar date and
/// optional cycle suffix
pub fn parse_date_key(key: &str) -> Result<(NaiveDate, Option<String>)> {
    if (key.len() != 8 && key.len() != 10) || !key.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::configuration(format!(
            "date key '{}' must be YYYYMMDD or YYYYMMDDCC",
            key
        )));
    }
    let date = NaiveDate::parse_from_str(&key[0..8], "%Y%m%d")
        .map_err(|e| Error::datetime_parsing(format!("invalid date key '{}'", key), e))?;
    let cycle = if key.len() == 10 {
        let cc = &key[8..10];
        let hour: u32 = cc
            .parse()
            .map_err(|_| Error::configuration(format!("invalid cycle '{}' in date key", cc)))?;
        if hour > 23 {
            return Err(Error::configuration(format!(
                "cycle {} in date key '{}' outside 00-23",
                cc, key
            )));
        }
        Some(cc.to_string())
    } else {
        None
    };
    Ok((date, cycle))
}

/// Parse an `MMDD` day-of-year key into (month, day)
pub fn parse_day_key(key: &str) -> Result<(u32, u32)> {
    if key.len() != 4 || !key.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::configuration(format!(
            "day key '{}' must be MMDD",
            key
        )));
    }
    let month: u32 = key[0..2]
        .parse()
        .map_err(|_| Error::configuration(format!("invalid month in day key '{}'", key)))?;
    let day: u32 = key[2..4]
        .parse()
        .map_err(|_| Error::configuration(format!("invalid day in day key '{}'", key)))?;
    // 2000 is a leap year, so 0229 is accepted
    if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
        return Err(Error::configuration(format!(
            "day key '{}' is not a valid month/day",
            key
        )));
    }
    Ok((month, day))
}

/// Which space a threshold descriptor lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdKind {
    /// Percentile value in [0, 100]
    Percentile,
    /// Raw physical value
    Raw,
}

/// An ordered sequence of thresholds, all of one kind.
///
/// Desired-output thresholds and climatology-native thresholds are
/// independent sets reconciled by interpolation when their kinds differ.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSet {
    pub kind: ThresholdKind,
    pub values: Vec<f64>,
}

impl ThresholdSet {
    pub fn new(kind: ThresholdKind, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::configuration("threshold list cannot be empty"));
        }
        if kind == ThresholdKind::Percentile {
            for &v in &values {
                if !(0.0..=100.0).contains(&v) {
                    return Err(Error::configuration(format!(
                        "percentile threshold {} outside [0, 100]",
                        v
                    )));
                }
            }
        }
        Ok(Self { kind, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_axis_from_numbers_pads_to_widest() {
        let axis = AxisSpec::from_numbers(&[0, 6, 12, 120]).unwrap();
        assert_eq!(axis.values(), &["000", "006", "012", "120"]);
    }

    #[test]
    fn test_axis_from_numbers_rejects_negative() {
        assert!(AxisSpec::from_numbers(&[0, -6]).is_err());
    }

    #[test]
    fn test_axis_rejects_empty() {
        assert!(AxisSpec::from_strings(Vec::<String>::new()).is_err());
        assert!(AxisSpec::from_numbers(&[]).is_err());
    }

    #[test]
    fn test_date_range_days() {
        let axis = AxisSpec::date_range("20160228", "20160302", Interval::Days).unwrap();
        assert_eq!(
            axis.values(),
            &["20160228", "20160229", "20160301", "20160302"]
        );
    }

    #[test]
    fn test_date_range_years_keeps_cycle() {
        let axis = AxisSpec::date_range("1981052500", "1984052500", Interval::Years).unwrap();
        assert_eq!(
            axis.values(),
            &["1981052500", "1982052500", "1983052500", "1984052500"]
        );
    }

    #[test]
    fn test_validate_dates() {
        let good = AxisSpec::from_strings(["20160515", "2016051600"]).unwrap();
        assert!(good.validate_dates().is_ok());

        let bad = AxisSpec::from_strings(["20161332"]).unwrap();
        assert!(bad.validate_dates().is_err());

        let bad_cycle = AxisSpec::from_strings(["2016051525"]).unwrap();
        assert!(bad_cycle.validate_dates().is_err());
    }

    #[test]
    fn test_parse_date_key_default_cycle() {
        let (date, cycle) = parse_date_key("20160515").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2016, 5, 15).unwrap());
        assert!(cycle.is_none());

        let (_, cycle) = parse_date_key("2016051512").unwrap();
        assert_eq!(cycle.as_deref(), Some("12"));
    }

    #[test]
    fn test_parse_day_key() {
        assert_eq!(parse_day_key("0229").unwrap(), (2, 29));
        assert!(parse_day_key("1332").is_err());
        assert!(parse_day_key("515").is_err());
    }

    #[test]
    fn test_keys_with_non_ascii_digits_are_errors_not_panics() {
        // 'é' is two bytes, so byte-indexed slicing would split it
        assert!(parse_date_key("1234567é1").is_err());
        assert!(parse_day_key("0é5").is_err());

        let axis = AxisSpec::from_strings(["1234567é1"]).unwrap();
        assert!(axis.validate_dates().is_err());
        let axis = AxisSpec::from_strings(["0é5"]).unwrap();
        assert!(axis.validate_days().is_err());
    }

    #[test]
    fn test_threshold_set_percentile_range() {
        assert!(ThresholdSet::new(ThresholdKind::Percentile, vec![33.0, 67.0]).is_ok());
        assert!(ThresholdSet::new(ThresholdKind::Percentile, vec![101.0]).is_err());
        assert!(ThresholdSet::new(ThresholdKind::Raw, vec![-40.0, 50.0]).is_ok());
        assert!(ThresholdSet::new(ThresholdKind::Raw, vec![]).is_err());
    }

    #[test]
    fn test_ens_mean_and_spread_skip_nan() {
        // one date, three members, two points
        let ens = array![[[10.0f32, 1.0], [20.0, f32::NAN], [f32::NAN, f32::NAN]]];
        let data = EnsembleData::new(ens);

        let mean = data.ens_mean();
        assert_abs_diff_eq!(mean[[0, 0]], 15.0, epsilon = 1e-6);
        assert_abs_diff_eq!(mean[[0, 1]], 1.0, epsilon = 1e-6);

        let spread = data.ens_spread();
        assert_abs_diff_eq!(spread[[0, 0]], 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(spread[[0, 1]], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ens_stats_all_missing_point_is_nan() {
        let ens = array![[[f32::NAN], [f32::NAN]]];
        let data = EnsembleData::new(ens);
        assert!(data.ens_mean()[[0, 0]].is_nan());
        assert!(data.ens_spread()[[0, 0]].is_nan());
    }

    #[test]
    fn test_ens_stats_cached_between_calls() {
        let ens = array![[[1.0f32, 2.0], [3.0, 4.0]]];
        let data = EnsembleData::new(ens);
        let first = data.ens_mean() as *const _;
        let second = data.ens_mean() as *const _;
        assert_eq!(first, second);
    }

    #[test]
    fn test_data_kind_as_str() {
        assert_eq!(DataKind::Observation.as_str(), "observation");
        assert_eq!(DataKind::Forecast.as_str(), "forecast");
        assert_eq!(DataKind::Climatology.as_str(), "climatology");
    }
}
