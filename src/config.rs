//! Configuration for dataset loading and conversion.
//!
//! Provides the loader and conversion configuration structures translated
//! from CLI arguments before any I/O takes place, with builder-style
//! helpers for programmatic use.

use crate::app::models::ThresholdKind;
use crate::app::services::grid_reader::FileFormat;
use crate::constants::{DEFAULT_DELIMITER, DEFAULT_PRECISION};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Statistic applied over the forecast-hour dimension of each date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FhrStat {
    /// Arithmetic mean of non-NaN forecast-hour reads
    Mean,
    /// Sum of non-NaN forecast-hour reads
    Sum,
}

impl FromStr for FhrStat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "sum" => Ok(Self::Sum),
            other => Err(Error::configuration(format!(
                "fhr_stat must be 'mean' or 'sum', got '{}'",
                other
            ))),
        }
    }
}

/// Configuration for multi-file dataset assembly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// File-name template containing {yyyy}/{mm}/{dd}/{cc}/{hh}/{fhr}/{member} tokens
    pub file_template: String,

    /// On-disk format of the input files
    pub format: FileFormat,

    /// Statistic applied over the forecast-hour dimension
    pub fhr_stat: FhrStat,

    /// Whether source arrays are stored north-to-south and must be flipped
    pub yrev: bool,

    /// GRIB variable name (GRIB formats only)
    pub grib_var: Option<String>,

    /// GRIB level name (GRIB formats only)
    pub grib_level: Option<String>,

    /// Filter GRIB records by the current forecast hour to drop duplicates
    pub remove_dup_grib_fhrs: bool,
}

impl LoaderConfig {
    /// Create a loader configuration for the given template and format
    pub fn new(file_template: impl Into<String>, format: FileFormat) -> Self {
        Self {
            file_template: file_template.into(),
            format,
            fhr_stat: FhrStat::Mean,
            yrev: false,
            grib_var: None,
            grib_level: None,
            remove_dup_grib_fhrs: false,
        }
    }

    /// Set the forecast-hour statistic
    pub fn with_fhr_stat(mut self, fhr_stat: FhrStat) -> Self {
        self.fhr_stat = fhr_stat;
        self
    }

    /// Enable the y-direction flip on read
    pub fn with_yrev(mut self) -> Self {
        self.yrev = true;
        self
    }

    /// Set the GRIB variable and level selector
    pub fn with_grib_selector(
        mut self,
        variable: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        self.grib_var = Some(variable.into());
        self.grib_level = Some(level.into());
        self
    }

    /// Enable duplicate-fhr filtering of GRIB records
    pub fn with_remove_dup_grib_fhrs(mut self) -> Self {
        self.remove_dup_grib_fhrs = true;
        self
    }

    /// Check internal consistency before any I/O.
    ///
    /// GRIB formats need a variable/level selector; flat binary must not
    /// carry one.
    pub fn validate(&self) -> Result<()> {
        if self.file_template.is_empty() {
            return Err(Error::configuration("file template cannot be empty"));
        }
        match self.format {
            FileFormat::Grib1 | FileFormat::Grib2 => {
                if self.grib_var.is_none() || self.grib_level.is_none() {
                    return Err(Error::configuration(
                        "GRIB formats require both a variable and a level selector",
                    ));
                }
            }
            FileFormat::FlatBinary => {
                if self.remove_dup_grib_fhrs {
                    return Err(Error::configuration(
                        "remove_dup_grib_fhrs only applies to GRIB formats",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Configuration for converting POE/value arrays into text reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Space the output thresholds are expressed in
    pub output_threshold_type: ThresholdKind,

    /// Output threshold values (percentiles in [0,100] or raw values)
    pub thresholds: Vec<f64>,

    /// Collapse to below/normal/above tercile categories
    pub terciles: bool,

    /// Written in place of NaN values; NaN is written verbatim when unset
    pub missing_sentinel: Option<String>,

    /// Decimal places for report values
    pub precision: usize,

    /// Column delimiter
    pub delimiter: char,
}

impl ConversionConfig {
    /// Create a conversion configuration for the given thresholds
    pub fn new(output_threshold_type: ThresholdKind, thresholds: Vec<f64>) -> Self {
        Self {
            output_threshold_type,
            thresholds,
            terciles: false,
            missing_sentinel: None,
            precision: DEFAULT_PRECISION,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Enable tercile (below/normal/above) output
    pub fn with_terciles(mut self) -> Self {
        self.terciles = true;
        self
    }

    /// Set the missing-value sentinel
    pub fn with_missing_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.missing_sentinel = Some(sentinel.into());
        self
    }

    /// Set the value precision
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Set the column delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Check threshold/flag consistency before any I/O
    pub fn validate(&self) -> Result<()> {
        if self.thresholds.is_empty() {
            return Err(Error::configuration("threshold list cannot be empty"));
        }
        if self.terciles && self.thresholds.len() != 2 {
            return Err(Error::threshold(
                "tercile mode requires exactly 2 thresholds",
            ));
        }
        if self.output_threshold_type == ThresholdKind::Percentile {
            for &t in &self.thresholds {
                if !(0.0..=100.0).contains(&t) {
                    return Err(Error::configuration(format!(
                        "percentile threshold {} outside [0, 100]",
                        t
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fhr_stat_from_str() {
        assert_eq!(FhrStat::from_str("mean").unwrap(), FhrStat::Mean);
        assert_eq!(FhrStat::from_str("SUM").unwrap(), FhrStat::Sum);
        assert!(FhrStat::from_str("std").is_err());
    }

    #[test]
    fn test_loader_config_grib_requires_selector() {
        let config = LoaderConfig::new("{yyyy}{mm}{dd}.grb", FileFormat::Grib2);
        assert!(config.validate().is_err());

        let config = config.with_grib_selector("TMP", "2 m above ground");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_loader_config_bin_rejects_grep_fhr() {
        let config =
            LoaderConfig::new("{yyyy}{mm}{dd}.bin", FileFormat::FlatBinary).with_remove_dup_grib_fhrs();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_conversion_config_tercile_threshold_count() {
        let config =
            ConversionConfig::new(ThresholdKind::Percentile, vec![33.0, 50.0, 67.0]).with_terciles();
        assert!(config.validate().is_err());

        let config = ConversionConfig::new(ThresholdKind::Percentile, vec![33.0, 67.0]).with_terciles();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_conversion_config_percentile_range() {
        let config = ConversionConfig::new(ThresholdKind::Percentile, vec![33.0, 120.0]);
        assert!(config.validate().is_err());

        let config = ConversionConfig::new(ThresholdKind::Raw, vec![-15.0, 300.0]);
        assert!(config.validate().is_ok());
    }
}
