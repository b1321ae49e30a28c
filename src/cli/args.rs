//! Command-line argument definitions for the geofiles processor
//!
//! Defines the complete CLI interface using the clap derive API. Arguments
//! are validated and translated into `LoaderConfig`/`ConversionConfig`
//! before any file is touched.

use crate::app::models::{DataKind, ThresholdKind};
use crate::app::services::grid_reader::FileFormat;
use crate::config::FhrStat;
use crate::constants::{DEFAULT_DELIMITER, DEFAULT_PRECISION};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the geofiles processor
///
/// Assembles gridded meteorological datasets from template-named flat
/// binary or GRIB files, and converts binary POE data into delimited
/// text reports.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "geofiles-processor",
    version,
    about = "Assemble gridded meteorological datasets and convert POE data to text reports",
    long_about = "Loads observation, forecast, ensemble and climatology datasets from \
                  collections of date/fhr/member-templated binary or GRIB files, tolerating \
                  missing files with NaN fills and QC annotations, and converts binary \
                  probability-of-exceedance data into delimited text reports via \
                  climatology threshold interpolation."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the geofiles processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Assemble a dataset from templated files and report its QC summary
    Load(LoadArgs),
    /// Convert a binary POE file into a delimited text report
    Convert(ConvertArgs),
}

/// Arguments for the load command (dataset assembly)
#[derive(Debug, Clone, Parser)]
pub struct LoadArgs {
    /// Kind of dataset to assemble
    #[arg(short = 'k', long = "kind", value_enum, help = "Dataset kind to assemble")]
    pub kind: DataKindArg,

    /// File-name template with {yyyy}/{mm}/{dd}/{cc}/{fhr}/{member} tokens
    #[arg(
        short = 't',
        long = "template",
        value_name = "TEMPLATE",
        help = "File-name template with {yyyy}/{mm}/{dd}/{cc}/{fhr}/{member} tokens"
    )]
    pub template: String,

    /// Named grid the input files are on
    #[arg(
        short = 'g',
        long = "grid",
        value_name = "NAME",
        default_value = "1deg-global",
        help = "Named grid of the input files (e.g. 1deg-global, 2deg-global)"
    )]
    pub grid: String,

    /// On-disk format of the input files
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value = "bin",
        help = "On-disk format of the input files"
    )]
    pub format: FormatArg,

    /// Explicit date keys (comma-separated YYYYMMDD or YYYYMMDDCC)
    ///
    /// Mutually exclusive with --start-date/--end-date. Climatology loads
    /// use --days instead.
    #[arg(
        short = 'd',
        long = "dates",
        value_name = "LIST",
        help = "Comma-separated date keys (YYYYMMDD or YYYYMMDDCC)"
    )]
    pub dates: Option<ValueList>,

    /// First date of a generated daily range (YYYYMMDD or YYYYMMDDCC)
    #[arg(
        long = "start-date",
        value_name = "DATE",
        conflicts_with = "dates",
        help = "First date of a generated daily range"
    )]
    pub start_date: Option<String>,

    /// Last date of a generated daily range (YYYYMMDD)
    #[arg(
        long = "end-date",
        value_name = "DATE",
        conflicts_with = "dates",
        requires = "start_date",
        help = "Last date of a generated daily range"
    )]
    pub end_date: Option<String>,

    /// Day-of-year keys for climatology loads (comma-separated MMDD)
    #[arg(
        long = "days",
        value_name = "LIST",
        help = "Comma-separated day-of-year keys (MMDD) for climatology loads"
    )]
    pub days: Option<ValueList>,

    /// Forecast hours (comma-separated non-negative integers)
    #[arg(
        long = "fhrs",
        value_name = "LIST",
        help = "Comma-separated forecast hours (zero-padded to the widest value)"
    )]
    pub fhrs: Option<IntList>,

    /// Ensemble member identifiers (comma-separated non-negative integers)
    #[arg(
        long = "members",
        value_name = "LIST",
        help = "Comma-separated ensemble member numbers"
    )]
    pub members: Option<IntList>,

    /// Statistic applied over the forecast-hour dimension
    #[arg(
        long = "fhr-stat",
        value_enum,
        default_value = "mean",
        help = "Statistic applied over the forecast-hour dimension"
    )]
    pub fhr_stat: FhrStatArg,

    /// Native percentiles of a climatology file's record axis
    #[arg(
        long = "ptiles",
        value_name = "LIST",
        help = "Comma-separated native percentiles of a climatology file (in [0, 100])"
    )]
    pub ptiles: Option<FloatList>,

    /// Flip each record along the grid's y-axis after read
    #[arg(long = "yrev", help = "Flip each record along the grid's y-axis after read")]
    pub yrev: bool,

    /// GRIB variable name (GRIB formats only)
    #[arg(
        long = "grib-var",
        value_name = "VAR",
        help = "GRIB variable name (GRIB formats only)"
    )]
    pub grib_var: Option<String>,

    /// GRIB level name (GRIB formats only)
    #[arg(
        long = "grib-level",
        value_name = "LEVEL",
        help = "GRIB level name (GRIB formats only)"
    )]
    pub grib_level: Option<String>,

    /// Filter GRIB records by the current forecast hour
    ///
    /// Disambiguates files carrying records for several forecast hours.
    #[arg(
        long = "remove-dup-grib-fhrs",
        help = "Filter GRIB records by the current forecast hour"
    )]
    pub remove_dup_grib_fhrs: bool,

    /// Write the assembled array back out as flat binary
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the assembled array as little-endian flat binary"
    )]
    pub output: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the convert command (binary POE to text report)
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Input flat binary POE file (record-major, one record per percentile)
    #[arg(
        short = 'i',
        long = "poe-file",
        value_name = "FILE",
        help = "Input flat binary POE file, one record per native percentile"
    )]
    pub poe_file: PathBuf,

    /// Native percentiles of the POE records, in file order
    #[arg(
        long = "ptiles",
        value_name = "LIST",
        help = "Comma-separated native percentiles of the POE records"
    )]
    pub ptiles: FloatList,

    /// Named grid the input files are on
    #[arg(
        short = 'g',
        long = "grid",
        value_name = "NAME",
        default_value = "1deg-global",
        help = "Named grid of the input files"
    )]
    pub grid: String,

    /// Flat binary climatology file with raw values at the same percentiles
    ///
    /// Required when --threshold-type is rawval.
    #[arg(
        short = 'c',
        long = "climo-file",
        value_name = "FILE",
        help = "Flat binary climatology file (raw values at the same percentiles)"
    )]
    pub climo_file: Option<PathBuf>,

    /// Space the output thresholds are expressed in
    #[arg(
        long = "threshold-type",
        value_enum,
        default_value = "ptile",
        help = "Space the output thresholds are expressed in"
    )]
    pub threshold_type: ThresholdSpaceArg,

    /// Output threshold values
    #[arg(
        long = "thresholds",
        value_name = "LIST",
        help = "Comma-separated output thresholds (percentiles or raw values)"
    )]
    pub thresholds: FloatList,

    /// Collapse to below/normal/above tercile categories
    ///
    /// Requires exactly two percentile thresholds.
    #[arg(long = "terciles", help = "Emit below/normal/above tercile probabilities")]
    pub terciles: bool,

    /// Written in place of NaN values in the report
    #[arg(
        long = "missing-sentinel",
        value_name = "TEXT",
        help = "Written in place of NaN values (NaN written verbatim when unset)"
    )]
    pub missing_sentinel: Option<String>,

    /// Decimal places for report values
    #[arg(
        long = "precision",
        value_name = "DIGITS",
        default_value_t = DEFAULT_PRECISION,
        help = "Decimal places for report values"
    )]
    pub precision: usize,

    /// Column delimiter
    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        default_value_t = DEFAULT_DELIMITER,
        help = "Column delimiter for the report"
    )]
    pub delimiter: char,

    /// Destination report file
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Destination report file (fully overwritten)"
    )]
    pub output: PathBuf,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Dataset kinds selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataKindArg {
    /// Observations, one file per date
    Obs,
    /// Deterministic forecast, reduced over forecast hours
    DtrmFcst,
    /// Ensemble forecast, per member, reduced over forecast hours
    EnsFcst,
    /// Climatology keyed by day-of-year
    Climo,
}

impl From<DataKindArg> for DataKind {
    fn from(arg: DataKindArg) -> Self {
        match arg {
            DataKindArg::Obs => DataKind::Observation,
            DataKindArg::DtrmFcst | DataKindArg::EnsFcst => DataKind::Forecast,
            DataKindArg::Climo => DataKind::Climatology,
        }
    }
}

/// File formats selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Flat little-endian 32-bit float binary
    Bin,
    /// GRIB edition 1
    Grib1,
    /// GRIB edition 2
    Grib2,
}

impl From<FormatArg> for FileFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Bin => FileFormat::FlatBinary,
            FormatArg::Grib1 => FileFormat::Grib1,
            FormatArg::Grib2 => FileFormat::Grib2,
        }
    }
}

/// Forecast-hour statistics selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FhrStatArg {
    /// Arithmetic mean of non-NaN reads
    Mean,
    /// Sum of non-NaN reads
    Sum,
}

impl From<FhrStatArg> for FhrStat {
    fn from(arg: FhrStatArg) -> Self {
        match arg {
            FhrStatArg::Mean => FhrStat::Mean,
            FhrStatArg::Sum => FhrStat::Sum,
        }
    }
}

/// Threshold spaces selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThresholdSpaceArg {
    /// Percentile thresholds in [0, 100]
    Ptile,
    /// Raw physical-value thresholds
    Rawval,
}

impl From<ThresholdSpaceArg> for ThresholdKind {
    fn from(arg: ThresholdSpaceArg) -> Self {
        match arg {
            ThresholdSpaceArg::Ptile => ThresholdKind::Percentile,
            ThresholdSpaceArg::Rawval => ThresholdKind::Raw,
        }
    }
}

/// Wrapper for parsing comma-separated string lists
#[derive(Debug, Clone)]
pub struct ValueList {
    pub values: Vec<String>,
}

impl FromStr for ValueList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let values: Vec<String> = s
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        if values.is_empty() {
            return Err(Error::configuration("value list cannot be empty"));
        }
        Ok(ValueList { values })
    }
}

/// Wrapper for parsing comma-separated non-negative integer lists
#[derive(Debug, Clone)]
pub struct IntList {
    pub values: Vec<i64>,
}

impl FromStr for IntList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut values = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let value: i64 = part
                .parse()
                .map_err(|_| Error::configuration(format!("invalid integer '{}'", part)))?;
            values.push(value);
        }
        if values.is_empty() {
            return Err(Error::configuration("integer list cannot be empty"));
        }
        Ok(IntList { values })
    }
}

/// Wrapper for parsing comma-separated float lists
#[derive(Debug, Clone)]
pub struct FloatList {
    pub values: Vec<f64>,
}

impl FromStr for FloatList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut values = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let value: f64 = part
                .parse()
                .map_err(|_| Error::configuration(format!("invalid number '{}'", part)))?;
            values.push(value);
        }
        if values.is_empty() {
            return Err(Error::configuration("number list cannot be empty"));
        }
        Ok(FloatList { values })
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl LoadArgs {
    /// Validate the load command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            DataKindArg::Climo => {
                if self.days.is_none() {
                    return Err(Error::configuration(
                        "climatology loads require --days".to_string(),
                    ));
                }
                if self.dates.is_some() || self.start_date.is_some() {
                    return Err(Error::configuration(
                        "climatology loads take --days, not calendar dates".to_string(),
                    ));
                }
            }
            _ => {
                if self.dates.is_none() && self.start_date.is_none() {
                    return Err(Error::configuration(
                        "load requires --dates or --start-date/--end-date".to_string(),
                    ));
                }
                if self.start_date.is_some() && self.end_date.is_none() {
                    return Err(Error::configuration(
                        "--start-date requires --end-date".to_string(),
                    ));
                }
                if self.days.is_some() {
                    return Err(Error::configuration(
                        "--days only applies to climatology loads".to_string(),
                    ));
                }
            }
        }

        if matches!(self.kind, DataKindArg::DtrmFcst | DataKindArg::EnsFcst)
            && self.fhrs.is_none()
        {
            return Err(Error::configuration(
                "forecast loads require --fhrs".to_string(),
            ));
        }
        if self.kind == DataKindArg::EnsFcst && self.members.is_none() {
            return Err(Error::configuration(
                "ensemble loads require --members".to_string(),
            ));
        }
        if self.ptiles.is_some() && self.kind != DataKindArg::Climo {
            return Err(Error::configuration(
                "--ptiles only applies to climatology loads".to_string(),
            ));
        }

        // Validate output directory exists if specified
        if let Some(output) = &self.output {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress output (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ConvertArgs {
    /// Validate the convert command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.poe_file.exists() {
            return Err(Error::configuration(format!(
                "POE file does not exist: {}",
                self.poe_file.display()
            )));
        }
        if let Some(climo_file) = &self.climo_file {
            if !climo_file.exists() {
                return Err(Error::configuration(format!(
                    "Climatology file does not exist: {}",
                    climo_file.display()
                )));
            }
        }
        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(Error::configuration(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}
