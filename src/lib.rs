//! Geofiles Processor Library
//!
//! A Rust library for assembling gridded meteorological datasets from flat
//! binary and GRIB files, and for converting binary percentile/POE data into
//! delimited text reports.
//!
//! This library provides tools for:
//! - Expanding file-name templates across date, forecast-hour and ensemble
//!   member axes
//! - Reading single flat-binary or GRIB records onto a known grid
//! - Assembling multi-file datasets with per-file failure tolerance and
//!   QC annotations (missing dates, missing files, NaN-filled slices)
//! - Reducing forecast-hour and ensemble-member dimensions with
//!   NaN-skipping statistics
//! - Interpolating between percentile space and raw-value space using a
//!   monotone climatology curve
//! - Writing fixed-precision delimited text reports

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod conversion;
        pub mod dataset_assembler;
        pub mod grid_reader;
        pub mod report_writer;
        pub mod template_expander;
        pub mod threshold_interp;
    }
    pub mod adapters {
        pub mod geogrid;
        pub mod wgrib;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::adapters::geogrid::GeoGrid;
pub use app::models::{AxisSpec, DataKind, DataPayload, Dataset, LoadAudit, ThresholdSet};
pub use config::{ConversionConfig, FhrStat, LoaderConfig};

/// Result type alias for the geofiles processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for dataset assembly and conversion operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Caller supplied invalid axes, mismatched counts or incompatible flags
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A required placeholder token had no substitution value
    #[error("Template error: {message}")]
    Template { message: String },

    /// A specific file could not be opened, was truncated or had no
    /// matching record. Recovered by the assembler; fatal for single reads.
    #[error("Reading error for file '{file}': {reason}")]
    Reading {
        file: std::path::PathBuf,
        reason: String,
    },

    /// Malformed threshold configuration for interpolation
    #[error("Threshold error: {message}")]
    Threshold { message: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create a reading error for a specific file
    pub fn reading(file: impl Into<std::path::PathBuf>, reason: impl Into<String>) -> Self {
        Self::Reading {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a threshold error
    pub fn threshold(message: impl Into<String>) -> Self {
        Self::Threshold {
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Whether this error is a recoverable per-file reading failure
    pub fn is_reading(&self) -> bool {
        matches!(self, Self::Reading { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}
