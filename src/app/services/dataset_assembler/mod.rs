//! Multi-file dataset assembly.
//!
//! This module is the core of the processor: it expands a file-name
//! template across date, forecast-hour and ensemble-member axes, reads
//! every leaf file, and reduces the raw per-file arrays into one QC
//! annotated [`Dataset`](crate::app::models::Dataset).
//!
//! # Architecture
//!
//! - [`loader`] - the [`DatasetAssembler`] with one entry point per
//!   dataset kind (observations, deterministic forecasts, ensemble
//!   forecasts, climatologies)
//! - [`axes`] - fail-fast axis validation performed before any I/O
//! - [`reduce`] - NaN-skipping reductions over the forecast-hour axis
//!
//! # Reliability contract
//!
//! A file that is absent, truncated or without a matching record never
//! aborts a load. The failed path is appended to the audit's
//! `missing_files`, its date is flagged, and the pre-allocated NaN slice
//! is left in place. Only malformed configuration (bad axes, missing GRIB
//! selector) is fatal, and it is rejected before the first file is
//! touched.

pub mod axes;
pub mod loader;
pub mod reduce;

#[cfg(test)]
pub mod tests;

pub use loader::DatasetAssembler;
