//! GRIB record selection via an external decoder.
//!
//! The actual GRIB decoding is delegated to a collaborator behind the
//! [`GribDecoder`] trait (in production a wgrib/wgrib2 subprocess, in
//! tests a mock). This module only defines the selector vocabulary and
//! translates collaborator failures into typed reading errors.

use crate::Result;
use std::path::Path;

/// GRIB edition of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GribEdition {
    Grib1,
    Grib2,
}

/// Record selector within a GRIB file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GribSelector {
    /// Variable name, e.g. `TMP`
    pub variable: String,
    /// Level name, e.g. `2 m above ground`
    pub level: String,
    /// Optional forecast-hour filter disambiguating duplicate records
    pub grep_fhr: Option<String>,
}

impl GribSelector {
    pub fn new(variable: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            level: level.into(),
            grep_fhr: None,
        }
    }

    /// Restrict matching to records for the given forecast hour
    pub fn with_grep_fhr(mut self, fhr: impl Into<String>) -> Self {
        self.grep_fhr = Some(fhr.into());
        self
    }
}

/// External GRIB-decoding collaborator.
///
/// Implementations return the flat values of the single record matched by
/// the selector. Expected failure modes surface as
/// [`Reading`](crate::Error::Reading) errors with reason
/// `"no matching record"` or `"tool failure"`; they never panic.
pub trait GribDecoder: Send + Sync {
    fn decode(
        &self,
        path: &Path,
        edition: GribEdition,
        selector: &GribSelector,
        point_count: usize,
    ) -> Result<Vec<f32>>;
}
