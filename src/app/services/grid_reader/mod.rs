//! Single-file reads onto a known grid.
//!
//! [`GridReader::read`] produces one flat array of `grid.point_count()`
//! values from a flat-binary or GRIB file, flipping the y-axis when
//! requested. Expected failures (missing file, truncation, no matching
//! record) come back as [`Reading`](crate::Error::Reading) errors that the
//! assembler downgrades to missing-data records; selector
//! misconfiguration is a fatal [`Configuration`](crate::Error::Configuration)
//! error.

pub mod flat_binary;
pub mod grib;

#[cfg(test)]
pub mod tests;

pub use grib::{GribDecoder, GribEdition, GribSelector};

use crate::app::adapters::geogrid::GeoGrid;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// On-disk format of a gridded input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    /// Record-major little-endian f32 array
    FlatBinary,
    Grib1,
    Grib2,
}

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::FlatBinary => "bin",
            FileFormat::Grib1 => "grib1",
            FileFormat::Grib2 => "grib2",
        }
    }
}

/// Per-read parameters for [`GridReader::read`]
#[derive(Debug, Clone)]
pub struct ReadSpec {
    pub format: FileFormat,
    /// Flat-binary record index; `None` reads from the start of the file
    pub record_index: Option<usize>,
    /// GRIB variable/level selector; required for GRIB formats
    pub selector: Option<GribSelector>,
    /// Flip the array along the grid's y-axis after read
    pub yrev: bool,
}

impl ReadSpec {
    pub fn flat_binary() -> Self {
        Self {
            format: FileFormat::FlatBinary,
            record_index: None,
            selector: None,
            yrev: false,
        }
    }

    pub fn grib(edition: GribEdition, selector: GribSelector) -> Self {
        Self {
            format: match edition {
                GribEdition::Grib1 => FileFormat::Grib1,
                GribEdition::Grib2 => FileFormat::Grib2,
            },
            record_index: None,
            selector: Some(selector),
            yrev: false,
        }
    }

    pub fn with_record_index(mut self, index: usize) -> Self {
        self.record_index = Some(index);
        self
    }

    pub fn with_yrev(mut self, yrev: bool) -> Self {
        self.yrev = yrev;
        self
    }
}

/// Reads single binary or GRIB records into flat arrays on a known grid
#[derive(Clone)]
pub struct GridReader {
    decoder: Arc<dyn GribDecoder>,
}

impl GridReader {
    pub fn new(decoder: Arc<dyn GribDecoder>) -> Self {
        Self { decoder }
    }

    /// Read one record of `grid.point_count()` values from `path`.
    ///
    /// The returned array is y-flipped when `spec.yrev` is set. A record
    /// whose length does not match the grid is a reading error.
    pub fn read(&self, path: &Path, spec: &ReadSpec, grid: &GeoGrid) -> Result<Vec<f32>> {
        let point_count = grid.point_count();
        let mut values = match spec.format {
            FileFormat::FlatBinary => {
                flat_binary::read_record(path, spec.record_index, point_count)?
            }
            FileFormat::Grib1 | FileFormat::Grib2 => {
                let selector = spec.selector.as_ref().ok_or_else(|| {
                    Error::configuration("GRIB reads require a variable/level selector")
                })?;
                let edition = match spec.format {
                    FileFormat::Grib1 => GribEdition::Grib1,
                    _ => GribEdition::Grib2,
                };
                self.decoder.decode(path, edition, selector, point_count)?
            }
        };

        if values.len() != point_count {
            return Err(Error::reading(
                path,
                format!(
                    "record has {} values, grid '{}' expects {}",
                    values.len(),
                    grid.name(),
                    point_count
                ),
            ));
        }

        if spec.yrev {
            grid.flip_y(&mut values);
        }
        Ok(values)
    }
}
