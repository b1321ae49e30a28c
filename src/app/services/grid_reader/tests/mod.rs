//! Tests for single-file reads: flat binary records, GRIB delegation and
//! the y-flip path.


use crate::app::services::grid_reader::flat_binary::encode_le_f32;
use crate::app::services::grid_reader::{GribDecoder, GribEdition, GribSelector};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Write one or more concatenated records to `dir/name` and return the path
pub fn write_flat_file(dir: &Path, name: &str, records: &[&[f32]]) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = Vec::new();
    for record in records {
        bytes.extend_from_slice(&encode_le_f32(record));
    }
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Decoder stub returning a fixed array, or a typed failure
pub struct StubDecoder {
    pub values: Vec<f32>,
    pub fail_reason: Option<String>,
}

impl StubDecoder {
    pub fn returning(values: Vec<f32>) -> Self {
        Self {
            values,
            fail_reason: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            values: Vec::new(),
            fail_reason: Some(reason.to_string()),
        }
    }
}

impl GribDecoder for StubDecoder {
    fn decode(
        &self,
        path: &Path,
        _edition: GribEdition,
        _selector: &GribSelector,
        _point_count: usize,
    ) -> Result<Vec<f32>> {
        match &self.fail_reason {
            Some(reason) => Err(Error::reading(path, reason.clone())),
            None => Ok(self.values.clone()),
        }
    }
}
