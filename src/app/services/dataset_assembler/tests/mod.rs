//! Tests for multi-file dataset assembly.
//!
//! Fixtures build small on-disk trees of flat binary files under a temp
//! directory and drive the assembler against a tiny 2x2 grid.


use crate::app::adapters::geogrid::GeoGrid;
use crate::app::services::dataset_assembler::DatasetAssembler;
use crate::app::services::grid_reader::flat_binary::encode_le_f32;
use crate::app::services::grid_reader::FileFormat;
use crate::config::LoaderConfig;
use std::path::Path;

/// Four-point grid used by all assembler tests
pub fn test_grid() -> GeoGrid {
    GeoGrid::custom("test-2x2", 2, 2).unwrap()
}

/// A record with the same value at every grid point
pub fn uniform_record(value: f32) -> Vec<f32> {
    vec![value; test_grid().point_count()]
}

/// Write concatenated records to `dir/name`
pub fn write_records(dir: &Path, name: &str, records: &[Vec<f32>]) {
    let mut bytes = Vec::new();
    for record in records {
        bytes.extend_from_slice(&encode_le_f32(record));
    }
    std::fs::write(dir.join(name), bytes).unwrap();
}

/// Assembler over flat binary files matching `dir/<template>`
pub fn flat_assembler(dir: &Path, template: &str) -> DatasetAssembler {
    let template = format!("{}/{}", dir.display(), template);
    let config = LoaderConfig::new(template, FileFormat::FlatBinary);
    DatasetAssembler::new(config, test_grid())
}
