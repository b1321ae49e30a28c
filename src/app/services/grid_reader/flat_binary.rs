//! Flat binary record reads.
//!
//! Files are sequences of little-endian 32-bit floats, record-major:
//! record `i`'s `point_count` values occupy byte offset
//! `i * point_count * 4`.

use crate::constants::BYTES_PER_VALUE;
use crate::{Error, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Read one record of `point_count` little-endian f32 values.
///
/// With a record index the read seeks to that record's offset; without
/// one the values are taken from the start of the file. Fewer bytes than
/// required is a `truncated` reading error.
pub fn read_record(path: &Path, record_index: Option<usize>, point_count: usize) -> Result<Vec<f32>> {
    let bytes_needed = point_count * BYTES_PER_VALUE;
    let mut file =
        File::open(path).map_err(|e| Error::reading(path, format!("open failed: {}", e)))?;

    if let Some(index) = record_index {
        let offset = (index * bytes_needed) as u64;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| Error::reading(path, format!("seek failed: {}", e)))?;
    }

    let mut buf = vec![0u8; bytes_needed];
    file.read_exact(&mut buf)
        .map_err(|_| Error::reading(path, "truncated"))?;

    Ok(decode_le_f32(&buf))
}

/// Decode a little-endian f32 byte buffer
pub fn decode_le_f32(buf: &[u8]) -> Vec<f32> {
    buf.chunks_exact(BYTES_PER_VALUE)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Encode values as little-endian f32 bytes (used when dumping aggregates)
pub fn encode_le_f32(values: &[f32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(values.len() * BYTES_PER_VALUE);
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf
}
