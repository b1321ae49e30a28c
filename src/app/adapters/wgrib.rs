//! wgrib/wgrib2 subprocess decoder.
//!
//! Production implementation of [`GribDecoder`] that shells out to the
//! external wgrib (GRIB1) and wgrib2 (GRIB2) tools. The matched record is
//! written to a scratch [`NamedTempFile`] as headerless little-endian
//! floats and read back; the temp file is removed on every exit path by
//! RAII drop, including errors.
//!
//! Tool failures and empty matches are reported as
//! [`Reading`](crate::Error::Reading) errors with reasons `"tool failure"`
//! and `"no matching record"` so the assembler can downgrade them to
//! missing-data records.

use crate::app::services::grid_reader::flat_binary::decode_le_f32;
use crate::app::services::grid_reader::{GribDecoder, GribEdition, GribSelector};
use crate::constants::{BYTES_PER_VALUE, WGRIB1_BIN, WGRIB2_BIN};
use crate::{Error, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;
use tracing::debug;

/// GRIB decoder backed by the wgrib family of command-line tools
#[derive(Debug, Clone)]
pub struct WgribDecoder {
    wgrib_bin: String,
    wgrib2_bin: String,
}

impl Default for WgribDecoder {
    fn default() -> Self {
        Self {
            wgrib_bin: WGRIB1_BIN.to_string(),
            wgrib2_bin: WGRIB2_BIN.to_string(),
        }
    }
}

impl WgribDecoder {
    /// Override the tool executables (e.g. absolute paths)
    pub fn with_binaries(wgrib_bin: impl Into<String>, wgrib2_bin: impl Into<String>) -> Self {
        Self {
            wgrib_bin: wgrib_bin.into(),
            wgrib2_bin: wgrib2_bin.into(),
        }
    }

    fn decode_grib2(
        &self,
        path: &Path,
        selector: &GribSelector,
        point_count: usize,
    ) -> Result<Vec<f32>> {
        let scratch = NamedTempFile::new()
            .map_err(|e| Error::io("failed to create scratch file for wgrib2", e))?;

        let mut command = Command::new(&self.wgrib2_bin);
        command
            .arg(path)
            .args(["-match", &selector.variable])
            .args(["-match", &selector.level]);
        if let Some(fhr) = &selector.grep_fhr {
            command.args(["-match", fhr]);
        }
        command
            .args(["-end", "-order", "we:sn", "-no_header", "-bin"])
            .arg(scratch.path());

        debug!(file = %path.display(), tool = %self.wgrib2_bin, "extracting grib2 record");
        let output = command
            .output()
            .map_err(|e| Error::reading(path, format!("tool failure: {}", e)))?;
        if !output.status.success() {
            return Err(Error::reading(
                path,
                format!(
                    "tool failure: {} exited with {}: {}",
                    self.wgrib2_bin,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        read_scratch_record(path, scratch.path(), point_count)
    }

    fn decode_grib1(
        &self,
        path: &Path,
        selector: &GribSelector,
        point_count: usize,
    ) -> Result<Vec<f32>> {
        // Pass 1: inventory, to find the record matching the selector
        let inventory = Command::new(&self.wgrib_bin)
            .arg("-s")
            .arg(path)
            .output()
            .map_err(|e| Error::reading(path, format!("tool failure: {}", e)))?;
        if !inventory.status.success() {
            return Err(Error::reading(
                path,
                format!(
                    "tool failure: {} exited with {}: {}",
                    self.wgrib_bin,
                    inventory.status,
                    String::from_utf8_lossy(&inventory.stderr).trim()
                ),
            ));
        }
        let stdout = String::from_utf8_lossy(&inventory.stdout);
        let line = select_inventory_line(&stdout, selector)
            .ok_or_else(|| Error::reading(path, "no matching record"))?
            .to_string();

        // Pass 2: extract that record into the scratch file as headerless binary
        let scratch = NamedTempFile::new()
            .map_err(|e| Error::io("failed to create scratch file for wgrib", e))?;

        debug!(file = %path.display(), tool = %self.wgrib_bin, "extracting grib1 record");
        let mut child = Command::new(&self.wgrib_bin)
            .arg(path)
            .args(["-i", "-bin", "-nh", "-o"])
            .arg(scratch.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::reading(path, format!("tool failure: {}", e)))?;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(line.as_bytes())
                .and_then(|_| stdin.write_all(b"\n"))
                .map_err(|e| Error::reading(path, format!("tool failure: {}", e)))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|e| Error::reading(path, format!("tool failure: {}", e)))?;
        if !output.status.success() {
            return Err(Error::reading(
                path,
                format!(
                    "tool failure: {} exited with {}: {}",
                    self.wgrib_bin,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        read_scratch_record(path, scratch.path(), point_count)
    }
}

impl GribDecoder for WgribDecoder {
    fn decode(
        &self,
        path: &Path,
        edition: GribEdition,
        selector: &GribSelector,
        point_count: usize,
    ) -> Result<Vec<f32>> {
        if !path.is_file() {
            return Err(Error::reading(path, "open failed: no such file"));
        }
        match edition {
            GribEdition::Grib1 => self.decode_grib1(path, selector, point_count),
            GribEdition::Grib2 => self.decode_grib2(path, selector, point_count),
        }
    }
}

/// Pick the first inventory line matching variable, level and optional
/// fhr filter. Variable matches on the `:VAR:` field; level and fhr match
/// as substrings of the record description.
pub(crate) fn select_inventory_line<'a>(
    inventory: &'a str,
    selector: &GribSelector,
) -> Option<&'a str> {
    let var_field = format!(":{}:", selector.variable);
    inventory.lines().find(|line| {
        line.contains(&var_field)
            && line.contains(selector.level.as_str())
            && match &selector.grep_fhr {
                Some(fhr) => line.contains(fhr.as_str()),
                None => true,
            }
    })
}

/// Read the extracted record back from the scratch file.
///
/// An empty or short scratch file means the match selected nothing.
fn read_scratch_record(source: &Path, scratch: &Path, point_count: usize) -> Result<Vec<f32>> {
    let bytes = std::fs::read(scratch)
        .map_err(|e| Error::reading(source, format!("tool failure: {}", e)))?;
    let bytes_needed = point_count * BYTES_PER_VALUE;
    if bytes.len() < bytes_needed {
        return Err(Error::reading(source, "no matching record"));
    }
    // Duplicate matches append extra records; keep the first
    Ok(decode_le_f32(&bytes[..bytes_needed]))
}
