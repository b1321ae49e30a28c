//! Delimited text report output.
//!
//! Serializes parallel per-location value columns to a plain-text file:
//! one header row, then one row per grid location with an identifier (or
//! positional index) followed by each column's value at fixed precision.
//! The destination is fully overwritten on each write.

use crate::constants::{DEFAULT_DELIMITER, DEFAULT_PRECISION};
use crate::{Error, Result};
use ndarray::ArrayView1;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Formatting options for one report
#[derive(Debug, Clone)]
pub struct ReportSpec {
    /// Column delimiter
    pub delimiter: char,
    /// Decimal places for values
    pub precision: usize,
    /// Written in place of NaN; NaN is written verbatim when unset
    pub missing_sentinel: Option<String>,
}

impl Default for ReportSpec {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            precision: DEFAULT_PRECISION,
            missing_sentinel: None,
        }
    }
}

impl ReportSpec {
    fn format_value(&self, value: f32) -> String {
        if value.is_nan() {
            match &self.missing_sentinel {
                Some(sentinel) => sentinel.clone(),
                None => "NaN".to_string(),
            }
        } else {
            format!("{:.*}", self.precision, value)
        }
    }
}

/// Write one text report: a header row, then one row per location.
///
/// `ids` supplies the leading identifier column; positional indices are
/// used when absent. Count mismatches between headers, columns, and ids
/// fail with a configuration error before the destination file is
/// opened, so an existing report is never truncated by a bad call.
pub fn write_report(
    path: &Path,
    ids: Option<&[String]>,
    headers: &[String],
    columns: &[ArrayView1<'_, f32>],
    spec: &ReportSpec,
) -> Result<()> {
    if headers.len() != columns.len() {
        return Err(Error::configuration(format!(
            "{} headers for {} value columns",
            headers.len(),
            columns.len()
        )));
    }
    if columns.is_empty() {
        return Err(Error::configuration("report needs at least one column"));
    }
    let nrows = columns[0].len();
    for column in columns {
        if column.len() != nrows {
            return Err(Error::configuration(format!(
                "value columns differ in length: {} vs {}",
                nrows,
                column.len()
            )));
        }
    }
    if let Some(ids) = ids {
        if ids.len() != nrows {
            return Err(Error::configuration(format!(
                "{} ids for {} locations",
                ids.len(),
                nrows
            )));
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut header_row = String::from("id");
    for header in headers {
        header_row.push(spec.delimiter);
        header_row.push_str(header);
    }
    writeln!(writer, "{}", header_row)?;

    for row in 0..nrows {
        let id = match ids {
            Some(ids) => ids[row].clone(),
            None => row.to_string(),
        };
        let mut line = id;
        for column in columns {
            line.push(spec.delimiter);
            line.push_str(&spec.format_value(column[row]));
        }
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    info!(
        path = %path.display(),
        rows = nrows,
        columns = columns.len(),
        "wrote report"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::tempdir;

    fn spec() -> ReportSpec {
        ReportSpec {
            delimiter: ' ',
            precision: 2,
            missing_sentinel: None,
        }
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let below = array![0.33f32, 0.5];
        let above = array![0.33f32, 0.2];

        write_report(
            &path,
            None,
            &["below".to_string(), "above".to_string()],
            &[below.view(), above.view()],
            &spec(),
        )
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "id below above\n0 0.33 0.33\n1 0.50 0.20\n");
    }

    #[test]
    fn test_ids_replace_positional_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let values = array![1.0f32];

        write_report(
            &path,
            Some(&["KNYC".to_string()]),
            &["rawval30".to_string()],
            &[values.view()],
            &spec(),
        )
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("KNYC 1.00\n"));
    }

    #[test]
    fn test_nan_uses_sentinel_or_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let values = array![f32::NAN];

        write_report(&path, None, &["ptile33".to_string()], &[values.view()], &spec()).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("NaN"));

        let sentinel = ReportSpec {
            missing_sentinel: Some("-999".to_string()),
            ..spec()
        };
        write_report(&path, None, &["ptile33".to_string()], &[values.view()], &sentinel).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("-999"));
    }

    #[test]
    fn test_count_mismatch_leaves_existing_file_intact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "previous contents\n").unwrap();

        let values = array![1.0f32];
        let result = write_report(
            &path,
            None,
            &["a".to_string(), "b".to_string()],
            &[values.view()],
            &spec(),
        );
        assert!(result.is_err());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "previous contents\n"
        );
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let short = array![1.0f32];
        let long = array![1.0f32, 2.0];

        let result = write_report(
            &path,
            None,
            &["a".to_string(), "b".to_string()],
            &[short.view(), long.view()],
            &spec(),
        );
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_overwrites_previous_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let values = array![1.0f32];

        for _ in 0..2 {
            write_report(&path, None, &["v".to_string()], &[values.view()], &spec()).unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
