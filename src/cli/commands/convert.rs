//! Convert command implementation
//!
//! Reads a record-major binary POE file, optionally a climatology curve,
//! and writes a delimited text report through threshold interpolation.

use super::shared::setup_logging;
use crate::app::services::conversion;
use crate::app::services::grid_reader::flat_binary;
use crate::app::services::threshold_interp::ThresholdInterpolator;
use crate::cli::args::ConvertArgs;
use crate::config::ConversionConfig;
use crate::{GeoGrid, Result};
use colored::*;
use ndarray::{Array1, Array2};
use std::path::Path;
use tracing::{debug, info};

/// Convert command runner
pub fn run_convert(args: ConvertArgs) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting POE conversion");
    debug!("Convert arguments: {:?}", args);

    args.validate()?;

    let grid = GeoGrid::from_name(&args.grid)?;
    let ptiles = &args.ptiles.values;

    let poe = read_record_block(&args.poe_file, ptiles.len(), grid.point_count())?;
    info!(
        file = %args.poe_file.display(),
        ptiles = ptiles.len(),
        points = grid.point_count(),
        "read POE block"
    );

    let climo = match &args.climo_file {
        Some(path) => {
            let block = read_record_block(path, ptiles.len(), grid.point_count())?;
            Some(ThresholdInterpolator::new(ptiles.clone(), block)?)
        }
        None => None,
    };

    let mut config = ConversionConfig::new(args.threshold_type.into(), args.thresholds.values.clone())
        .with_precision(args.precision)
        .with_delimiter(args.delimiter);
    if args.terciles {
        config = config.with_terciles();
    }
    if let Some(sentinel) = &args.missing_sentinel {
        config = config.with_missing_sentinel(sentinel.clone());
    }

    conversion::poe_to_report(&args.output, poe.view(), ptiles, climo.as_ref(), None, &config)?;

    if !args.quiet {
        println!(
            "{} {}",
            "Report written:".bright_green().bold(),
            args.output.display().to_string().bright_white().bold()
        );
    }
    Ok(())
}

/// Read `record_count` consecutive records of a flat binary file into a
/// `[record, point]` array
fn read_record_block(path: &Path, record_count: usize, point_count: usize) -> Result<Array2<f32>> {
    let mut block = Array2::zeros((record_count, point_count));
    for record in 0..record_count {
        let values = flat_binary::read_record(path, Some(record), point_count)?;
        block.row_mut(record).assign(&Array1::from(values));
    }
    Ok(block)
}
