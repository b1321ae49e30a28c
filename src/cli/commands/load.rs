//! Load command implementation
//!
//! Assembles a dataset from templated files, prints a colored QC summary
//! and optionally writes the aggregate back out as flat binary.

use super::shared::{load_spinner, print_load_summary, setup_logging};
use crate::app::models::{AxisSpec, DataKind, DataPayload, Dataset, Interval};
use crate::app::services::dataset_assembler::DatasetAssembler;
use crate::app::services::grid_reader::flat_binary;
use crate::cli::args::{DataKindArg, LoadArgs};
use crate::config::LoaderConfig;
use crate::{Error, GeoGrid, Result};
use colored::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Load command runner
pub fn run_load(args: LoadArgs) -> Result<()> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;

    info!(kind = DataKind::from(args.kind).as_str(), "Starting dataset load");
    debug!("Load arguments: {:?}", args);

    args.validate()?;

    let grid = GeoGrid::from_name(&args.grid)?;
    let config = build_loader_config(&args);
    let assembler = DatasetAssembler::new(config, grid);

    let spinner = load_spinner(args.show_progress(), "Loading dataset...");
    let dataset = assemble(&assembler, &args)?;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    print_load_summary(&dataset, start_time.elapsed());

    if let Some(output) = &args.output {
        write_flat_binary(output, &dataset)?;
        println!(
            "  {} {}",
            "Wrote:".bright_cyan(),
            output.display().to_string().bright_white().bold()
        );
    }

    Ok(())
}

/// Translate CLI arguments into a loader configuration
fn build_loader_config(args: &LoadArgs) -> LoaderConfig {
    let mut config = LoaderConfig::new(&args.template, args.format.into())
        .with_fhr_stat(args.fhr_stat.into());
    if args.yrev {
        config = config.with_yrev();
    }
    if let (Some(var), Some(level)) = (&args.grib_var, &args.grib_level) {
        config = config.with_grib_selector(var, level);
    }
    if args.remove_dup_grib_fhrs {
        config = config.with_remove_dup_grib_fhrs();
    }
    config
}

/// Build the axes named by the arguments and run the matching load
fn assemble(assembler: &DatasetAssembler, args: &LoadArgs) -> Result<Dataset> {
    match args.kind {
        DataKindArg::Obs => {
            let dates = date_axis(args)?;
            assembler.load_obs(&dates)
        }
        DataKindArg::DtrmFcst => {
            let dates = date_axis(args)?;
            let fhrs = int_axis(args.fhrs.as_ref().map(|l| l.values.as_slice()), "--fhrs")?;
            assembler.load_dtrm_fcsts(&dates, &fhrs)
        }
        DataKindArg::EnsFcst => {
            let dates = date_axis(args)?;
            let fhrs = int_axis(args.fhrs.as_ref().map(|l| l.values.as_slice()), "--fhrs")?;
            let members =
                int_axis(args.members.as_ref().map(|l| l.values.as_slice()), "--members")?;
            assembler.load_ens_fcsts(&dates, &fhrs, &members)
        }
        DataKindArg::Climo => {
            let days = args
                .days
                .as_ref()
                .ok_or_else(|| Error::configuration("climatology loads require --days"))?;
            let days = AxisSpec::from_strings(days.values.clone())?;
            let ptiles = args.ptiles.as_ref().map(|l| l.values.as_slice());
            assembler.load_climo(&days, ptiles)
        }
    }
}

fn date_axis(args: &LoadArgs) -> Result<AxisSpec> {
    if let Some(dates) = &args.dates {
        return AxisSpec::from_strings(dates.values.clone());
    }
    match (&args.start_date, &args.end_date) {
        (Some(start), Some(end)) => AxisSpec::date_range(start, end, Interval::Days),
        _ => Err(Error::configuration(
            "load requires --dates or --start-date/--end-date",
        )),
    }
}

fn int_axis(values: Option<&[i64]>, flag: &str) -> Result<AxisSpec> {
    let values = values
        .ok_or_else(|| Error::configuration(format!("missing required {} list", flag)))?;
    AxisSpec::from_numbers(values)
}

/// Write the dataset's primary array as little-endian flat binary, in
/// logical (record-major) order
fn write_flat_binary(path: &Path, dataset: &Dataset) -> Result<()> {
    let values: Vec<f32> = match &dataset.payload {
        DataPayload::Observation { obs } => obs.iter().copied().collect(),
        DataPayload::DeterministicForecast { fcst } => fcst.iter().copied().collect(),
        DataPayload::EnsembleForecast(data) => data.ens.iter().copied().collect(),
        DataPayload::Climatology(data) => data.climo.iter().copied().collect(),
    };
    std::fs::write(path, flat_binary::encode_le_f32(&values))
        .map_err(|e| Error::io(format!("failed to write {}", path.display()), e))?;
    info!(path = %path.display(), values = values.len(), "wrote flat binary output");
    Ok(())
}
