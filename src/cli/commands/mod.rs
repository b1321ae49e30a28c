//! Command implementations for the geofiles processor CLI
//!
//! Each subcommand is implemented in its own module; `shared` holds the
//! logging setup, progress display and summary helpers used by both.

pub mod convert;
pub mod load;
pub mod shared;

use crate::cli::args::{Args, Commands};
use crate::Result;

/// Main command runner for the geofiles processor
///
/// Dispatches to the appropriate subcommand handler based on CLI args:
/// - `load`: dataset assembly with a QC summary
/// - `convert`: binary POE to delimited text report
pub fn run(args: Args) -> Result<()> {
    match args.get_command() {
        Commands::Load(load_args) => load::run_load(load_args),
        Commands::Convert(convert_args) => convert::run_convert(convert_args),
    }
}
