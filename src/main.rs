use clap::Parser;
use geofiles_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => {
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Geofiles Processor - Gridded Dataset Assembly and Conversion");
    println!("============================================================");
    println!();
    println!("Assemble gridded meteorological datasets from templated binary or GRIB");
    println!("files, and convert binary POE data into delimited text reports.");
    println!();
    println!("USAGE:");
    println!("    geofiles-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    load        Assemble a dataset and report its QC summary");
    println!("    convert     Convert a binary POE file into a text report");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Load observations for a date range:");
    println!("    geofiles-processor load --kind obs --template '/data/obs_{{yyyy}}{{mm}}{{dd}}.bin' \\");
    println!("                            --start-date 20160501 --end-date 20160531");
    println!();
    println!("    # Load an ensemble forecast from GRIB2 files:");
    println!("    geofiles-processor load --kind ens-fcst --format grib2 \\");
    println!("                            --template '/data/gefs_{{yyyy}}{{mm}}{{dd}}_{{cc}}z_f{{fhr}}_m{{member}}.grb2' \\");
    println!("                            --dates 2016051500 --fhrs 6,12,18,24 --members 0,1,2,3 \\");
    println!("                            --grib-var TMP --grib-level '2 m above ground'");
    println!();
    println!("    # Convert a POE file to tercile probabilities:");
    println!("    geofiles-processor convert --poe-file poe.bin --ptiles 1,5,33,67,95,99 \\");
    println!("                               --thresholds 33,67 --terciles -o terciles.txt");
    println!();
    println!("For detailed help on any command, use:");
    println!("    geofiles-processor <COMMAND> --help");
}
