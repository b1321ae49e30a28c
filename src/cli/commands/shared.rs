//! Shared components for CLI commands
//!
//! Logging setup, progress display and the colored QC summary used by
//! both subcommands.

use crate::app::models::Dataset;
use crate::Result;
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;

/// Set up structured logging for a command
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("geofiles_processor={}", log_level)));

    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Create a progress spinner for a long-running load, if progress output
/// is enabled
pub fn load_spinner(show_progress: bool, message: &str) -> Option<ProgressBar> {
    if !show_progress {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Print the colored QC summary for an assembled dataset
pub fn print_load_summary(dataset: &Dataset, elapsed: Duration) {
    let audit = &dataset.audit;

    println!("\n{}", "Load Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Kind:".bright_cyan(),
        dataset.kind.as_str().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Dates requested:".bright_cyan(),
        audit.dates_loaded.len().to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(elapsed).to_string().bright_white()
    );

    if audit.is_complete() {
        println!("  {}", "All files present".bright_green());
        return;
    }

    println!(
        "  {} {}",
        "Dates with missing files:".bright_cyan(),
        audit
            .missing_date_count()
            .to_string()
            .bright_red()
            .bold()
    );
    println!(
        "  {} {}",
        "Missing files:".bright_cyan(),
        audit.missing_files.len().to_string().bright_red().bold()
    );
    for file in audit.missing_files.iter().take(10) {
        println!("    {}", file.display().to_string().bright_red());
    }
    if audit.missing_files.len() > 10 {
        println!(
            "    {} more ...",
            (audit.missing_files.len() - 10).to_string().bright_red()
        );
    }
}
