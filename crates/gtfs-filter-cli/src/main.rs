//! gtfs-filter - Command-line tool for sanitizing zipped GTFS feeds.
//!
//! Unzips a feed, drops blacklisted files, strips revision-tracking
//! columns from `feed_info.txt`, and re-packages the rest.

mod cli;
mod error;
mod output;
mod progress;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use gtfs_filter_core::FilterRegistry;
use gtfs_filter_core::FilterReport;
use gtfs_filter_core::NoopProgress;
use gtfs_filter_core::transcode_with_progress;

use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;

/// Exit code when the run completed but some files failed to transcode.
const EXIT_INCOMPLETE: u8 = 2;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_INCOMPLETE),
        Err(error) => {
            formatter.format_error(&error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli, formatter: &dyn OutputFormatter) -> Result<FilterReport> {
    let registry = FilterRegistry::gtfs();

    // Use a progress bar only on a TTY, and never under --quiet/--json.
    let report = if CliProgress::should_show(cli.quiet, cli.json) {
        let mut progress = CliProgress::new("Filtering");
        add_archive_context(
            transcode_with_progress(&cli.input, &cli.output, &registry, &mut progress),
            &cli.input,
        )?
    } else {
        let mut noop = NoopProgress;
        add_archive_context(
            transcode_with_progress(&cli.input, &cli.output, &registry, &mut noop),
            &cli.input,
        )?
    };

    for warning in &report.warnings {
        formatter.format_warning(warning);
    }
    formatter.format_filter_result(&cli.output, &report)?;

    Ok(report)
}
