//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gtfs-filter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the input GTFS zip archive
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path for the filtered output archive (must not already exist)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,
}
