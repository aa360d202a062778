//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use gtfs_filter_core::FilterReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_filter_result(&self, output_path: &Path, report: &FilterReport) -> Result<()> {
        #[derive(Serialize)]
        struct FilterOutput {
            output_path: String,
            files_written: usize,
            files_skipped: usize,
            files_failed: usize,
            rows_written: usize,
            bytes_written: u64,
            duration_ms: u128,
            warnings: Vec<String>,
        }

        let data = FilterOutput {
            output_path: output_path.display().to_string(),
            files_written: report.files_written,
            files_skipped: report.files_skipped,
            files_failed: report.files_failed,
            rows_written: report.rows_written,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        };

        let output = JsonOutput::success("filter", data);
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("filter", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, _message: &str) {
        // Warnings are carried inside the result envelope.
    }
}
