//! Error conversion utilities for the CLI.
//!
//! Converts gtfs-filter-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::Result;
use anyhow::anyhow;
use gtfs_filter_core::FilterError;
use std::path::Path;

/// Converts `FilterError` to a user-friendly anyhow error with context.
pub fn convert_filter_error(err: FilterError, input: &Path) -> anyhow::Error {
    match err {
        FilterError::ArchiveOpen { path, reason } => {
            anyhow!(
                "Cannot open input archive '{}': {reason}\n\
                 HINT: The input must be an existing zip-format GTFS bundle.",
                path.display()
            )
        }
        FilterError::OutputExists { path } => {
            anyhow!(
                "Output file already exists: {}\n\
                 HINT: gtfs-filter never overwrites; move the file or pick another path.",
                path.display()
            )
        }
        FilterError::Io(io_err) => {
            anyhow!("I/O error while filtering '{}': {io_err}", input.display())
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error filtering archive '{}'", input.display())),
    }
}

/// Adds context to a core result about the archive being filtered.
pub fn add_archive_context<T>(
    result: Result<T, FilterError>,
    input: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_filter_error(e, input))
}
