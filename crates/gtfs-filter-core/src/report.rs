//! Transcode run reporting and progress callbacks.

use std::time::Duration;

/// Report of one archive transcode run.
///
/// Contains statistics and per-file warnings accumulated while filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    /// Number of files filtered and written to the output archive.
    pub files_written: usize,

    /// Number of files skipped because their base name is blacklisted.
    pub files_skipped: usize,

    /// Number of files that failed to transcode and are missing from the
    /// output archive.
    pub files_failed: usize,

    /// Total data rows written across all files (headers excluded).
    pub rows_written: usize,

    /// Total bytes written into the output archive (uncompressed).
    pub bytes_written: u64,

    /// Duration of the whole run.
    pub duration: Duration,

    /// Warnings generated during the run (skipped and failed files).
    pub warnings: Vec<String>,
}

impl FilterReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns whether every input file made it into the output archive.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.files_failed == 0
    }
}

/// Callback trait for per-file progress reporting during a transcode run.
///
/// The trait requires `Send` to allow use in multi-threaded contexts.
pub trait ProgressCallback: Send {
    /// Called when a file starts processing.
    ///
    /// `total` is the number of entries in the input archive and
    /// `current` the 1-indexed position of this one.
    fn on_file_start(&mut self, name: &str, total: usize, current: usize);

    /// Called when a file has been staged (or skipped/failed).
    fn on_file_complete(&mut self, name: &str);

    /// Called once when the output archive has been finalized.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
///
/// Use this when progress reporting is not needed but the API requires a
/// callback implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_file_start(&mut self, _name: &str, _total: usize, _current: usize) {}

    fn on_file_complete(&mut self, _name: &str) {}

    fn on_complete(&mut self) {}
}
