//! Progress bar implementation for the filtering run.

use console::Term;
use gtfs_filter_core::ProgressCallback;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;

/// CLI progress bar wrapper implementing `ProgressCallback`.
///
/// Displays a per-file progress bar when running in a TTY. The bar length
/// is set from the first callback, once the archive entry count is known.
/// Automatically cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Creates a new CLI progress bar with the given message.
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new(0);

        // Template: "Filtering [████████░░░░] 4/12 files (stops.txt)"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix} [{bar:40.cyan/blue}] {pos}/{len} files ({msg})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.set_prefix(message.to_string());

        Self { bar }
    }

    /// Checks if we should show progress (TTY, not quiet, not JSON).
    #[must_use]
    pub fn should_show(quiet: bool, json: bool) -> bool {
        !quiet && !json && Term::stdout().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_file_start(&mut self, name: &str, total: usize, _current: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message(name.to_string());
    }

    fn on_file_complete(&mut self, _name: &str) {
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}
