//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use gtfs_filter_core::FilterReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_filter_result(&self, output_path: &Path, report: &FilterReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Filtered feed written: {}",
                style("✓").green().bold(),
                output_path.display()
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Filtered feed written: {}", output_path.display()));
        }

        let _ = self
            .term
            .write_line(&format!("  Files written:  {}", report.files_written));
        if report.files_skipped > 0 {
            let _ = self
                .term
                .write_line(&format!("  Files skipped:  {}", report.files_skipped));
        }
        if report.files_failed > 0 {
            let line = format!("  Files failed:   {}", report.files_failed);
            if self.use_colors {
                let _ = self
                    .term
                    .write_line(&format!("{}", style(line).yellow().bold()));
            } else {
                let _ = self.term.write_line(&line);
            }
        }
        let _ = self.term.write_line(&format!(
            "  Total size:     {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Rows written:   {}", report.rows_written));
            let _ = self
                .term
                .write_line(&format!("  Duration:       {:?}", report.duration));
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("warning:").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("warning: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(512), "512 B");
        assert_eq!(HumanFormatter::format_size(1024), "1.0 KB");
        assert_eq!(HumanFormatter::format_size(1024 * 1024), "1.0 MB");
        assert_eq!(HumanFormatter::format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
