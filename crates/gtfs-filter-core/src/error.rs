//! Error types for feed filtering operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `FilterError`.
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors that can occur while filtering a feed archive.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Input path is missing or not a valid zip archive. Fatal.
    #[error("cannot open archive {path}: {reason}")]
    ArchiveOpen {
        /// The input archive path.
        path: PathBuf,
        /// Why the archive could not be opened.
        reason: String,
    },

    /// Output path already refers to an existing file. Fatal; the
    /// existing file is left untouched.
    #[error("output file already exists: {path}")]
    OutputExists {
        /// The output archive path.
        path: PathBuf,
    },

    /// A tabular file's content cannot be parsed as well-formed CSV.
    /// Per-file: the transcoder records it and continues with the next
    /// entry.
    #[error("malformed record in {file}: {source}")]
    MalformedRecord {
        /// Base name of the offending file.
        file: String,
        /// The underlying CSV parse error.
        source: csv::Error,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// Returns whether this error aborts the whole run rather than a
    /// single file.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ArchiveOpen { .. } | Self::OutputExists { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let err = FilterError::ArchiveOpen {
            path: PathBuf::from("missing.zip"),
            reason: "no such file".to_string(),
        };
        assert!(err.is_fatal());

        let err = FilterError::OutputExists {
            path: PathBuf::from("out.zip"),
        };
        assert!(err.is_fatal());

        let err = FilterError::Io(std::io::Error::other("disk full"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_display_includes_path() {
        let err = FilterError::OutputExists {
            path: PathBuf::from("feed-out.zip"),
        };
        assert!(err.to_string().contains("feed-out.zip"));
    }
}
