//! Tabular row pipe: header-first CSV filtering.
//!
//! Reads a delimited file header-first, drops the configured columns from
//! the header and every data row, optionally trims cell values, and
//! re-emits the rows in order. The output line separator is always `\n`
//! regardless of platform.

use std::collections::BTreeSet;
use std::io::Read;
use std::io::Write;

use csv::ReaderBuilder;
use csv::StringRecord;
use csv::Terminator;
use csv::Trim;
use csv::WriterBuilder;

use crate::FilterError;
use crate::Result;

/// Configuration for a single run of the row pipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipeConfig {
    /// Column names to drop from the header and every row. Names absent
    /// from the header are silently ignored.
    pub excluded_columns: BTreeSet<String>,

    /// Trim leading/trailing whitespace from headers and cell values.
    pub trim_values: bool,
}

impl PipeConfig {
    /// A pass-through configuration: no exclusions, values trimmed.
    #[must_use]
    pub fn pass_through() -> Self {
        Self {
            excluded_columns: BTreeSet::new(),
            trim_values: true,
        }
    }

    /// A trimming configuration that excludes the given columns.
    pub fn excluding<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_columns: columns.into_iter().map(Into::into).collect(),
            trim_values: true,
        }
    }
}

/// Statistics from one row-pipe run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowStats {
    /// Number of data rows written (header excluded).
    pub rows_written: usize,

    /// Number of header columns dropped by exclusion.
    pub columns_dropped: usize,
}

/// Copies CSV content from `input` to `output`, dropping excluded columns.
///
/// The header row is read first; columns named in
/// [`PipeConfig::excluded_columns`] are removed from it and from every
/// subsequent row, with the remaining columns kept in original order. Row
/// order is preserved. Fully-empty input produces empty output; header-only
/// input produces header-only output; exclusion of every column produces
/// empty output.
///
/// `name` is the file's display name, used in error context only.
///
/// # Errors
///
/// Returns [`FilterError::MalformedRecord`] if a row cannot be parsed as
/// well-formed CSV (the whole pipe fails for this file), or
/// [`FilterError::Io`] on a read/write failure.
pub fn filter_csv<R: Read, W: Write>(
    name: &str,
    input: R,
    output: W,
    config: &PipeConfig,
) -> Result<RowStats> {
    let trim = if config.trim_values {
        Trim::All
    } else {
        Trim::None
    };

    let mut reader = ReaderBuilder::new().trim(trim).from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| map_csv_error(name, e))?
        .clone();

    // Empty input: no header row at all, emit nothing.
    if headers.is_empty() {
        return Ok(RowStats::default());
    }

    let kept: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !config.excluded_columns.contains(*h))
        .map(|(i, _)| i)
        .collect();
    let columns_dropped = headers.len() - kept.len();

    // Every column excluded leaves nothing to serialize.
    if kept.is_empty() {
        return Ok(RowStats {
            rows_written: 0,
            columns_dropped,
        });
    }

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(output);

    writer
        .write_record(kept.iter().map(|&i| &headers[i]))
        .map_err(|e| map_csv_error(name, e))?;

    let mut record = StringRecord::new();
    let mut rows_written = 0;
    while reader
        .read_record(&mut record)
        .map_err(|e| map_csv_error(name, e))?
    {
        writer
            .write_record(kept.iter().map(|&i| record.get(i).unwrap_or("")))
            .map_err(|e| map_csv_error(name, e))?;
        rows_written += 1;
    }

    writer.flush()?;

    Ok(RowStats {
        rows_written,
        columns_dropped,
    })
}

/// Splits `csv::Error` into its I/O and parse halves.
fn map_csv_error(name: &str, err: csv::Error) -> FilterError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => FilterError::Io(io),
            _ => FilterError::Io(std::io::Error::other("CSV I/O error")),
        }
    } else {
        FilterError::MalformedRecord {
            file: name.to_string(),
            source: err,
        }
    }
}
