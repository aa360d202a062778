//! Archive transcoder: unzip, per-file filter, rezip.
//!
//! Extracts every regular file from the input zip, dispatches each to the
//! registry-resolved handler, collects filtered copies in a scoped staging
//! directory, and re-archives the staged files into a freshly created
//! output zip. Per-file failures are recorded and skipped; only archive
//! open and output creation are fatal.

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::FilterError;
use crate::FilterReport;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::pipe::filter_csv;
use crate::registry::FilterRegistry;

/// Transcodes `input` into `output`, filtering each file through the
/// registry.
///
/// See [`transcode_with_progress`] for the full contract.
///
/// # Errors
///
/// Returns [`FilterError::ArchiveOpen`] if `input` is not a readable zip
/// archive, [`FilterError::OutputExists`] if `output` already exists, or
/// [`FilterError::Io`] on a filesystem failure outside per-file handling.
pub fn transcode<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    registry: &FilterRegistry,
) -> Result<FilterReport> {
    let mut noop = NoopProgress;
    transcode_with_progress(input, output, registry, &mut noop)
}

/// Transcodes `input` into `output` with per-file progress reporting.
///
/// Directory entries are skipped silently. Blacklisted base names are
/// skipped with a warning and produce no output entry. A file that fails
/// to parse or copy is recorded in the report and the run continues; the
/// file is absent from the output archive. A file whose columns are all
/// excluded still appears in the output, as an empty entry. The staging
/// directory is removed on every return path, and a fatal error after
/// output creation removes the partial output file.
///
/// Output archive entries are the staged files in sorted walk order, so
/// identical inputs produce identically ordered archives.
///
/// # Errors
///
/// Same fatal errors as [`transcode`]; per-file failures never surface as
/// `Err`, only in [`FilterReport::files_failed`].
pub fn transcode_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    registry: &FilterRegistry,
    progress: &mut dyn ProgressCallback,
) -> Result<FilterReport> {
    let input = input.as_ref();
    let output = output.as_ref();
    let start = Instant::now();

    let file = File::open(input).map_err(|e| FilterError::ArchiveOpen {
        path: input.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| FilterError::ArchiveOpen {
        path: input.to_path_buf(),
        reason: e.to_string(),
    })?;

    // Exclusive create: an existing output is never overwritten, and a
    // doomed run fails before any filtering work.
    let out_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(output)
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                FilterError::OutputExists {
                    path: output.to_path_buf(),
                }
            } else {
                FilterError::Io(e)
            }
        })?;

    let mut report = FilterReport::new();

    // A fatal error past the exclusive create would leave a zero-byte or
    // partial output file behind, and a rerun would then stop on
    // OutputExists; remove the file before surfacing the error.
    if let Err(e) = stage_and_archive(&mut archive, out_file, registry, &mut report, progress) {
        let _ = fs::remove_file(output);
        return Err(e);
    }

    report.duration = start.elapsed();
    progress.on_complete();

    Ok(report)
}

/// Stages every entry and archives the staged files into `out_file`.
fn stage_and_archive<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    out_file: File,
    registry: &FilterRegistry,
    report: &mut FilterReport,
    progress: &mut dyn ProgressCallback,
) -> Result<()> {
    // Scoped staging: the directory is deleted when `staging` drops,
    // on success and on every early error return.
    let staging = tempfile::Builder::new().prefix("gtfs-filter-").tempdir()?;

    let total = archive.len();
    for index in 0..total {
        stage_entry(
            archive,
            index,
            total,
            staging.path(),
            registry,
            report,
            progress,
        );
    }

    write_output_archive(out_file, staging.path(), report)
}

/// Filters one archive entry into the staging directory.
///
/// Never returns an error: every failure is folded into the report so the
/// remaining entries still get processed.
#[allow(clippy::too_many_arguments)]
fn stage_entry<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    index: usize,
    total: usize,
    staging: &Path,
    registry: &FilterRegistry,
    report: &mut FilterReport,
    progress: &mut dyn ProgressCallback,
) {
    let mut entry = match archive.by_index(index) {
        Ok(entry) => entry,
        Err(e) => {
            report.files_failed += 1;
            report.add_warning(format!("failed to read archive entry {index}: {e}"));
            return;
        }
    };

    if entry.is_dir() {
        return;
    }

    // Reject names that would escape the staging directory.
    let Some(relative) = entry.enclosed_name() else {
        report.files_failed += 1;
        report.add_warning(format!("unsafe entry name, not transcoded: {}", entry.name()));
        return;
    };

    let Some(base_name) = relative.file_name().and_then(|n| n.to_str()).map(String::from) else {
        report.files_failed += 1;
        report.add_warning(format!("non-UTF-8 entry name, not transcoded: {}", entry.name()));
        return;
    };

    progress.on_file_start(&base_name, total, index + 1);

    if registry.is_blacklisted(&base_name) {
        report.files_skipped += 1;
        report.add_warning(format!("skipped blacklisted file: {base_name}"));
        progress.on_file_complete(&base_name);
        return;
    }

    let config = registry.resolve(&base_name).pipe_config();
    let dest = staging.join(&relative);

    match filter_to_staging(&base_name, &mut entry, &dest, &config) {
        Ok(rows) => {
            report.rows_written += rows;
        }
        Err(e) => {
            // Drop the partial staging file so the output archive holds
            // only fully transcoded entries.
            let _ = fs::remove_file(&dest);
            report.files_failed += 1;
            report.add_warning(format!("failed to transcode {base_name}: {e}"));
        }
    }

    progress.on_file_complete(&base_name);
}

/// Runs the row pipe from an archive entry into a staging file.
fn filter_to_staging(
    base_name: &str,
    entry: &mut impl Read,
    dest: &Path,
    config: &crate::pipe::PipeConfig,
) -> Result<usize> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let out = BufWriter::new(File::create(dest)?);
    let stats = filter_csv(base_name, BufReader::new(entry), out, config)?;
    Ok(stats.rows_written)
}

/// Archives every staged file into the output zip, in sorted walk order.
fn write_output_archive(
    out_file: File,
    staging: &Path,
    report: &mut FilterReport,
) -> Result<()> {
    let mut zip = ZipWriter::new(out_file);
    let options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let walker = walkdir::WalkDir::new(staging).sort_by_file_name();
    let mut buffer = vec![0u8; 64 * 1024];

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(staging)
            .map_err(|e| std::io::Error::other(format!("staging path escape: {e}")))?;
        let name = zip_entry_name(relative)?;

        zip.start_file(name.as_str(), options)
            .map_err(|e| std::io::Error::other(format!("failed to start zip entry: {e}")))?;

        let mut file = File::open(entry.path())?;
        loop {
            let n = file.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            zip.write_all(&buffer[..n])?;
            report.bytes_written += n as u64;
        }
        report.files_written += 1;
    }

    zip.finish()
        .map_err(|e| std::io::Error::other(format!("failed to finish zip archive: {e}")))?;

    Ok(())
}

/// Converts a staging-relative path to a zip entry name.
///
/// Zip entries use forward slashes regardless of platform.
fn zip_entry_name(path: &Path) -> Result<String> {
    let name = path.to_str().ok_or_else(|| {
        FilterError::Io(std::io::Error::other(format!(
            "staging path is not valid UTF-8: {}",
            path.display()
        )))
    })?;

    #[cfg(windows)]
    let name = name.replace('\\', "/");

    Ok(name.to_string())
}
