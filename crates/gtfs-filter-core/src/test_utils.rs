//! Test utilities for building fixture archives.
//!
//! # Panics
//!
//! Functions here may panic on I/O errors since they are designed for
//! test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

/// Creates an in-memory ZIP archive from a list of `(path, content)`
/// entries. Files are stored uncompressed.
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);

    for (path, data) in entries {
        zip.start_file(path, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Writes a fixture ZIP archive to `path`.
pub fn write_test_zip(path: &Path, entries: Vec<(&str, &[u8])>) {
    std::fs::write(path, create_test_zip(entries)).unwrap();
}

/// Reads every entry of a ZIP archive on disk into `(name, content)`
/// pairs, in archive order.
#[must_use]
pub fn read_zip_entries(path: &Path) -> Vec<(String, String)> {
    use std::io::Read;

    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        entries.push((entry.name().to_string(), content));
    }
    entries
}
