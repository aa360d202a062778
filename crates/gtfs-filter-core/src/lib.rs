//! Column-filtering transcoder for zipped GTFS transit feeds.
//!
//! `gtfs-filter-core` re-packages a zipped GTFS bundle, dropping
//! blacklisted files and stripping configured columns from tabular files
//! on the way through. Used by feed publishers to sanitize internal
//! artifacts out of a feed before redistribution.
//!
//! # Examples
//!
//! ```no_run
//! use gtfs_filter_core::FilterRegistry;
//! use gtfs_filter_core::transcode;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = FilterRegistry::gtfs();
//! let report = transcode("gtfs.zip", "gtfs-out.zip", &registry)?;
//! println!("Filtered {} files", report.files_written);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod pipe;
pub mod registry;
pub mod report;
pub mod test_utils;
pub mod transcode;

// Re-export main API types
pub use error::FilterError;
pub use error::Result;
pub use pipe::PipeConfig;
pub use pipe::RowStats;
pub use registry::FilterRegistry;
pub use registry::HandlerKind;
pub use report::FilterReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use transcode::transcode;
pub use transcode::transcode_with_progress;
