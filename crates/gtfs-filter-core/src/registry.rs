//! Per-file handler registry and blacklist.
//!
//! Maps a file's base name to an enumerated handler kind; unregistered
//! names fall back to pass-through. A separate blacklist gate drops files
//! from the output entirely, before handler resolution. Both tables are
//! immutable after construction and passed explicitly into the transcoder.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::pipe::PipeConfig;

/// Feed-metadata file carrying revision-tracking columns.
pub const FEED_INFO: &str = "feed_info.txt";

/// Columns stripped from `feed_info.txt` before redistribution.
pub const FEED_INFO_EXCLUDED_COLUMNS: [&str; 2] = ["conv_rev", "plan_rev"];

/// Enumerated per-file transformation kinds.
///
/// Adding a variant (and its registry binding) is the whole extension
/// surface; the row pipe and the transcoder never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Re-serialize the file unchanged (no column exclusions).
    PassThrough,
    /// Strip the revision-tracking columns from feed metadata.
    FeedInfo,
}

impl HandlerKind {
    /// The pipe configuration this handler applies.
    #[must_use]
    pub fn pipe_config(self) -> PipeConfig {
        match self {
            Self::PassThrough => PipeConfig::pass_through(),
            Self::FeedInfo => PipeConfig::excluding(FEED_INFO_EXCLUDED_COLUMNS),
        }
    }
}

/// Immutable file-name to handler mapping plus skip blacklist.
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    handlers: HashMap<String, HandlerKind>,
    blacklist: HashSet<String>,
}

impl FilterRegistry {
    /// Creates an empty registry: nothing blacklisted, everything
    /// pass-through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default GTFS table: `feed_info.txt` loses its revision
    /// columns, and any file whose base name is exactly `logging` is
    /// dropped from the output.
    #[must_use]
    pub fn gtfs() -> Self {
        Self::new()
            .with_handler(FEED_INFO, HandlerKind::FeedInfo)
            .with_blacklisted("logging")
    }

    /// Binds `base_name` to a handler kind.
    #[must_use]
    pub fn with_handler(mut self, base_name: impl Into<String>, kind: HandlerKind) -> Self {
        self.handlers.insert(base_name.into(), kind);
        self
    }

    /// Adds `base_name` to the skip blacklist. Matching is literal
    /// string equality on the final path component, extension included.
    #[must_use]
    pub fn with_blacklisted(mut self, base_name: impl Into<String>) -> Self {
        self.blacklist.insert(base_name.into());
        self
    }

    /// Resolves the handler for a base file name. Total: unregistered
    /// names get [`HandlerKind::PassThrough`].
    #[must_use]
    pub fn resolve(&self, base_name: &str) -> HandlerKind {
        self.handlers
            .get(base_name)
            .copied()
            .unwrap_or(HandlerKind::PassThrough)
    }

    /// Returns whether a base file name is dropped from the output.
    #[must_use]
    pub fn is_blacklisted(&self, base_name: &str) -> bool {
        self.blacklist.contains(base_name)
    }
}
