//! Engine-level matching options.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default cap on file records per side before file matching is skipped.
pub const DEFAULT_MAX_FILES: usize = 2000;

/// How version strings carrying range operators are compared.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum VersionRangeMode {
    /// Range operators go through the generic component comparison.
    #[default]
    Legacy,
    /// A concrete version against a semver requirement scores by satisfaction.
    Semver,
}

/// Options threaded through the record-set matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingOptions {
    /// Skip file matching when either side has more file records than this.
    pub max_files: usize,
    /// Version range handling.
    pub version_ranges: VersionRangeMode,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            version_ranges: VersionRangeMode::Legacy,
        }
    }
}

impl MatchingOptions {
    /// Override the file cap.
    #[must_use]
    pub const fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Override version range handling.
    #[must_use]
    pub const fn with_version_ranges(mut self, mode: VersionRangeMode) -> Self {
        self.version_ranges = mode;
        self
    }
}
