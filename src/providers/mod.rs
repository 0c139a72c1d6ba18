//! External collaborators of the core: coverage data and changed files.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::UncoveredRange;

pub mod flow;
pub mod git;

pub use flow::FlowCoverage;
pub use git::GitChangedFiles;

/// Coverage summary for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCoverage {
    pub uncovered_count: usize,
    /// Uncovered ranges in the order the tool reported them.
    pub uncovered_ranges: Vec<UncoveredRange>,
}

/// Source of per-file coverage data.
pub trait CoverageProvider: Send + Sync {
    fn coverage(&self, path: &Path) -> Result<FileCoverage>;
}

/// Source of the files changed relative to a base revision.
pub trait ChangedFilesProvider {
    fn changed_files(&self, base_ref: &str) -> Result<Vec<PathBuf>>;
}
