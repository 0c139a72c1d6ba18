//! Per-file pipeline and the parallel multi-file driver.
//!
//! For each file: eligibility filter -> coverage provider -> scanner -> reconciler.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;

use crate::core::{Eligibility, Warning, reconcile, scan};
use crate::providers::CoverageProvider;

/// Outcome of looking at one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Scanned and reconciled.
    Checked,
    /// Has a `/* flow-uncovered-file */` line.
    OptedOut,
    /// Has no `@flow` marker.
    NotFlowChecked,
    /// Flow reports no uncovered expressions; pragmas are not checked.
    FullyCovered,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Checked => write!(f, "checked"),
            FileStatus::OptedOut => write!(f, "opted out"),
            FileStatus::NotFlowChecked => write!(f, "not flow-checked"),
            FileStatus::FullyCovered => write!(f, "fully covered"),
        }
    }
}

/// Result for a single file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,
    pub warnings: Vec<Warning>,
    /// Source text, kept for displaying context lines.
    pub source: String,
}

impl FileReport {
    fn skipped(path: &str, status: FileStatus, source: String) -> Self {
        Self {
            path: path.to_string(),
            status,
            warnings: Vec::new(),
            source,
        }
    }

    /// The text of a 1-based line, if present.
    pub fn source_line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|idx| self.source.split('\n').nth(idx))
    }
}

/// Result of checking a set of files.
#[derive(Debug, Default)]
pub struct CheckResult {
    /// One report per input file, in input order.
    pub files: Vec<FileReport>,
}

impl CheckResult {
    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.warnings.len()).sum()
    }

    pub fn checked_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Checked)
            .count()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.files.iter().flat_map(|f| f.warnings.iter())
    }
}

/// Check one file's source text.
///
/// # Errors
/// Fails if the coverage provider fails or the file has an unmatched end pragma.
pub fn check_source(
    provider: &dyn CoverageProvider,
    path: &Path,
    source: String,
) -> Result<FileReport> {
    let display = path.to_string_lossy().to_string();

    let skip_status = match Eligibility::of(&source) {
        Eligibility::OptedOut => Some(FileStatus::OptedOut),
        Eligibility::NotFlowChecked => Some(FileStatus::NotFlowChecked),
        Eligibility::Eligible => None,
    };
    if let Some(status) = skip_status {
        return Ok(FileReport::skipped(&display, status, source));
    }

    let coverage = provider.coverage(path)?;
    if coverage.uncovered_count == 0 {
        return Ok(FileReport::skipped(
            &display,
            FileStatus::FullyCovered,
            source,
        ));
    }

    let model = scan(&display, &source)?;
    let warnings = reconcile(&display, &model, &coverage.uncovered_ranges);

    Ok(FileReport {
        path: display,
        status: FileStatus::Checked,
        warnings,
        source,
    })
}

/// Read and check one file.
pub fn check_file(provider: &dyn CoverageProvider, path: &Path) -> Result<FileReport> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    check_source(provider, path, source)
}

/// Check files in parallel. The first fatal error aborts the whole run.
pub fn check_files<P: AsRef<Path> + Sync>(
    provider: &dyn CoverageProvider,
    files: &[P],
    verbose: bool,
) -> Result<CheckResult> {
    let reports = files
        .par_iter()
        .map(|path| check_file(provider, path.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    if verbose {
        for report in reports.iter().filter(|r| r.status != FileStatus::Checked) {
            eprintln!("{} {} ({})", "skipped:".dimmed(), report.path, report.status);
        }
    }

    Ok(CheckResult { files: reports })
}
