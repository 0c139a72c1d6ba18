use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::{CoverageProvider, FileCoverage};
use crate::core::UncoveredRange;

/// Output of `flow coverage --json <file>`.
#[derive(Debug, Deserialize)]
struct CoverageInfo {
    expressions: Expressions,
}

#[derive(Debug, Deserialize)]
struct Expressions {
    uncovered_count: usize,
    #[serde(default)]
    uncovered_locs: Vec<UncoveredRange>,
}

/// Parse the JSON printed by `flow coverage --json`.
pub fn parse_coverage_output(stdout: &str) -> Result<FileCoverage> {
    let info: CoverageInfo =
        serde_json::from_str(stdout).context("Failed to parse flow coverage output")?;
    Ok(FileCoverage {
        uncovered_count: info.expressions.uncovered_count,
        uncovered_ranges: info.expressions.uncovered_locs,
    })
}

/// Coverage provider backed by the `flow` binary.
#[derive(Debug, Clone)]
pub struct FlowCoverage {
    flow_bin: PathBuf,
}

impl FlowCoverage {
    pub fn new(flow_bin: impl Into<PathBuf>) -> Self {
        Self {
            flow_bin: flow_bin.into(),
        }
    }
}

impl CoverageProvider for FlowCoverage {
    fn coverage(&self, path: &Path) -> Result<FileCoverage> {
        let output = Command::new(&self.flow_bin)
            .arg("coverage")
            .arg("--json")
            .arg(path)
            .output()
            .with_context(|| format!("Failed to run flow binary: {}", self.flow_bin.display()))?;

        if !output.status.success() {
            bail!(
                "flow coverage failed for {} ({}): {}",
                path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_coverage_output(&stdout)
            .with_context(|| format!("Invalid coverage data for {}", path.display()))
    }
}
