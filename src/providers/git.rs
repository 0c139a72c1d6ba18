use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Result, bail};

use super::ChangedFilesProvider;

/// Changed-files provider that asks `git diff` about the repository
/// containing `root`. `root` may be any directory inside the work tree.
#[derive(Debug, Clone)]
pub struct GitChangedFiles {
    root: PathBuf,
}

impl GitChangedFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Top directory of the work tree containing `root`.
    pub fn workdir(&self) -> Result<PathBuf> {
        let output = run_git(&self.root, &["rev-parse", "--show-toplevel"])?;
        if !output.status.success() {
            bail!(
                "Not inside a git work tree: {}: {}",
                self.root.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if toplevel.is_empty() {
            bail!("Repository has no work tree: {}", self.root.display());
        }
        Ok(PathBuf::from(toplevel))
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<Output> {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .context("Failed to run git")
}

/// Turn `git diff --name-only` output into paths under the work tree.
pub fn parse_name_only(workdir: &Path, stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| workdir.join(line))
        .collect()
}

impl ChangedFilesProvider for GitChangedFiles {
    fn changed_files(&self, base_ref: &str) -> Result<Vec<PathBuf>> {
        let workdir = self.workdir()?;
        // `diff.relative` makes names relative to the directory git runs in.
        let output = run_git(
            &workdir,
            &["diff", "--name-only", "--diff-filter=d", base_ref],
        )?;

        if !output.status.success() {
            bail!(
                "git diff against '{}' failed: {}",
                base_ref,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(parse_name_only(
            &workdir,
            &String::from_utf8_lossy(&output.stdout),
        ))
    }
}
