//! Candidate file selection for a run.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

/// Filters candidate paths by extension and ignore patterns.
///
/// Ignore patterns are matched against the path relative to the project root.
pub struct FileFilter {
    root: PathBuf,
    extensions: Vec<String>,
    ignore_patterns: Vec<Pattern>,
}

impl FileFilter {
    pub fn new(root: &Path, extensions: &[String], ignores: &[String], verbose: bool) -> Self {
        let mut ignore_patterns = Vec::new();
        for p in ignores {
            match Pattern::new(p) {
                Ok(pattern) => ignore_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        }

        Self {
            root: root.to_path_buf(),
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            ignore_patterns,
        }
    }

    pub fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative.to_string_lossy();
        self.ignore_patterns.iter().any(|p| p.matches(&path_str))
    }

    pub fn accepts(&self, path: &Path) -> bool {
        self.has_extension(path) && !self.is_ignored(path)
    }
}

/// Expand `paths` into the files to check.
///
/// Directories are walked recursively; files are kept if they pass the
/// filter. Order follows the input, duplicates are dropped. Paths that do not
/// exist are skipped.
pub fn collect_files(paths: &[PathBuf], filter: &FileFilter, verbose: bool) -> Vec<PathBuf> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files = Vec::new();

    let mut push = |path: PathBuf| {
        if filter.accepts(&path) && seen.insert(path.clone()) {
            files.push(path);
        }
    };

    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = Vec::new();
            for entry in WalkDir::new(path) {
                match entry {
                    Ok(e) if e.file_type().is_file() => entries.push(e.into_path()),
                    Ok(_) => {}
                    Err(e) => {
                        if verbose {
                            eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                        }
                    }
                }
            }
            entries.sort();
            entries.into_iter().for_each(&mut push);
        } else if path.exists() {
            push(path.clone());
        } else if verbose {
            eprintln!(
                "{} Path does not exist: {}",
                "warning:".bold().yellow(),
                path.display()
            );
        }
    }

    files
}
