//! Command dispatch.
//!
//! `check` has two entry modes that both resolve into one [`RunConfig`]:
//! explicit paths on the command line, or (with no paths) the files changed
//! since a git base ref.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use colored::Colorize;

use super::args::{Arguments, CheckCommand, Command, OutputFormat};
use crate::checker::{CheckResult, check_files};
use crate::config::{CONFIG_FILE_NAME, default_config_json, load_config};
use crate::files::{FileFilter, collect_files};
use crate::providers::{ChangedFilesProvider, FlowCoverage, GitChangedFiles};

/// Which files a check run looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// Paths given on the command line, relative to the working directory.
    Paths(Vec<PathBuf>),
    /// Files changed since a git ref.
    ChangedSince(String),
}

/// Fully resolved settings for one `check` run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub selection: FileSelection,
    pub flow_bin: PathBuf,
    pub format: OutputFormat,
    pub verbose: bool,
    pub extensions: Vec<String>,
    pub ignores: Vec<String>,
}

impl RunConfig {
    /// Merge command-line arguments over the config file found from `root`.
    pub fn resolve(cmd: CheckCommand, root: &Path) -> Result<Self> {
        let verbose = cmd.common.verbose;
        let loaded = load_config(root)?;
        if verbose && !loaded.from_file {
            eprintln!(
                "{} No {} found, using default configuration",
                "note:".bold(),
                CONFIG_FILE_NAME
            );
        }
        let config = loaded.config;

        let selection = if !cmd.paths.is_empty() {
            FileSelection::Paths(cmd.paths)
        } else if let Some(base_ref) = cmd.base_ref.or(config.base_ref) {
            FileSelection::ChangedSince(base_ref)
        } else {
            bail!(
                "No paths given and no base ref configured. Pass files to check, \
                 or set --base-ref (or \"baseRef\" in {})",
                CONFIG_FILE_NAME
            );
        };

        let flow_bin = cmd
            .flow_bin
            .unwrap_or_else(|| PathBuf::from(&config.flow_bin));

        Ok(Self {
            root: root.to_path_buf(),
            selection,
            flow_bin: resolve_binary(root, flow_bin),
            format: cmd.format,
            verbose,
            extensions: config.extensions,
            ignores: config.ignores,
        })
    }

    /// Candidate files for this run, in a stable order.
    pub fn files(&self, changed: &dyn ChangedFilesProvider) -> Result<Vec<PathBuf>> {
        let filter = FileFilter::new(&self.root, &self.extensions, &self.ignores, self.verbose);
        match &self.selection {
            FileSelection::Paths(paths) => Ok(collect_files(paths, &filter, self.verbose)),
            FileSelection::ChangedSince(base_ref) => {
                let changed = changed.changed_files(base_ref)?;
                Ok(collect_files(&changed, &filter, self.verbose)
                    .into_iter()
                    .map(|path| self.relative_to_root(path))
                    .collect())
            }
        }
    }

    /// Changed files come back as work-tree paths; the ones under `root` are
    /// shown relative to it, like explicit paths.
    fn relative_to_root(&self, path: PathBuf) -> PathBuf {
        match path.strip_prefix(&self.root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => path,
        }
    }
}

/// Bare program names are looked up on `PATH`; anything with a directory
/// component is resolved against `root`.
fn resolve_binary(root: &Path, bin: PathBuf) -> PathBuf {
    if bin.components().count() > 1 {
        root.join(bin)
    } else {
        bin
    }
}

/// Result of running a command.
#[derive(Debug)]
pub enum CommandOutcome {
    Checked {
        result: CheckResult,
        format: OutputFormat,
    },
    NoFiles,
    Initialized(PathBuf),
}

pub fn run(Arguments { command }: Arguments) -> Result<CommandOutcome> {
    let root = std::env::current_dir().context("Failed to determine current directory")?;
    match command {
        Some(Command::Check(cmd)) => check(RunConfig::resolve(cmd, &root)?),
        Some(Command::Init) => init(&root).map(CommandOutcome::Initialized),
        None => {
            bail!("No command provided. Use --help to see available commands.")
        }
    }
}

pub fn check(config: RunConfig) -> Result<CommandOutcome> {
    let changed = GitChangedFiles::new(&config.root);
    let files = config.files(&changed)?;
    if files.is_empty() {
        return Ok(CommandOutcome::NoFiles);
    }

    if config.verbose {
        eprintln!(
            "{} {} file(s) with {}",
            "checking:".dimmed(),
            files.len(),
            config.flow_bin.display()
        );
    }

    let provider = FlowCoverage::new(&config.flow_bin);
    let result = check_files(&provider, &files, config.verbose)?;
    Ok(CommandOutcome::Checked {
        result,
        format: config.format,
    })
}

fn init(root: &Path) -> Result<PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(&config_path, default_config_json()?)?;
    Ok(config_path)
}
