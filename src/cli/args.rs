//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Reconcile Flow coverage with flow-uncovered pragmas
//! - `init`: Initialize flowcov configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// How warnings are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Cargo-style diagnostics with source context
    #[default]
    Console,
    /// One `path:::message:::offset` line per warning
    Arcanist,
    /// JSON array of annotations
    Json,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Files or directories to check (default: files changed since the base ref)
    pub paths: Vec<PathBuf>,

    /// Path to the flow binary (overrides config file)
    #[arg(long, env = "FLOWCOV_FLOW_BIN")]
    pub flow_bin: Option<PathBuf>,

    /// Git ref to diff against when no paths are given (overrides config file)
    #[arg(long, env = "FLOWCOV_BASE_REF")]
    pub base_ref: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report uncovered expressions, stale pragmas and over-broad blocks
    Check(CheckCommand),
    /// Initialize a new .flowcovrc.json configuration file
    Init,
}
