//! flowcov - Flow coverage pragma linter
//!
//! flowcov reconciles the uncovered expressions reported by `flow coverage`
//! with the `flow-uncovered-line`, `flow-next-uncovered-line` and
//! `flow-uncovered-block` pragmas in the source. It reports uncovered code
//! that is not suppressed, suppressions that are no longer needed, and
//! blocks that suppress far more than they have to.
//!
//! ## Module Structure
//!
//! - `core`: Pragma scanner and coverage reconciler (no I/O)
//! - `providers`: Flow and git collaborators
//! - `checker`: Per-file pipeline and parallel driver
//! - `files`: Candidate file selection
//! - `config`: Configuration file loading and parsing
//! - `cli`: Command-line interface layer

pub mod checker;
pub mod cli;
pub mod config;
pub mod core;
pub mod files;
pub mod providers;
