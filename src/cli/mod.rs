//! Command-line interface layer.

use anyhow::Result;

mod args;
mod exit_status;
pub mod report;
pub mod run;

pub use args::{Arguments, CheckCommand, Command, CommonArgs, OutputFormat};
pub use exit_status::ExitStatus;
pub use run::{CommandOutcome, FileSelection, RunConfig};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let outcome = run::run(args)?;
    report::print(&outcome)?;

    Ok(exit_status_from_outcome(&outcome))
}

fn exit_status_from_outcome(outcome: &CommandOutcome) -> ExitStatus {
    match outcome {
        CommandOutcome::Checked { result, .. } if result.warning_count() > 0 => ExitStatus::Failure,
        _ => ExitStatus::Success,
    }
}
