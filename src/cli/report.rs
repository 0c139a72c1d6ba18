//! Report formatting and printing utilities.
//!
//! Warnings are handed to a [`WarningSink`]; the output format picks which
//! one. Separate from core logic so flowcov can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use enum_dispatch::enum_dispatch;
use unicode_width::UnicodeWidthStr;

use super::args::OutputFormat;
use super::run::CommandOutcome;
use crate::checker::{CheckResult, FileReport};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{AnnotationLevel, Warning};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Receives the warnings of a finished run.
#[enum_dispatch]
pub trait WarningSink {
    fn write_report(&self, result: &CheckResult, writer: &mut dyn Write) -> io::Result<()>;
}

/// Cargo-style diagnostics with the offending source line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

/// `path:::message:::offset`, one warning per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcanistReporter;

/// Pretty-printed JSON array of warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

#[enum_dispatch(WarningSink)]
#[derive(Debug, Clone, Copy)]
pub enum Reporter {
    Console(ConsoleReporter),
    Arcanist(ArcanistReporter),
    Json(JsonReporter),
}

impl From<OutputFormat> for Reporter {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Console => ConsoleReporter.into(),
            OutputFormat::Arcanist => ArcanistReporter.into(),
            OutputFormat::Json => JsonReporter.into(),
        }
    }
}

// ============================================================
// Console
// ============================================================

impl WarningSink for ConsoleReporter {
    fn write_report(&self, result: &CheckResult, writer: &mut dyn Write) -> io::Result<()> {
        let total = result.warning_count();
        if total == 0 {
            let checked = result.checked_count();
            return writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!(
                    "Checked {} {} - no problems found",
                    checked,
                    if checked == 1 { "file" } else { "files" }
                )
                .green()
            );
        }

        let max_line_width = calculate_max_line_width(result);
        for file in &result.files {
            for warning in &file.warnings {
                print_warning(file, warning, writer, max_line_width)?;
            }
        }

        let file_count = result
            .files
            .iter()
            .filter(|f| !f.warnings.is_empty())
            .count();
        writeln!(
            writer,
            "{} {} {} in {} {}",
            FAILURE_MARK.red(),
            total,
            if total == 1 { "problem" } else { "problems" },
            file_count,
            if file_count == 1 { "file" } else { "files" }
        )
    }
}

fn print_warning(
    file: &FileReport,
    warning: &Warning,
    writer: &mut dyn Write,
    max_line_width: usize,
) -> io::Result<()> {
    let severity_str = match warning.level {
        AnnotationLevel::Failure => "error".bold().red(),
        AnnotationLevel::Warning => "warning".bold().yellow(),
    };
    writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        warning.message,
        warning.kind.to_string().dimmed().cyan()
    )?;

    // Flow columns are 1-based; line-level warnings use column 0.
    let line = warning.start.line;
    let col = warning.start.column.max(1);
    writeln!(writer, "  {} {}:{}:{}", "-->".blue(), warning.path, line, col)?;

    if let Some(source_line) = file.source_line(line) {
        let caret_char = match warning.level {
            AnnotationLevel::Failure => "^".red(),
            AnnotationLevel::Warning => "^".yellow(),
        };
        writeln!(writer, "{:>width$} {}", "", "|".blue(), width = max_line_width)?;
        writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        )?;

        let prefix: String = source_line.chars().take(col - 1).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        )?;
    }

    if warning.end.line != warning.start.line {
        writeln!(
            writer,
            "{:>width$} {} {} spans lines {}-{}",
            "",
            "=".blue(),
            "note:".bold(),
            warning.start.line,
            warning.end.line,
            width = max_line_width
        )?;
    }

    writeln!(writer)
}

fn calculate_max_line_width(result: &CheckResult) -> usize {
    result
        .warnings()
        .map(|w| w.start.line)
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

// ============================================================
// Arcanist / JSON
// ============================================================

impl WarningSink for ArcanistReporter {
    fn write_report(&self, result: &CheckResult, writer: &mut dyn Write) -> io::Result<()> {
        for warning in result.warnings() {
            writeln!(
                writer,
                "{}:::{}:::{}",
                warning.path, warning.message, warning.offset
            )?;
        }
        Ok(())
    }
}

impl WarningSink for JsonReporter {
    fn write_report(&self, result: &CheckResult, writer: &mut dyn Write) -> io::Result<()> {
        let warnings: Vec<&Warning> = result.warnings().collect();
        serde_json::to_writer_pretty(&mut *writer, &warnings)?;
        writeln!(writer)
    }
}

// ============================================================
// Command Output
// ============================================================

pub fn print(outcome: &CommandOutcome) -> io::Result<()> {
    print_to(outcome, &mut io::stdout().lock())
}

pub fn print_to(outcome: &CommandOutcome, writer: &mut dyn Write) -> io::Result<()> {
    match outcome {
        CommandOutcome::Checked { result, format } => {
            Reporter::from(*format).write_report(result, writer)
        }
        CommandOutcome::NoFiles => writeln!(writer, "No files to check"),
        CommandOutcome::Initialized(_) => writeln!(
            writer,
            "{} Created {}",
            SUCCESS_MARK.green(),
            CONFIG_FILE_NAME
        ),
    }
}
