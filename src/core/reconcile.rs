//! Coverage reconciler: cross-references Flow's uncovered ranges with the
//! suppression model of a file and reports every mismatch.
//!
//! Warnings are produced in three passes:
//! 1. unmatched block pragmas
//! 2. uncovered ranges with no suppression (in the order Flow reported them)
//! 3. suppressions that no uncovered range needs, per line or per block

use std::collections::{HashSet, VecDeque};

use crate::core::pragma::{BLOCK_CLOSE, BLOCK_OPEN, LINE_PRAGMA, NEXT_LINE_PRAGMA};
use crate::core::types::{
    AnnotationLevel, LineRange, Location, SuppressionModel, UncoveredRange, Warning, WarningKind,
};

/// A block is reported as over-broad once more than this fraction of its
/// interior lines is covered by Flow.
pub const OVER_SUPPRESSION_THRESHOLD: f64 = 0.8;

/// Reconcile `uncovered` ranges against the file's suppression model.
pub fn reconcile(
    path: &str,
    model: &SuppressionModel,
    uncovered: &[UncoveredRange],
) -> Vec<Warning> {
    let mut warnings = unmatched_block_warnings(path, model);

    let error_lines = uncovered_lines(uncovered);
    warnings.extend(gap_warnings(path, model, uncovered));
    warnings.extend(over_suppression_warnings(path, model, &error_lines));

    warnings
}

fn failure(
    path: &str,
    kind: WarningKind,
    start: Location,
    end: Location,
    offset: usize,
    message: String,
) -> Warning {
    Warning {
        path: path.to_string(),
        start,
        end,
        level: AnnotationLevel::Failure,
        kind,
        message,
        offset,
    }
}

fn unmatched_block_warnings(path: &str, model: &SuppressionModel) -> Vec<Warning> {
    model
        .unmatched_block_ranges
        .iter()
        .map(|block| {
            failure(
                path,
                WarningKind::UnmatchedBlock,
                Location::line_start(block.start),
                Location::line_start(block.end),
                model.offset_of(block.start),
                format!("Unmatched {}", BLOCK_OPEN),
            )
        })
        .collect()
}

/// Every line touched by an uncovered range, including ranges that are
/// later deduplicated away.
fn uncovered_lines(uncovered: &[UncoveredRange]) -> HashSet<usize> {
    uncovered.iter().flat_map(UncoveredRange::lines).collect()
}

/// Uncovered ranges with at least one unsuppressed line.
///
/// Only the first reported range per start line can produce a warning; Flow's
/// order is kept as-is, so nested expressions reported for the same line
/// collapse into whichever came first.
fn gap_warnings(
    path: &str,
    model: &SuppressionModel,
    uncovered: &[UncoveredRange],
) -> Vec<Warning> {
    let mut already_warned: HashSet<usize> = HashSet::new();
    let mut warnings = Vec::new();

    for range in uncovered {
        if already_warned.contains(&range.start.line) {
            continue;
        }

        let (start, end) = (range.start, range.end);
        let warning = if range.is_single_line() {
            if model.is_suppressed(start.line) {
                continue;
            }
            failure(
                path,
                WarningKind::UncoveredLine,
                start.into(),
                end.into(),
                start.offset,
                format!(
                    "The expression from {}:{}-{} is not covered by flow! If it's unavoidable, \
                     put '{}' at the end of the line or '{}' on the line above",
                    start.line, start.column, end.column, LINE_PRAGMA, NEXT_LINE_PRAGMA
                ),
            )
        } else {
            if range.lines().all(|line| model.is_suppressed(line)) {
                continue;
            }
            failure(
                path,
                WarningKind::UncoveredExpression,
                start.into(),
                end.into(),
                start.offset,
                format!(
                    "The expression from {}:{}-{}:{} is not covered by flow! If it's unavoidable, \
                     surround the expression in '{}' and '{}'",
                    start.line, start.column, end.line, end.column, BLOCK_OPEN, BLOCK_CLOSE
                ),
            )
        };

        already_warned.insert(start.line);
        warnings.push(warning);
    }

    warnings
}

/// Suppressed lines that Flow does not report as uncovered.
///
/// Lines outside any block are reported one by one. Lines inside a block are
/// counted and the block is judged as a whole when its close marker is reached.
fn over_suppression_warnings(
    path: &str,
    model: &SuppressionModel,
    error_lines: &HashSet<usize>,
) -> Vec<Warning> {
    assert!(
        model.blocks_are_ordered(),
        "block ranges must be sorted and disjoint"
    );

    let mut warnings = Vec::new();
    let mut blocks: VecDeque<LineRange> = model.block_ranges.iter().copied().collect();
    let mut current = blocks.pop_front();
    let mut passable = 0usize;

    for line in 1..=model.total_lines {
        if model.is_suppressed(line) && !error_lines.contains(&line) {
            match current {
                Some(block) if block.contains(line) => {
                    if !block.is_marker(line) {
                        passable += 1;
                    }
                }
                _ => warnings.push(failure(
                    path,
                    WarningKind::StaleLine,
                    Location::line_start(line),
                    Location::line_start(line),
                    model.offset_of(line),
                    format!(
                        "The expression in line {} is covered by flow! You should remove any \
                         '{}' or '{}' comments applying to this line.",
                        line, LINE_PRAGMA, BLOCK_OPEN
                    ),
                )),
            }
        }

        if let Some(block) = current
            && line == block.end
        {
            if is_over_broad(passable, block.interior_len()) {
                warnings.push(over_broad_warning(path, model, block));
            }
            passable = 0;
            current = blocks.pop_front();
        }
    }

    warnings
}

fn is_over_broad(passable: usize, block_len: usize) -> bool {
    block_len > 0 && passable as f64 / block_len as f64 > OVER_SUPPRESSION_THRESHOLD
}

fn over_broad_warning(path: &str, model: &SuppressionModel, block: LineRange) -> Warning {
    failure(
        path,
        WarningKind::OverBroadBlock,
        Location::line_start(block.start),
        Location::line_start(block.end),
        model.offset_of(block.start),
        format!(
            "More than {}% of lines in the 'flow-uncovered-block' from lines {}-{} are covered \
             by flow! You should remove this comment from the entire block and instead cover \
             individual lines using '{}'.",
            (OVER_SUPPRESSION_THRESHOLD * 100.0).floor() as u32,
            block.start,
            block.end,
            LINE_PRAGMA
        ),
    )
}
