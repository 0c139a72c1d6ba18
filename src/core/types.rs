//! Shared data types for the scan/reconcile pipeline.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

// ============================================================
// Coverage Input
// ============================================================

/// A position reported by Flow (`line` is 1-based, `offset` is a byte offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    #[serde(default)]
    pub offset: usize,
}

/// A contiguous source range Flow judged type-unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncoveredRange {
    pub start: Position,
    pub end: Position,
}

impl UncoveredRange {
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Lines spanned by this range, inclusive.
    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        self.start.line..=self.end.line
    }
}

// ============================================================
// Suppression Model
// ============================================================

/// Inclusive range of lines `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    /// Number of lines strictly between the two marker lines.
    pub fn interior_len(&self) -> usize {
        self.end.saturating_sub(self.start).saturating_sub(1)
    }

    pub fn is_marker(&self, line: usize) -> bool {
        line == self.start || line == self.end
    }
}

/// Per-file record of which lines and blocks are under ignore pragmas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionModel {
    pub suppressed_lines: BTreeSet<usize>,
    /// Well-formed blocks in file order; disjoint and strictly increasing.
    pub block_ranges: Vec<LineRange>,
    /// Blocks that were never closed, either superseded by another open
    /// marker or still open at the end of the file.
    pub unmatched_block_ranges: Vec<LineRange>,
    /// Line number -> byte offset of the line's first character.
    pub line_offsets: BTreeMap<usize, usize>,
    pub total_lines: usize,
}

impl SuppressionModel {
    pub fn is_suppressed(&self, line: usize) -> bool {
        self.suppressed_lines.contains(&line)
    }

    /// Byte offset where `line` starts, or 0 for lines outside the file.
    pub fn offset_of(&self, line: usize) -> usize {
        self.line_offsets.get(&line).copied().unwrap_or(0)
    }

    pub(crate) fn push_block(&mut self, range: LineRange) {
        debug_assert!(
            self.block_ranges
                .last()
                .is_none_or(|last| last.end < range.start),
            "block ranges must be pushed in increasing, non-overlapping order"
        );
        self.block_ranges.push(range);
    }

    pub(crate) fn blocks_are_ordered(&self) -> bool {
        self.block_ranges
            .windows(2)
            .all(|pair| pair[0].end < pair[1].start)
    }
}

// ============================================================
// Warnings
// ============================================================

/// Line/column anchor of a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn line_start(line: usize) -> Self {
        Self { line, column: 0 }
    }
}

impl From<Position> for Location {
    fn from(pos: Position) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

/// Annotation level, named after the check-run annotation levels.
///
/// The reconciler only emits `Failure`; `Warning` completes the annotation
/// shape for other producers and is still rendered by the reporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationLevel {
    Warning,
    Failure,
}

impl std::fmt::Display for AnnotationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotationLevel::Warning => write!(f, "warning"),
            AnnotationLevel::Failure => write!(f, "failure"),
        }
    }
}

/// Which reconciliation rule produced a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    UnmatchedBlock,
    UncoveredLine,
    UncoveredExpression,
    StaleLine,
    OverBroadBlock,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::UnmatchedBlock => write!(f, "unmatched-block"),
            WarningKind::UncoveredLine => write!(f, "uncovered-line"),
            WarningKind::UncoveredExpression => write!(f, "uncovered-expression"),
            WarningKind::StaleLine => write!(f, "stale-line"),
            WarningKind::OverBroadBlock => write!(f, "over-broad-block"),
        }
    }
}

/// A single inconsistency between coverage data and the pragmas in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub path: String,
    pub start: Location,
    pub end: Location,
    #[serde(rename = "annotationLevel")]
    pub level: AnnotationLevel,
    pub kind: WarningKind,
    pub message: String,
    pub offset: usize,
}
