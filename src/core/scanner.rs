//! Pragma scanner: one forward pass over a file's text.
//!
//! Block pragmas are tracked by [`BlockState`], a two-state machine whose
//! transitions report the two malformed-input conditions separately:
//! an open marker while already in a block (recorded as unmatched) and a
//! close marker while idle (fatal).

use crate::core::error::ScanError;
use crate::core::pragma::{self, BlockMarker};
use crate::core::types::{LineRange, SuppressionModel};

/// Block-suppression state of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Idle,
    InBlock { start: usize },
}

impl BlockState {
    pub fn is_in_block(&self) -> bool {
        matches!(self, BlockState::InBlock { .. })
    }

    /// Open a block at `line`.
    ///
    /// Returns the superseded block `[start, line - 1]` if one was still open.
    pub fn open(&mut self, line: usize) -> Option<LineRange> {
        let superseded = match *self {
            BlockState::InBlock { start } => Some(LineRange::new(start, line.saturating_sub(1))),
            BlockState::Idle => None,
        };
        *self = BlockState::InBlock { start: line };
        superseded
    }

    /// Close the open block at `line`, returning its full range.
    pub fn close(&mut self, path: &str, line: usize) -> Result<LineRange, ScanError> {
        match *self {
            BlockState::InBlock { start } => {
                *self = BlockState::Idle;
                Ok(LineRange::new(start, line))
            }
            BlockState::Idle => Err(ScanError::UnmatchedEnd {
                path: path.to_string(),
                line,
            }),
        }
    }

    /// End of input: a block that is still open becomes `[start, last_line]`.
    pub fn finish(self, last_line: usize) -> Option<LineRange> {
        match self {
            BlockState::InBlock { start } => Some(LineRange::new(start, last_line)),
            BlockState::Idle => None,
        }
    }
}

/// Scan `text` for ignore pragmas and build the file's suppression model.
///
/// # Errors
/// Returns [`ScanError::UnmatchedEnd`] for a block-close marker with no open block.
pub fn scan(path: &str, text: &str) -> Result<SuppressionModel, ScanError> {
    let mut model = SuppressionModel::default();
    let mut block = BlockState::Idle;
    let mut suppress_next_line = false;
    let mut offset = 0;

    for (idx, line) in text.split('\n').enumerate() {
        let line_num = idx + 1;
        model.line_offsets.insert(line_num, offset);
        offset += line.len() + 1;
        model.total_lines = line_num;

        match BlockMarker::parse(line) {
            Some(BlockMarker::Open) => {
                if let Some(superseded) = block.open(line_num) {
                    model.unmatched_block_ranges.push(superseded);
                }
                continue;
            }
            Some(BlockMarker::Close) => {
                let range = block.close(path, line_num)?;
                model.suppressed_lines.insert(range.start);
                model.suppressed_lines.insert(range.end);
                model.push_block(range);
                continue;
            }
            None => {}
        }

        if suppress_next_line || pragma::suppresses_same_line(line) {
            suppress_next_line = false;
            model.suppressed_lines.insert(line_num);
        } else if block.is_in_block() {
            model.suppressed_lines.insert(line_num);
        }

        suppress_next_line = pragma::suppresses_next_line(line);
    }

    if let Some(unterminated) = block.finish(model.total_lines) {
        model.unmatched_block_ranges.push(unterminated);
    }

    Ok(model)
}
