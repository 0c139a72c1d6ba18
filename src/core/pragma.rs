//! Plain-text recognition of flow-uncovered pragmas.
//!
//! Supported forms:
//! - `// flow-uncovered-line` or `/* flow-uncovered-line */` at the end of a line,
//!   optionally followed by an explanation
//! - `// flow-next-uncovered-line` (or `flow-uncovered-next-line`) on the line above
//! - `/* flow-uncovered-block */` ... `/* end flow-uncovered-block */` on their own lines
//! - `/* flow-uncovered-file */` as a whole line opts the file out entirely

use std::sync::LazyLock;

use regex::Regex;

pub const BLOCK_OPEN: &str = "/* flow-uncovered-block */";
pub const BLOCK_CLOSE: &str = "/* end flow-uncovered-block */";
pub const FILE_OPT_OUT: &str = "/* flow-uncovered-file */";
pub const LINE_PRAGMA: &str = "// flow-uncovered-line";
pub const NEXT_LINE_PRAGMA: &str = "// flow-next-uncovered-line";

// Allows text after the marker explaining why.
static SAME_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(//\s*flow-uncovered-line[\s:]?.*|/\*\s*flow-uncovered-line(\s+[^*]*)?\*/)")
        .unwrap()
});

static NEXT_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(//\s*flow-(next-uncovered|uncovered-next)-line|/\*\s*flow-(next-uncovered|uncovered-next)-line(\s+[^*]*)?\*/)",
    )
    .unwrap()
});

static BLOCK_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*/\* flow-uncovered-block \*/").unwrap());

static BLOCK_CLOSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*/\* end flow-uncovered-block \*/").unwrap());

/// Block marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMarker {
    Open,
    Close,
}

impl BlockMarker {
    /// Detect a block marker. Only leading whitespace may precede it.
    pub fn parse(line: &str) -> Option<Self> {
        if BLOCK_OPEN_REGEX.is_match(line) {
            Some(Self::Open)
        } else if BLOCK_CLOSE_REGEX.is_match(line) {
            Some(Self::Close)
        } else {
            None
        }
    }
}

/// True if the line carries a trailing `flow-uncovered-line` marker.
pub fn suppresses_same_line(line: &str) -> bool {
    SAME_LINE_REGEX.is_match(line)
}

/// True if the line arms suppression for the line that follows it.
pub fn suppresses_next_line(line: &str) -> bool {
    NEXT_LINE_REGEX.is_match(line)
}
