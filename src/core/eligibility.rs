//! Decides whether a file should be analysed at all.

use crate::core::pragma::FILE_OPT_OUT;

/// Marker that Flow requires before it type-checks a file.
pub const FLOW_MARKER: &str = "@flow";

/// Why a file was or was not analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    /// The file has a `/* flow-uncovered-file */` line.
    OptedOut,
    /// The file has no `@flow` marker.
    NotFlowChecked,
}

impl Eligibility {
    pub fn of(source: &str) -> Self {
        if source.split('\n').any(|line| line == FILE_OPT_OUT) {
            Self::OptedOut
        } else if !source.contains(FLOW_MARKER) {
            Self::NotFlowChecked
        } else {
            Self::Eligible
        }
    }
}
