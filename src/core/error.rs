use thiserror::Error;

/// Malformed pragma input that aborts analysis of a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("{path}:{line}: unmatched end ignore pragma")]
    UnmatchedEnd { path: String, line: usize },
}
