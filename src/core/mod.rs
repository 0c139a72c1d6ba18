//! Core reconciliation engine.
//!
//! Two passes per file:
//! - `scanner`: reads the raw text once and builds a [`SuppressionModel`]
//! - `reconcile`: compares the model with Flow's uncovered ranges and
//!   produces the ordered list of [`Warning`]s
//!
//! Nothing here performs I/O; callers supply the file text and coverage data.

pub mod eligibility;
pub mod error;
pub mod pragma;
pub mod reconcile;
pub mod scanner;
pub mod types;

pub use eligibility::Eligibility;
pub use error::ScanError;
pub use reconcile::{OVER_SUPPRESSION_THRESHOLD, reconcile};
pub use scanner::{BlockState, scan};
pub use types::*;
