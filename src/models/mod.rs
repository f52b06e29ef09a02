//! Records exchanged with the hosted backend.
//!
//! Rows arrive as loosely typed JSON (`*Row` structs) and are validated into
//! the typed records the rest of the client works with.

pub mod feedback;
pub mod issue;

pub use feedback::{NewFeedback, RatingAspect, Ratings, MAX_STARS};
pub use issue::{Department, Issue, IssueCategory, IssuePatch, IssueRow, IssueStatus, NewIssue};

use thiserror::Error;

/// A backend row that does not describe a valid record.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RowError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("coordinates out of range: ({0}, {1})")]
    CoordinatesOutOfRange(f64, f64),

    #[error("negative counter {field}: {value}")]
    NegativeCounter { field: &'static str, value: i64 },
}
