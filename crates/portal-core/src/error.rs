//! Error types for report handling.

use crate::ReportId;
use thiserror::Error;

/// A submission was rejected before any report was derived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The mandatory rating was not supplied.
    #[error("rating is required")]
    MissingRating,
}

/// Errors returned by report use cases.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The submission failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No report exists with the given id.
    #[error("report with id {id} not found")]
    NotFound { id: ReportId },

    /// The report store failed.
    #[error("report storage error: {0}")]
    Storage(String),
}

impl ReportError {
    /// Create a not-found error for the given id.
    pub fn not_found(id: ReportId) -> Self {
        Self::NotFound { id }
    }
}
