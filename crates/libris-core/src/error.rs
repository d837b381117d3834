//! # Error Types
//!
//! Domain-specific error types for libris-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  libris-core errors (this file)                                        │
//! │  ├── CoreError        - Circulation rule violations, missing records   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  libris-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  libris-circulation errors                                             │
//! │  └── CirculationError - What callers of the engine see                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CirculationError ← DbError        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (book ID, issue ID, etc.)
//! 3. Every variant classifies into an [`ErrorKind`] so a transport layer
//!    can map it to a status code without matching on every variant

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a failure.
///
/// ```text
/// NotFound   → referenced book / member / issue is absent
/// Conflict   → a circulation rule refused the operation
/// Validation → the input itself is malformed
/// Storage    → the persistence layer failed (opaque, always propagated)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Storage,
}

// =============================================================================
// Core Error
// =============================================================================

/// Circulation domain errors.
///
/// These are raised by the engine before (or instead of) any mutation, so a
/// caller that receives one of them can rely on the stores being unchanged.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Book does not exist.
    #[error("Book not found: {0}")]
    BookNotFound(i64),

    /// Member does not exist.
    #[error("Member not found: {0}")]
    MemberNotFound(i64),

    /// Issue record does not exist.
    #[error("Issue not found: {0}")]
    IssueNotFound(i64),

    /// The member already holds an open issue for this book.
    ///
    /// ## When This Occurs
    /// - Issuing the same title twice to one member without a return
    /// - Two concurrent issue requests for the same pair (the loser)
    #[error("already issued: book {book_id} is already on loan to member {member_id}")]
    AlreadyIssued { book_id: i64, member_id: i64 },

    /// Every copy of the book is on loan.
    ///
    /// ## User Workflow
    /// ```text
    /// Issue (book 7, member 3)
    ///      │
    ///      ▼
    /// change_availability(7, -1) → no row affected (available = 0)
    ///      │
    ///      ▼
    /// NoAvailableCopies { book_id: 7 }
    /// ```
    #[error("no available copies of book {book_id}")]
    NoAvailableCopies { book_id: i64 },

    /// The issue was already closed by an earlier return.
    #[error("already returned: issue {issue_id}")]
    AlreadyReturned { issue_id: i64 },

    /// A book cannot be removed while copies of it are on loan.
    #[error("book {book_id} has active issues and cannot be deleted")]
    BookHasActiveIssues { book_id: i64 },

    /// A member cannot be removed while holding a book.
    #[error("member {member_id} has active issues and cannot be deleted")]
    MemberHasActiveIssues { member_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::BookNotFound(_)
            | CoreError::MemberNotFound(_)
            | CoreError::IssueNotFound(_) => ErrorKind::NotFound,
            CoreError::AlreadyIssued { .. }
            | CoreError::NoAvailableCopies { .. }
            | CoreError::AlreadyReturned { .. }
            | CoreError::BookHasActiveIssues { .. }
            | CoreError::MemberHasActiveIssues { .. } => ErrorKind::Conflict,
            CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before any store is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., an email without '@').
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::NoAvailableCopies { book_id: 7 };
        assert_eq!(err.to_string(), "no available copies of book 7");

        let err = CoreError::AlreadyReturned { issue_id: 12 };
        assert_eq!(err.to_string(), "already returned: issue 12");

        let err = CoreError::AlreadyIssued {
            book_id: 1,
            member_id: 2,
        };
        assert!(err.to_string().starts_with("already issued"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(CoreError::BookNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::MemberNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::IssueNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(
            CoreError::NoAvailableCopies { book_id: 1 }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            CoreError::BookHasActiveIssues { book_id: 1 }.kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "title".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }
}
