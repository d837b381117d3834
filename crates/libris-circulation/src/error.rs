//! # Circulation Error Type
//!
//! The single error type callers of the engine and the [`Library`] facade see.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Libris                                 │
//! │                                                                         │
//! │  ValidationError ──► CoreError ──┐                                      │
//! │                                  ├──► CirculationError ──► ErrorBody    │
//! │  sqlx::Error ────► DbError ──────┤      .kind()            { code,     │
//! │                                  │                           message } │
//! │  toml / io ──────► ConfigError ──┘                                      │
//! │                                                                         │
//! │  Domain   → message shown as-is ("no available copies of book 7")      │
//! │  Storage  → "storage failure"; the DbError stays in the source chain   │
//! │  Config   → message shown as-is                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Library`]: crate::Library

use libris_core::{CoreError, ErrorKind, ValidationError};
use libris_db::DbError;
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by circulation and library operations.
#[derive(Debug, Error)]
pub enum CirculationError {
    /// A circulation rule or lookup refused the request.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// The persistence layer failed. Opaque to callers.
    #[error("storage failure")]
    Storage(#[from] DbError),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<ValidationError> for CirculationError {
    fn from(err: ValidationError) -> Self {
        CirculationError::Domain(CoreError::Validation(err))
    }
}

impl CirculationError {
    /// Coarse classification for status-code mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CirculationError::Domain(err) => err.kind(),
            CirculationError::Storage(_) => ErrorKind::Storage,
            CirculationError::Config(_) => ErrorKind::Validation,
        }
    }

    /// The domain error, if this is one.
    pub fn as_domain(&self) -> Option<&CoreError> {
        match self {
            CirculationError::Domain(err) => Some(err),
            _ => None,
        }
    }

    /// Serializable shape for a transport layer.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.kind(),
            message: self.to_string(),
        }
    }
}

/// What a transport layer sends back when an operation fails.
///
/// ```json
/// { "code": "CONFLICT", "message": "no available copies of book 7" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorKind,
    pub message: String,
}

/// Result type for circulation operations.
pub type CirculationResult<T> = Result<T, CirculationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_domain_errors_keep_their_message_and_kind() {
        let err: CirculationError = CoreError::NoAvailableCopies { book_id: 7 }.into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.to_string(), "no available copies of book 7");
        assert!(err.as_domain().is_some());
    }

    #[test]
    fn test_storage_errors_are_opaque() {
        let err: CirculationError = DbError::QueryFailed("disk I/O error".into()).into();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.to_string(), "storage failure");

        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("disk I/O error"));
    }

    #[test]
    fn test_validation_converts() {
        let err: CirculationError = ValidationError::Required {
            field: "title".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_error_body_serializes() {
        let err: CirculationError = CoreError::BookNotFound(3).into();
        let json = serde_json::to_value(err.to_body()).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Book not found: 3");
    }
}
