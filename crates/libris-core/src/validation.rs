//! # Validation Module
//!
//! Input validation for catalog, membership and circulation requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request binding (outside this workspace)                     │
//! │  ├── JSON shape, required keys                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Library facade / engine                                      │
//! │  └── THIS MODULE: field rules, loan period bounds                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (0 ≤ available ≤ copies)                         │
//! │  ├── Partial UNIQUE index (one open issue per book/member)             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{BookUpdate, NewBook, NewMember};
use crate::{MAX_LOAN_DAYS, MAX_SEARCH_QUERY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_TEXT_LEN: usize = 255;
const MAX_ROLL_NO_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a book title (required, at most 255 characters).
///
/// ```rust
/// use libris_core::validation::validate_title;
///
/// assert!(validate_title("The Left Hand of Darkness").is_ok());
/// assert!(validate_title("   ").is_err());
/// ```
pub fn validate_title(title: &str) -> ValidationResult<()> {
    validate_required_text("title", title, MAX_TEXT_LEN)
}

/// Validates an author name (required, at most 255 characters).
pub fn validate_author(author: &str) -> ValidationResult<()> {
    validate_required_text("author", author, MAX_TEXT_LEN)
}

/// Validates a member name (required, at most 255 characters).
pub fn validate_member_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, MAX_TEXT_LEN)
}

/// Validates an optional contact email.
///
/// Only a light shape check: something before and after a single '@'.
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(());
    };

    if email.len() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@host".to_string(),
        }),
    }
}

/// Validates a search query and returns it trimmed.
///
/// Empty is allowed (matches every book).
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a copy count on an admin edit (must be positive).
pub fn validate_copies(copies: i64) -> ValidationResult<()> {
    if copies <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "copies".to_string(),
        });
    }

    Ok(())
}

/// Validates the loan period requested when issuing.
///
/// `0` and negatives mean "no due date" and are accepted; anything beyond
/// [`MAX_LOAN_DAYS`] is refused.
pub fn validate_due_days(due_days: i64) -> ValidationResult<()> {
    if due_days > MAX_LOAN_DAYS {
        return Err(ValidationError::OutOfRange {
            field: "due_days".to_string(),
            min: 0,
            max: MAX_LOAN_DAYS,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a new book. Copy counts are normalised, not rejected.
pub fn validate_new_book(book: &NewBook) -> ValidationResult<()> {
    validate_title(&book.title)?;
    validate_author(&book.author)
}

/// Validates an admin edit of a book.
pub fn validate_book_update(update: &BookUpdate) -> ValidationResult<()> {
    validate_title(&update.title)?;
    validate_author(&update.author)?;
    validate_copies(update.copies)
}

/// Validates a member registration or edit.
pub fn validate_member(member: &NewMember) -> ValidationResult<()> {
    validate_member_name(&member.name)?;
    validate_email(member.email.as_deref())?;

    if let Some(roll_no) = member.roll_no.as_deref() {
        if roll_no.chars().count() > MAX_ROLL_NO_LEN {
            return Err(ValidationError::TooLong {
                field: "roll_no".to_string(),
                max: MAX_ROLL_NO_LEN,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
