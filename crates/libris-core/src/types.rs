//! # Domain Types
//!
//! Core domain types used throughout Libris.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │     Issue       │   │     Member      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  book_id        │   │  id             │       │
//! │  │  title, author  │   │  member_id      │──►│  name           │       │
//! │  │  copies         │   │  issued_at      │   │  email          │       │
//! │  │  available      │   │  due_date?      │   │  roll_no        │       │
//! │  └─────────────────┘   │  returned_at?   │   └─────────────────┘       │
//! │                        │  fine_cents     │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `0 ≤ book.available ≤ book.copies`
//! - At most one open issue (no `returned_at`) per (book, member) pair
//!
//! IDs are database-assigned integers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Book
// =============================================================================

/// A catalogued title and its copy pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Total copies owned by the library.
    pub copies: i64,
    /// Copies currently on the shelf (not on loan).
    pub available: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Returns true if at least one copy is on the shelf.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.available > 0
    }

    /// Number of copies currently on loan.
    #[inline]
    pub fn on_loan(&self) -> i64 {
        self.copies - self.available
    }
}

/// Input for cataloguing a new book.
///
/// `available` left at zero (or negative) means "all copies are on the shelf".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub copies: i64,
    #[serde(default)]
    pub available: i64,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, copies: i64) -> Self {
        NewBook {
            title: title.into(),
            author: author.into(),
            copies,
            available: 0,
        }
    }

    /// Applies the cataloguing defaults.
    ///
    /// ```text
    /// copies ≤ 0     → 1
    /// available ≤ 0  → copies
    /// available > copies → copies
    /// ```
    pub fn normalized(mut self) -> Self {
        if self.copies <= 0 {
            self.copies = 1;
        }
        if self.available <= 0 {
            self.available = self.copies;
        }
        self.available = self.available.min(self.copies);
        self.title = self.title.trim().to_string();
        self.author = self.author.trim().to_string();
        self
    }
}

/// Full replacement of a book's editable fields (admin edit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub title: String,
    pub author: String,
    pub copies: i64,
    pub available: i64,
}

impl BookUpdate {
    /// Clamps `available` into `[0, copies]`.
    pub fn clamped(mut self) -> Self {
        self.available = self.available.clamp(0, self.copies.max(0));
        self.title = self.title.trim().to_string();
        self.author = self.author.trim().to_string();
        self
    }
}

// =============================================================================
// Member
// =============================================================================

/// A library member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub name: String,
    /// Contact address.
    pub email: Option<String>,
    /// Roll number / membership card string.
    pub roll_no: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering (or fully updating) a member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roll_no: Option<String>,
}

impl NewMember {
    pub fn new(name: impl Into<String>) -> Self {
        NewMember {
            name: name.into(),
            email: None,
            roll_no: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_roll_no(mut self, roll_no: impl Into<String>) -> Self {
        self.roll_no = Some(roll_no.into());
        self
    }
}

/// Member edits use the same shape as registration.
pub type MemberUpdate = NewMember;

// =============================================================================
// Issue
// =============================================================================

/// A loan transaction: one copy of a book held by one member.
///
/// Created by the engine's issue operation and closed exactly once by a
/// return, which stamps `returned_at` and the fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Issue {
    pub id: i64,
    pub book_id: i64,
    pub member_id: i64,
    pub issued_at: DateTime<Utc>,
    /// Calendar due date (no time component); `None` means no deadline.
    pub due_date: Option<NaiveDate>,
    pub returned_at: Option<DateTime<Utc>>,
    /// Fine charged at return, in cents. Zero until returned.
    pub fine_cents: i64,
}

impl Issue {
    /// True while the book has not come back.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }

    /// Returns the recorded fine as Money.
    #[inline]
    pub fn fine(&self) -> Money {
        Money::from_cents(self.fine_cents)
    }
}

/// Input for recording a new loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    pub book_id: i64,
    pub member_id: i64,
    pub issued_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_issue() -> Issue {
        Issue {
            id: 1,
            book_id: 2,
            member_id: 3,
            issued_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 15),
            returned_at: None,
            fine_cents: 0,
        }
    }

    #[test]
    fn test_new_book_defaults() {
        let book = NewBook::new("Dune", "Frank Herbert", 0).normalized();
        assert_eq!(book.copies, 1);
        assert_eq!(book.available, 1);

        let book = NewBook::new("Dune", "Frank Herbert", 4).normalized();
        assert_eq!(book.available, 4);
    }

    #[test]
    fn test_new_book_available_never_exceeds_copies() {
        let mut input = NewBook::new("  Emma ", "Jane Austen", 2);
        input.available = 9;
        let book = input.normalized();
        assert_eq!(book.available, 2);
        assert_eq!(book.title, "Emma");
    }

    #[test]
    fn test_book_update_clamps_available() {
        let update = BookUpdate {
            title: "Emma".into(),
            author: "Jane Austen".into(),
            copies: 3,
            available: 5,
        }
        .clamped();
        assert_eq!(update.available, 3);

        let update = BookUpdate {
            title: "Emma".into(),
            author: "Jane Austen".into(),
            copies: 3,
            available: -2,
        }
        .clamped();
        assert_eq!(update.available, 0);
    }

    #[test]
    fn test_issue_open_and_fine() {
        let mut issue = sample_issue();
        assert!(issue.is_open());
        assert!(issue.fine().is_zero());

        issue.returned_at = Some(Utc.with_ymd_and_hms(2024, 5, 16, 12, 0, 0).unwrap());
        issue.fine_cents = 200;
        assert!(!issue.is_open());
        assert_eq!(issue.fine().cents(), 200);
    }

    #[test]
    fn test_issue_due_date_serializes_as_calendar_date() {
        let json = serde_json::to_value(sample_issue()).unwrap();
        assert_eq!(json["due_date"], "2024-05-15");
        assert!(json["returned_at"].is_null());
    }

    #[test]
    fn test_member_builder() {
        let member = NewMember::new("Ada")
            .with_email("ada@example.org")
            .with_roll_no("R-17");
        assert_eq!(member.email.as_deref(), Some("ada@example.org"));
        assert_eq!(member.roll_no.as_deref(), Some("R-17"));
    }
}
