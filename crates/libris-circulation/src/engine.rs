//! # Circulation Engine
//!
//! Moves books between "on the shelf" and "on loan" and charges overdue
//! fines.
//!
//! ## Issue: a two-step saga
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  issue_book(book, member, due_days)                                     │
//! │                                                                         │
//! │  validate due_days ≤ 365                    ─► Validation               │
//! │  book exists?                               ─► NotFound                 │
//! │  member exists?                             ─► NotFound                 │
//! │  open issue for (book, member)?             ─► Conflict (already issued)│
//! │  change_availability(book, -1) applied?     ─► Conflict (no copies)     │
//! │       │                                                                 │
//! │       ▼  decrement committed                                            │
//! │  ledger.create(issue) ──ok──► issue id                                  │
//! │       │                                                                 │
//! │       └─err─► change_availability(book, +1)   compensation              │
//! │                   │                                                     │
//! │                   └─err─► logged at ERROR; book stays one copy short    │
//! │                           until reconcile(book)                         │
//! │               surface the insert error (UNIQUE → already issued)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Return
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  return_book(issue)                                                     │
//! │                                                                         │
//! │  issue exists?                      ─► NotFound                         │
//! │  fine = overdue_days × fine_per_day                                     │
//! │  mark_returned (only if still open) ─► Conflict (already returned)      │
//! │  change_availability(book, +1)         best effort, logged on failure   │
//! │  → fine                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine holds no mutable state. Two concurrent issues of the last copy
//! are decided by the catalog's conditional update; two concurrent issues for
//! the same pair are decided by the ledger's unique index.

use std::fmt;
use std::sync::Arc;

use libris_core::fine::{due_date_for, overdue_fine};
use libris_core::validation::validate_due_days;
use libris_core::{Book, Clock, CoreError, Issue, Money, NewIssue, DEFAULT_FINE_PER_DAY_CENTS};
use libris_db::DbError;
use tracing::{debug, error, info, warn};

use crate::error::CirculationResult;
use crate::ports::{CatalogStore, IssueLedger, MembershipStore};

// =============================================================================
// Settings
// =============================================================================

/// Tunables of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CirculationSettings {
    /// Flat fine charged per overdue day.
    pub fine_per_day: Money,
}

impl Default for CirculationSettings {
    fn default() -> Self {
        CirculationSettings {
            fine_per_day: Money::from_cents(DEFAULT_FINE_PER_DAY_CENTS),
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Orchestrates issue and return across the three stores.
///
/// Cheap to clone; every clone shares the same stores.
#[derive(Clone)]
pub struct CirculationEngine {
    catalog: Arc<dyn CatalogStore>,
    members: Arc<dyn MembershipStore>,
    ledger: Arc<dyn IssueLedger>,
    clock: Arc<dyn Clock>,
    settings: CirculationSettings,
}

impl fmt::Debug for CirculationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CirculationEngine")
            .field("clock", &self.clock)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CirculationEngine {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        members: Arc<dyn MembershipStore>,
        ledger: Arc<dyn IssueLedger>,
        clock: Arc<dyn Clock>,
        settings: CirculationSettings,
    ) -> Self {
        CirculationEngine {
            catalog,
            members,
            ledger,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> CirculationSettings {
        self.settings
    }

    /// Lends one copy of `book_id` to `member_id`.
    ///
    /// `due_days > 0` sets a due date that many calendar days after today
    /// (UTC); `due_days ≤ 0` issues without a deadline.
    ///
    /// ## Errors
    /// * `Validation` - `due_days` beyond the longest allowed loan
    /// * `BookNotFound` / `MemberNotFound`
    /// * `AlreadyIssued` - the member already holds this book
    /// * `NoAvailableCopies` - every copy is on loan
    /// * `Storage` - the stores failed; any decrement has been undone (or
    ///   logged for reconciliation)
    pub async fn issue_book(&self, book_id: i64, member_id: i64, due_days: i64) -> CirculationResult<i64> {
        validate_due_days(due_days)?;

        let book = self
            .catalog
            .get_by_id(book_id)
            .await?
            .ok_or(CoreError::BookNotFound(book_id))?;

        self.members
            .get_by_id(member_id)
            .await?
            .ok_or(CoreError::MemberNotFound(member_id))?;

        if self
            .ledger
            .get_active_by_book_and_member(book_id, member_id)
            .await?
            .is_some()
        {
            debug!(book_id, member_id, "Refusing issue: pair already has an open issue");
            return Err(CoreError::AlreadyIssued { book_id, member_id }.into());
        }

        if !self.catalog.change_availability(book_id, -1).await? {
            debug!(book_id, "Refusing issue: no copies on the shelf");
            return Err(CoreError::NoAvailableCopies { book_id }.into());
        }

        let issued_at = self.clock.now();
        let new_issue = NewIssue {
            book_id,
            member_id,
            issued_at,
            due_date: due_date_for(issued_at, due_days),
        };

        match self.ledger.create(&new_issue).await {
            Ok(issue_id) => {
                info!(
                    issue_id,
                    book_id,
                    member_id,
                    title = %book.title,
                    due_date = ?new_issue.due_date,
                    "Book issued"
                );
                Ok(issue_id)
            }
            Err(err) => {
                self.release_copy(book_id, &err).await;

                if err.is_unique_violation() {
                    Err(CoreError::AlreadyIssued { book_id, member_id }.into())
                } else {
                    Err(err.into())
                }
            }
        }
    }

    /// Undoes the availability decrement of a failed issue.
    async fn release_copy(&self, book_id: i64, cause: &DbError) {
        match self.catalog.change_availability(book_id, 1).await {
            Ok(true) => {
                warn!(book_id, error = %cause, "Issue insert failed; reserved copy released");
            }
            Ok(false) => {
                error!(
                    book_id,
                    error = %cause,
                    "Compensation refused by catalog; availability needs reconcile"
                );
            }
            Err(compensation_err) => {
                error!(
                    book_id,
                    error = %cause,
                    compensation_error = %compensation_err,
                    "COMPENSATION FAILED: book is one copy short until reconciled"
                );
            }
        }
    }

    /// Closes an issue and returns the fine charged.
    ///
    /// ## Errors
    /// * `IssueNotFound`
    /// * `AlreadyReturned` - the issue was closed earlier; its fine stands
    pub async fn return_book(&self, issue_id: i64) -> CirculationResult<Money> {
        let issue = self
            .ledger
            .get_by_id(issue_id)
            .await?
            .ok_or(CoreError::IssueNotFound(issue_id))?;

        if !issue.is_open() {
            return Err(CoreError::AlreadyReturned { issue_id }.into());
        }

        let returned_at = self.clock.now();
        let fine = overdue_fine(issue.due_date, returned_at, self.settings.fine_per_day);

        if !self.ledger.mark_returned(issue_id, returned_at, fine).await? {
            debug!(issue_id, "Lost the race to return this issue");
            return Err(CoreError::AlreadyReturned { issue_id }.into());
        }

        match self.catalog.change_availability(issue.book_id, 1).await {
            Ok(true) => {}
            Ok(false) => warn!(
                issue_id,
                book_id = issue.book_id,
                "Returned copy not added back: book missing or already at full stock"
            ),
            Err(err) => error!(
                issue_id,
                book_id = issue.book_id,
                error = %err,
                "Failed to restore availability after return; reconcile the book"
            ),
        }

        info!(issue_id, book_id = issue.book_id, fine = %fine, "Book returned");
        Ok(fine)
    }

    /// A member's loan history, newest first.
    pub async fn issues_by_member(&self, member_id: i64) -> CirculationResult<Vec<Issue>> {
        self.members
            .get_by_id(member_id)
            .await?
            .ok_or(CoreError::MemberNotFound(member_id))?;

        Ok(self.ledger.get_by_member(member_id).await?)
    }

    /// Recomputes a book's availability from its open issues.
    ///
    /// Idempotent; repairs the copy a failed compensation left behind.
    pub async fn reconcile(&self, book_id: i64) -> CirculationResult<Book> {
        let before = self
            .catalog
            .get_by_id(book_id)
            .await?
            .ok_or(CoreError::BookNotFound(book_id))?;

        let after = self
            .catalog
            .reconcile_availability(book_id)
            .await?
            .ok_or(CoreError::BookNotFound(book_id))?;

        if before.available != after.available {
            warn!(
                book_id,
                before = before.available,
                after = after.available,
                "Availability repaired"
            );
        } else {
            debug!(book_id, available = after.available, "Availability already consistent");
        }

        Ok(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fine_is_one_unit_per_day() {
        assert_eq!(CirculationSettings::default().fine_per_day, Money::from_units(1));
    }
}
