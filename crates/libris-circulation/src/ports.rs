//! # Store Ports
//!
//! The three persistence seams the engine talks through.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CirculationEngine                                                      │
//! │       │                                                                 │
//! │       ├──► Arc<dyn CatalogStore>     books, copy counts                 │
//! │       ├──► Arc<dyn MembershipStore>  members                            │
//! │       └──► Arc<dyn IssueLedger>      issues                             │
//! │                                                                         │
//! │  Production: libris-db repositories (see `store`)                      │
//! │  Tests:      wrappers that inject faults around the repositories        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two compare-and-swap operations, [`CatalogStore::change_availability`]
//! and [`IssueLedger::mark_returned`], must be atomic in the implementation
//! and report whether they applied. The engine builds all of its concurrency
//! guarantees on them and holds no locks of its own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libris_core::{Book, BookUpdate, Issue, Member, MemberUpdate, Money, NewBook, NewIssue, NewMember};
use libris_db::DbResult;

/// Book records and copy-count arithmetic.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create(&self, book: &NewBook) -> DbResult<Book>;

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Book>>;

    async fn list(&self) -> DbResult<Vec<Book>>;

    /// Substring match over title and author.
    async fn search(&self, query: &str) -> DbResult<Vec<Book>>;

    async fn update(&self, id: i64, update: &BookUpdate) -> DbResult<Book>;

    /// Deletes a book with no open issues. `false` when nothing was deleted.
    async fn delete(&self, id: i64) -> DbResult<bool>;

    /// Applies `delta` to `available` only if the result stays within
    /// `[0, copies]`. Returns whether the row changed.
    async fn change_availability(&self, id: i64, delta: i64) -> DbResult<bool>;

    /// Sets `available` to `copies - open issues`. `None` if no such book.
    async fn reconcile_availability(&self, id: i64) -> DbResult<Option<Book>>;
}

/// Member records.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn create(&self, member: &NewMember) -> DbResult<Member>;

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Member>>;

    async fn list(&self) -> DbResult<Vec<Member>>;

    async fn update(&self, id: i64, update: &MemberUpdate) -> DbResult<Member>;

    /// Deletes a member with no open issues. `false` when nothing was deleted.
    async fn delete(&self, id: i64) -> DbResult<bool>;
}

/// Issue records and their return/fine state.
#[async_trait]
pub trait IssueLedger: Send + Sync {
    /// Inserts an open issue and returns its ID.
    async fn create(&self, issue: &NewIssue) -> DbResult<i64>;

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Issue>>;

    /// A member's issues, newest first.
    async fn get_by_member(&self, member_id: i64) -> DbResult<Vec<Issue>>;

    async fn get_active_by_book_and_member(
        &self,
        book_id: i64,
        member_id: i64,
    ) -> DbResult<Option<Issue>>;

    /// Closes the issue only if it is still open. Returns whether it applied.
    async fn mark_returned(
        &self,
        issue_id: i64,
        returned_at: DateTime<Utc>,
        fine: Money,
    ) -> DbResult<bool>;
}
