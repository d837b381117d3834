//! # Issue Repository
//!
//! Database operations for the circulation ledger.
//!
//! ## Issue Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   create()                      mark_returned()                         │
//! │  ─────────► OPEN ──────────────────────────────► RETURNED               │
//! │             returned_at NULL    (only if still    returned_at set       │
//! │             fine_cents 0         NULL; else no-op) fine_cents fixed     │
//! │                                                                         │
//! │  UNIQUE (book_id, member_id) WHERE returned_at IS NULL                  │
//! │    → a second OPEN row for the same pair fails with UniqueViolation     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use libris_core::{Issue, Money, NewIssue};

/// Repository for ledger database operations.
#[derive(Debug, Clone)]
pub struct IssueRepository {
    pool: SqlitePool,
}

impl IssueRepository {
    /// Creates a new IssueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        IssueRepository { pool }
    }

    /// Records a new open issue and returns its ID.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - The pair already has an open issue
    /// * `DbError::ForeignKeyViolation` - Book or member doesn't exist
    pub async fn create(&self, issue: &NewIssue) -> DbResult<i64> {
        debug!(
            book_id = issue.book_id,
            member_id = issue.member_id,
            due_date = ?issue.due_date,
            "Inserting issue"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO issues (book_id, member_id, issued_at, due_date, returned_at, fine_cents)
            VALUES (?1, ?2, ?3, ?4, NULL, 0)
            "#,
        )
        .bind(issue.book_id)
        .bind(issue.member_id)
        .bind(issue.issued_at)
        .bind(issue.due_date)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Gets an issue by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Issue>> {
        let issue = sqlx::query_as::<_, Issue>(
            r#"
            SELECT id, book_id, member_id, issued_at, due_date, returned_at, fine_cents
            FROM issues
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(issue)
    }

    /// Every issue of a member, open or returned, newest first.
    pub async fn get_by_member(&self, member_id: i64) -> DbResult<Vec<Issue>> {
        let issues = sqlx::query_as::<_, Issue>(
            r#"
            SELECT id, book_id, member_id, issued_at, due_date, returned_at, fine_cents
            FROM issues
            WHERE member_id = ?1
            ORDER BY issued_at DESC, id DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(issues)
    }

    /// The open issue for a (book, member) pair, if any.
    pub async fn get_active_by_book_and_member(
        &self,
        book_id: i64,
        member_id: i64,
    ) -> DbResult<Option<Issue>> {
        let issue = sqlx::query_as::<_, Issue>(
            r#"
            SELECT id, book_id, member_id, issued_at, due_date, returned_at, fine_cents
            FROM issues
            WHERE book_id = ?1 AND member_id = ?2 AND returned_at IS NULL
            LIMIT 1
            "#,
        )
        .bind(book_id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(issue)
    }

    /// Closes an open issue, stamping the return time and fine.
    ///
    /// Conditional on `returned_at IS NULL`: returns `false` and changes
    /// nothing when the issue is missing or already returned, so a fine is
    /// never recomputed.
    pub async fn mark_returned(
        &self,
        id: i64,
        returned_at: DateTime<Utc>,
        fine: Money,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE issues
            SET returned_at = ?2,
                fine_cents = ?3
            WHERE id = ?1 AND returned_at IS NULL
            "#,
        )
        .bind(id)
        .bind(returned_at)
        .bind(fine.cents())
        .execute(&self.pool)
        .await?;

        let applied = result.rows_affected() > 0;
        debug!(id, fine_cents = fine.cents(), applied, "Marked issue returned");

        Ok(applied)
    }

    /// Number of open issues for a book.
    pub async fn count_open_by_book(&self, book_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM issues WHERE book_id = ?1 AND returned_at IS NULL",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use chrono::{NaiveDate, TimeZone};
    use libris_core::{NewBook, NewMember};

    struct Fixture {
        db: Database,
        book_id: i64,
        member_id: i64,
    }

    async fn setup() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let book = db.books().create(&NewBook::new("Persuasion", "Jane Austen", 2)).await.unwrap();
        let member = db.members().create(&NewMember::new("Anne")).await.unwrap();
        Fixture {
            db,
            book_id: book.id,
            member_id: member.id,
        }
    }

    fn new_issue(f: &Fixture, issued_at: DateTime<Utc>) -> NewIssue {
        NewIssue {
            book_id: f.book_id,
            member_id: f.member_id,
            issued_at,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 15),
        }
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let f = setup().await;
        let issued_at = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        let id = f.db.issues().create(&new_issue(&f, issued_at)).await.unwrap();
        let issue = f.db.issues().get_by_id(id).await.unwrap().unwrap();

        assert_eq!(issue.book_id, f.book_id);
        assert_eq!(issue.member_id, f.member_id);
        assert_eq!(issue.issued_at, issued_at);
        assert_eq!(issue.due_date, NaiveDate::from_ymd_opt(2024, 6, 15));
        assert!(issue.is_open());
        assert_eq!(issue.fine_cents, 0);

        let active = f
            .db
            .issues()
            .get_active_by_book_and_member(f.book_id, f.member_id)
            .await
            .unwrap();
        assert_eq!(active.map(|i| i.id), Some(id));
    }

    #[tokio::test]
    async fn test_second_open_issue_for_pair_is_rejected() {
        let f = setup().await;
        let now = Utc::now();

        f.db.issues().create(&new_issue(&f, now)).await.unwrap();
        let err = f.db.issues().create(&new_issue(&f, now)).await.unwrap_err();

        assert!(err.is_unique_violation(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_issue_for_missing_member_violates_foreign_key() {
        let f = setup().await;
        let mut issue = new_issue(&f, Utc::now());
        issue.member_id = 999;

        let err = f.db.issues().create(&issue).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_mark_returned_only_once() {
        let f = setup().await;
        let issues = f.db.issues();

        let id = issues.create(&new_issue(&f, Utc::now())).await.unwrap();
        let returned_at = Utc.with_ymd_and_hms(2024, 6, 17, 9, 0, 0).unwrap();

        assert!(issues.mark_returned(id, returned_at, Money::from_cents(300)).await.unwrap());
        assert!(!issues.mark_returned(id, Utc::now(), Money::from_cents(900)).await.unwrap());

        let issue = issues.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(issue.returned_at, Some(returned_at));
        assert_eq!(issue.fine_cents, 300);

        assert!(!issues.mark_returned(999, Utc::now(), Money::zero()).await.unwrap());
    }

    #[tokio::test]
    async fn test_pair_can_borrow_again_after_return() {
        let f = setup().await;
        let issues = f.db.issues();

        let first = issues.create(&new_issue(&f, Utc::now())).await.unwrap();
        issues.mark_returned(first, Utc::now(), Money::zero()).await.unwrap();

        let second = issues.create(&new_issue(&f, Utc::now())).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(issues.count_open_by_book(f.book_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_member_newest_first() {
        let f = setup().await;
        let issues = f.db.issues();

        let older = issues
            .create(&new_issue(&f, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
            .await
            .unwrap();
        issues.mark_returned(older, Utc::now(), Money::zero()).await.unwrap();
        let newer = issues
            .create(&new_issue(&f, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()))
            .await
            .unwrap();

        let history = issues.get_by_member(f.member_id).await.unwrap();
        let ids: Vec<i64> = history.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![newer, older]);

        assert!(issues.get_by_member(999).await.unwrap().is_empty());
    }
}
