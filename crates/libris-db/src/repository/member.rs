//! # Member Repository
//!
//! Database operations for the membership roll.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use libris_core::{Member, MemberUpdate, NewMember};

/// Repository for member database operations.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    /// Creates a new MemberRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MemberRepository { pool }
    }

    /// Registers a new member.
    pub async fn create(&self, member: &NewMember) -> DbResult<Member> {
        let now = Utc::now();

        debug!(name = %member.name, "Inserting member");

        let created = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email, roll_no, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, name, email, roll_no, created_at, updated_at
            "#,
        )
        .bind(member.name.trim())
        .bind(normalize_optional(member.email.as_deref()))
        .bind(normalize_optional(member.roll_no.as_deref()))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Gets a member by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, email, roll_no, created_at, updated_at
            FROM members
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    /// Lists every member, newest first.
    pub async fn list(&self) -> DbResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, email, roll_no, created_at, updated_at
            FROM members
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Replaces a member's details.
    ///
    /// ## Returns
    /// * `Ok(Member)` - The stored row after the update
    /// * `Err(DbError::NotFound)` - Member doesn't exist
    pub async fn update(&self, id: i64, update: &MemberUpdate) -> DbResult<Member> {
        let now = Utc::now();

        debug!(id, "Updating member");

        let member = sqlx::query_as::<_, Member>(
            r#"
            UPDATE members SET
                name = ?2,
                email = ?3,
                roll_no = ?4,
                updated_at = ?5
            WHERE id = ?1
            RETURNING id, name, email, roll_no, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.name.trim())
        .bind(normalize_optional(update.email.as_deref()))
        .bind(normalize_optional(update.roll_no.as_deref()))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        member.ok_or_else(|| DbError::not_found("Member", id))
    }

    /// Deletes a member who holds no open issues.
    ///
    /// The member's returned issues are removed with them.
    ///
    /// ## Returns
    /// * `Ok(true)` - Deleted
    /// * `Ok(false)` - No such member, or a loan is still open
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deleting member");

        let result = sqlx::query(
            r#"
            DELETE FROM members
            WHERE id = ?1
              AND NOT EXISTS (
                  SELECT 1 FROM issues
                  WHERE issues.member_id = ?1 AND issues.returned_at IS NULL
              )
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts registered members (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Blank optional text is stored as NULL.
fn normalize_optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use libris_core::{NewBook, NewIssue};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_member() {
        let db = setup().await;

        let member = db
            .members()
            .create(&NewMember::new(" Ada Lovelace ").with_email("ada@example.org").with_roll_no(""))
            .await
            .unwrap();

        assert_eq!(member.name, "Ada Lovelace");
        assert_eq!(member.email.as_deref(), Some("ada@example.org"));
        assert_eq!(member.roll_no, None);

        let fetched = db.members().get_by_id(member.id).await.unwrap().unwrap();
        assert_eq!(fetched, member);
        assert!(db.members().get_by_id(member.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_and_update() {
        let db = setup().await;
        let members = db.members();

        let first = members.create(&NewMember::new("Grace")).await.unwrap();
        members.create(&NewMember::new("Alan")).await.unwrap();

        let all = members.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Alan");

        let updated = members
            .update(first.id, &NewMember::new("Grace Hopper").with_roll_no("CS-1"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Grace Hopper");
        assert_eq!(updated.roll_no.as_deref(), Some("CS-1"));
        assert_eq!(updated.created_at, first.created_at);

        let missing = members.update(999, &NewMember::new("Nobody")).await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_refused_with_open_issue() {
        let db = setup().await;

        let book = db.books().create(&NewBook::new("Dubliners", "James Joyce", 1)).await.unwrap();
        let member = db.members().create(&NewMember::new("Gabriel")).await.unwrap();

        let issue_id = db
            .issues()
            .create(&NewIssue {
                book_id: book.id,
                member_id: member.id,
                issued_at: Utc::now(),
                due_date: None,
            })
            .await
            .unwrap();

        assert!(!db.members().delete(member.id).await.unwrap());

        db.issues()
            .mark_returned(issue_id, Utc::now(), libris_core::Money::zero())
            .await
            .unwrap();

        assert!(db.members().delete(member.id).await.unwrap());
        assert_eq!(db.members().count().await.unwrap(), 0);
    }
}
