//! # Book Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - CRUD and substring search over title / author
//! - Conditional copy-count changes
//! - Availability repair
//!
//! ## Conditional Availability Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 change_availability(book, delta)                        │
//! │                                                                         │
//! │  ❌ WRONG: read, check, write (two requests can both see available=1)  │
//! │     SELECT available ...   → 1                                          │
//! │     UPDATE ... SET available = 0                                        │
//! │                                                                         │
//! │  ✅ CORRECT: one statement, precondition in the WHERE clause           │
//! │     UPDATE books SET available = available + ?delta                    │
//! │     WHERE id = ?id                                                      │
//! │       AND available + ?delta >= 0                                       │
//! │       AND available + ?delta <= copies                                  │
//! │                                                                         │
//! │  rows_affected = 1 → applied                                           │
//! │  rows_affected = 0 → refused (or no such book); nothing changed        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use libris_core::{Book, BookUpdate, NewBook};

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Catalogues a new book.
    ///
    /// Copy counts are normalised first (see [`NewBook::normalized`]), so a
    /// book inserted with `copies = 3` and no availability starts with three
    /// copies on the shelf.
    pub async fn create(&self, book: &NewBook) -> DbResult<Book> {
        let book = book.clone().normalized();
        let now = Utc::now();

        debug!(title = %book.title, copies = book.copies, "Inserting book");

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, copies, available, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING id, title, author, copies, available, created_at, updated_at
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.copies)
        .bind(book.available)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Gets a book by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - Book not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, copies, available, created_at, updated_at
            FROM books
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Lists every book, newest first.
    pub async fn list(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, copies, available, created_at, updated_at
            FROM books
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Case-insensitive substring search over title and author, newest first.
    ///
    /// An empty query lists every book. `%` and `_` in the query match
    /// literally.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Book>> {
        let query = query.trim();

        if query.is_empty() {
            return self.list().await;
        }

        debug!(query = %query, "Searching books");

        let pattern = format!("%{}%", escape_like(query));

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, copies, available, created_at, updated_at
            FROM books
            WHERE title LIKE ?1 ESCAPE '\'
               OR author LIKE ?1 ESCAPE '\'
            ORDER BY id DESC
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = books.len(), "Search returned books");
        Ok(books)
    }

    /// Replaces a book's editable fields (admin edit).
    ///
    /// `available` is clamped into `[0, copies]`.
    ///
    /// ## Returns
    /// * `Ok(Book)` - The stored row after the update
    /// * `Err(DbError::NotFound)` - Book doesn't exist
    pub async fn update(&self, id: i64, update: &BookUpdate) -> DbResult<Book> {
        let update = update.clone().clamped();
        let now = Utc::now();

        debug!(id, copies = update.copies, available = update.available, "Updating book");

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = ?2,
                author = ?3,
                copies = ?4,
                available = ?5,
                updated_at = ?6
            WHERE id = ?1
            RETURNING id, title, author, copies, available, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.author)
        .bind(update.copies)
        .bind(update.available)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        book.ok_or_else(|| DbError::not_found("Book", id))
    }

    /// Deletes a book that has no open issues.
    ///
    /// Returned issues of the book go with it (`ON DELETE CASCADE`).
    ///
    /// ## Returns
    /// * `Ok(true)` - Deleted
    /// * `Ok(false)` - No such book, or a copy is still on loan
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deleting book");

        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = ?1
              AND NOT EXISTS (
                  SELECT 1 FROM issues
                  WHERE issues.book_id = ?1 AND issues.returned_at IS NULL
              )
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Applies `delta` to the book's available count if the result stays
    /// within `[0, copies]`.
    ///
    /// Returns whether the row changed. `false` covers both "no such book"
    /// and "would leave the copy pool"; callers look the book up first when
    /// they need to tell those apart.
    pub async fn change_availability(&self, id: i64, delta: i64) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE books
            SET available = available + ?2,
                updated_at = ?3
            WHERE id = ?1
              AND available + ?2 >= 0
              AND available + ?2 <= copies
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let applied = result.rows_affected() > 0;
        debug!(id, delta, applied, "Changed availability");

        Ok(applied)
    }

    /// Recomputes `available` from the ledger: `copies - open issues`,
    /// floored at zero.
    ///
    /// Idempotent. Returns the repaired book, or `None` if it doesn't exist.
    pub async fn reconcile_availability(&self, id: i64) -> DbResult<Option<Book>> {
        let now = Utc::now();

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET available = MAX(0, copies - (
                    SELECT COUNT(*) FROM issues
                    WHERE issues.book_id = books.id AND issues.returned_at IS NULL
                )),
                updated_at = ?2
            WHERE id = ?1
            RETURNING id, title, author, copies, available, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Counts catalogued titles (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Escapes LIKE wildcards so user input matches literally under
/// `ESCAPE '\'`.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================
