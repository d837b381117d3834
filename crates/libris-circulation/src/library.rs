//! # Library Facade
//!
//! The plain async call surface a transport layer binds to.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  transport (not part of this workspace)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Library                                                                │
//! │  ├── books:    create / get / list / search / update / delete          │
//! │  ├── members:  create / get / list / update / delete                   │
//! │  └── loans:    issue_book / return_book / issues_by_member /           │
//! │                reconcile_book  ──► CirculationEngine                   │
//! │       │                                                                 │
//! │       │  input validated here (libris-core::validation)                │
//! │       ▼                                                                 │
//! │  store ports ──► libris-db repositories ──► SQLite                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use libris_core::validation::{
    validate_book_update, validate_member, validate_new_book, validate_search_query,
};
use libris_core::{
    Book, BookUpdate, Clock, CoreError, Issue, Member, MemberUpdate, Money, NewBook, NewMember,
    SystemClock,
};
use libris_db::{Database, DbError};
use tracing::info;

use crate::config::{ConfigError, LibraryConfig};
use crate::engine::{CirculationEngine, CirculationSettings};
use crate::error::CirculationResult;
use crate::ports::{CatalogStore, IssueLedger, MembershipStore};

/// A single lending library backed by SQLite.
#[derive(Clone)]
pub struct Library {
    db: Database,
    engine: CirculationEngine,
    catalog: Arc<dyn CatalogStore>,
    members: Arc<dyn MembershipStore>,
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("db", &self.db)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl Library {
    /// Opens the configured database (running migrations) on the system clock.
    ///
    /// ```rust,no_run
    /// use libris_circulation::{Library, LibraryConfig};
    ///
    /// # async fn run() -> Result<(), libris_circulation::CirculationError> {
    /// let library = Library::open(&LibraryConfig::load(None)?).await?;
    /// let book = library.create_book(&libris_core::NewBook::new("Dune", "Frank Herbert", 2)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open(config: &LibraryConfig) -> CirculationResult<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Like [`Library::open`] with an injected clock.
    pub async fn open_with_clock(
        config: &LibraryConfig,
        clock: Arc<dyn Clock>,
    ) -> CirculationResult<Self> {
        config.validate()?;

        if !config.database.is_in_memory() {
            if let Some(parent) = config.database.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
                }
            }
        }

        let db = Database::new(config.database.to_db_config()).await?;

        info!(
            fine_per_day = %config.circulation_settings().fine_per_day,
            "Library opened"
        );

        Ok(Self::from_database(db, clock, config.circulation_settings()))
    }

    /// Wires the engine over an already open database.
    pub fn from_database(db: Database, clock: Arc<dyn Clock>, settings: CirculationSettings) -> Self {
        let catalog: Arc<dyn CatalogStore> = Arc::new(db.books());
        let members: Arc<dyn MembershipStore> = Arc::new(db.members());
        let ledger: Arc<dyn IssueLedger> = Arc::new(db.issues());

        let engine = CirculationEngine::new(catalog.clone(), members.clone(), ledger, clock, settings);

        Library {
            db,
            engine,
            catalog,
            members,
        }
    }

    pub fn engine(&self) -> &CirculationEngine {
        &self.engine
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.db.close().await;
    }

    // =========================================================================
    // Books
    // =========================================================================

    pub async fn create_book(&self, book: &NewBook) -> CirculationResult<Book> {
        validate_new_book(book)?;
        let created = self.catalog.create(book).await?;
        info!(book_id = created.id, title = %created.title, copies = created.copies, "Book catalogued");
        Ok(created)
    }

    pub async fn get_book(&self, id: i64) -> CirculationResult<Book> {
        Ok(self
            .catalog
            .get_by_id(id)
            .await?
            .ok_or(CoreError::BookNotFound(id))?)
    }

    pub async fn list_books(&self) -> CirculationResult<Vec<Book>> {
        Ok(self.catalog.list().await?)
    }

    /// Substring search over title and author; an empty query lists all.
    pub async fn search_books(&self, query: &str) -> CirculationResult<Vec<Book>> {
        let query = validate_search_query(query)?;
        Ok(self.catalog.search(&query).await?)
    }

    /// Admin edit. `available` is clamped to the new copy count.
    pub async fn update_book(&self, id: i64, update: &BookUpdate) -> CirculationResult<Book> {
        validate_book_update(update)?;

        match self.catalog.update(id, update).await {
            Ok(book) => Ok(book),
            Err(DbError::NotFound { .. }) => Err(CoreError::BookNotFound(id).into()),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes a book. Refused while any copy is on loan.
    pub async fn delete_book(&self, id: i64) -> CirculationResult<()> {
        if self.catalog.delete(id).await? {
            info!(book_id = id, "Book deleted");
            return Ok(());
        }

        match self.catalog.get_by_id(id).await? {
            Some(_) => Err(CoreError::BookHasActiveIssues { book_id: id }.into()),
            None => Err(CoreError::BookNotFound(id).into()),
        }
    }

    // =========================================================================
    // Members
    // =========================================================================

    pub async fn create_member(&self, member: &NewMember) -> CirculationResult<Member> {
        validate_member(member)?;
        let created = self.members.create(member).await?;
        info!(member_id = created.id, "Member registered");
        Ok(created)
    }

    pub async fn get_member(&self, id: i64) -> CirculationResult<Member> {
        Ok(self
            .members
            .get_by_id(id)
            .await?
            .ok_or(CoreError::MemberNotFound(id))?)
    }

    pub async fn list_members(&self) -> CirculationResult<Vec<Member>> {
        Ok(self.members.list().await?)
    }

    pub async fn update_member(&self, id: i64, update: &MemberUpdate) -> CirculationResult<Member> {
        validate_member(update)?;

        match self.members.update(id, update).await {
            Ok(member) => Ok(member),
            Err(DbError::NotFound { .. }) => Err(CoreError::MemberNotFound(id).into()),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes a member. Refused while they hold a book.
    pub async fn delete_member(&self, id: i64) -> CirculationResult<()> {
        if self.members.delete(id).await? {
            info!(member_id = id, "Member deleted");
            return Ok(());
        }

        match self.members.get_by_id(id).await? {
            Some(_) => Err(CoreError::MemberHasActiveIssues { member_id: id }.into()),
            None => Err(CoreError::MemberNotFound(id).into()),
        }
    }

    // =========================================================================
    // Circulation
    // =========================================================================

    /// See [`CirculationEngine::issue_book`].
    pub async fn issue_book(&self, book_id: i64, member_id: i64, due_days: i64) -> CirculationResult<i64> {
        self.engine.issue_book(book_id, member_id, due_days).await
    }

    /// See [`CirculationEngine::return_book`].
    pub async fn return_book(&self, issue_id: i64) -> CirculationResult<Money> {
        self.engine.return_book(issue_id).await
    }

    pub async fn issues_by_member(&self, member_id: i64) -> CirculationResult<Vec<Issue>> {
        self.engine.issues_by_member(member_id).await
    }

    /// See [`CirculationEngine::reconcile`].
    pub async fn reconcile_book(&self, book_id: i64) -> CirculationResult<Book> {
        self.engine.reconcile(book_id).await
    }
}
