//! # libris-circulation: Circulation Engine for Libris
//!
//! Governs how a book moves between "available" and "on loan", keeps copy
//! counts consistent under concurrent requests, and computes overdue fines.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Libris Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            ★ libris-circulation (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  library  │  │  engine   │  │   ports   │  │  config   │  │   │
//! │  │   │  facade   │─►│ issue /   │─►│ Catalog   │  │ telemetry │  │   │
//! │  │   │  CRUD     │  │ return    │  │ Members   │  │  error    │  │   │
//! │  │   └───────────┘  └───────────┘  │ Ledger    │  └───────────┘  │   │
//! │  │                                 └─────┬─────┘                   │   │
//! │  └───────────────────────────────────────┼─────────────────────────┘   │
//! │                                          │ store.rs adapters            │
//! │  ┌───────────────────────────────────────▼─────────────────────────┐   │
//! │  │                  libris-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - `CirculationEngine`: issue, return, reconcile
//! - [`library`] - `Library`: the facade wiring database, stores and engine
//! - [`ports`] - Store traits the engine depends on
//! - [`store`] - Port implementations for the libris-db repositories
//! - [`config`] - `LibraryConfig` loading (defaults, TOML, environment)
//! - [`telemetry`] - Tracing subscriber setup
//! - [`error`] - `CirculationError`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use libris_circulation::{Library, LibraryConfig};
//! use libris_core::{NewBook, NewMember};
//!
//! # async fn run() -> libris_circulation::CirculationResult<()> {
//! libris_circulation::telemetry::init_tracing();
//!
//! let library = Library::open(&LibraryConfig::load(None)?).await?;
//! let book = library.create_book(&NewBook::new("Kindred", "Octavia E. Butler", 2)).await?;
//! let member = library.create_member(&NewMember::new("Dana")).await?;
//!
//! let issue_id = library.issue_book(book.id, member.id, 14).await?;
//! let fine = library.return_book(issue_id).await?;
//! println!("fine: {fine}");
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod library;
pub mod ports;
pub mod store;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, LibraryConfig};
pub use engine::{CirculationEngine, CirculationSettings};
pub use error::{CirculationError, CirculationResult, ErrorBody};
pub use library::Library;
pub use ports::{CatalogStore, IssueLedger, MembershipStore};
