//! # libris-core: Pure Domain Logic for Libris
//!
//! This crate holds the domain model of a single lending library: books,
//! members and the issues (loans) linking them, plus the arithmetic the
//! circulation engine relies on. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Libris Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              libris-circulation (Engine + Library)              │   │
//! │  │      issue_book, return_book, book/member CRUD, reconcile       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ libris-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   fine    │  │ validation│  │   │
//! │  │   │   Book    │  │   Money   │  │ due dates │  │   rules   │  │   │
//! │  │   │  Member   │  │           │  │ overdue   │  │  checks   │  │   │
//! │  │   │   Issue   │  │           │  │   days    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  libris-db (Database Layer)                     │   │
//! │  │        SQLite queries, migrations, conditional updates          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, Member, Issue and their inputs)
//! - [`money`] - Money type with integer arithmetic (fines are never floats)
//! - [`fine`] - Due-date and overdue-fine arithmetic
//! - [`clock`] - The injectable time source
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use libris_core::fine::{due_date_for, overdue_fine};
//! use libris_core::money::Money;
//!
//! let issued = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
//! let due = due_date_for(issued, 1).unwrap();
//!
//! // Returned 25 hours after the due date started: two chargeable days.
//! let returned = Utc.with_ymd_and_hms(2024, 3, 3, 1, 0, 0).unwrap();
//! let fine = overdue_fine(Some(due), returned, Money::from_cents(100));
//! assert_eq!(fine.cents(), 200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod fine;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default overdue fine per day, in minor currency units.
///
/// One whole currency unit per overdue day. The engine receives the rate as
/// configuration; this is only the fallback when nothing is configured.
pub const DEFAULT_FINE_PER_DAY_CENTS: i64 = 100;

/// Longest loan period accepted when issuing a book.
pub const MAX_LOAN_DAYS: i64 = 365;

/// Maximum length of a catalog search query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;
