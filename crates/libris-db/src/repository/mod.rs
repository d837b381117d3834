//! # Repository Module
//!
//! Database repository implementations for Libris.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories and their tables                        │
//! │                                                                         │
//! │  BookRepository    ──► books     create / get / list / search          │
//! │                                  update / delete                        │
//! │                                  change_availability (CAS)             │
//! │                                  reconcile_availability                │
//! │                                                                         │
//! │  MemberRepository  ──► members   create / get / list / update / delete │
//! │                                                                         │
//! │  IssueRepository   ──► issues    create / get / by member              │
//! │                                  active by (book, member)              │
//! │                                  mark_returned (CAS)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories hold no state beyond a pool handle and never enforce
//! circulation rules; the conditional statements only report whether they
//! applied and leave the decision to the caller.
//!
//! ## Available Repositories
//!
//! - [`BookRepository`](book::BookRepository) - Catalog and copy counts
//! - [`MemberRepository`](member::MemberRepository) - Membership roll
//! - [`IssueRepository`](issue::IssueRepository) - Circulation ledger

pub mod book;
pub mod issue;
pub mod member;
