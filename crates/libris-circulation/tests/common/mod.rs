//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use libris_circulation::{Library, LibraryConfig};
use libris_core::{Book, ManualClock, Member, NewBook, NewMember};

pub struct TestLibrary {
    pub library: Library,
    pub clock: Arc<ManualClock>,
}

/// 2024-03-01 10:00 UTC.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

pub async fn library() -> TestLibrary {
    library_with(LibraryConfig::in_memory()).await
}

pub async fn library_with(config: LibraryConfig) -> TestLibrary {
    libris_circulation::telemetry::init_tracing();

    let clock = Arc::new(ManualClock::new(start()));
    let library = Library::open_with_clock(&config, clock.clone()).await.unwrap();

    TestLibrary { library, clock }
}

/// A library on a fresh SQLite file under the temp dir, with a real pool.
///
/// Returns the directory holding the file so the test can remove it.
pub async fn file_library(name: &str, max_connections: u32) -> (TestLibrary, PathBuf) {
    let dir = std::env::temp_dir().join(format!(
        "libris-{name}-{}-{}",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));

    let mut config = LibraryConfig::default();
    config.database.path = dir.join("libris.db");
    config.database.max_connections = max_connections;

    (library_with(config).await, dir)
}

impl TestLibrary {
    pub async fn book(&self, title: &str, copies: i64) -> Book {
        self.library
            .create_book(&NewBook::new(title, "Test Author", copies))
            .await
            .unwrap()
    }

    pub async fn member(&self, name: &str) -> Member {
        self.library.create_member(&NewMember::new(name)).await.unwrap()
    }

    pub async fn available(&self, book_id: i64) -> i64 {
        self.library.get_book(book_id).await.unwrap().available
    }
}
