//! Tracing bootstrap.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,libris=debug,sqlx=warn";

/// Installs the global `tracing` subscriber.
///
/// ## Log Levels
/// - ERROR: compensation failures, availability not restored
/// - WARN: repaired availability, released copies
/// - INFO: books issued and returned, pool and migrations
/// - DEBUG: refusals, repository statements
///
/// Returns `false` if a subscriber was already installed (tests call this
/// more than once).
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
