//! Setlist Storage
//!
//! Multi-user `SQLite` database layer for Setlist.
//!
//! This crate persists users, the track catalog, and playlists, and hosts the
//! playlist mutation engine and materializer.
//!
//! # Architecture
//!
//! - **Multi-User**: every playlist has exactly one owner; only the owner may change it
//! - **Vertical Slicing**: each feature owns its own queries and logic
//! - **Transaction-Scoped Mutation**: each create/update/delete runs in one transaction
//!
//! # Example
//!
//! ```rust,no_run
//! use setlist_storage::{create_pool, run_migrations, Database};
//! use setlist_core::{PlaylistStorage, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://setlist.db").await?;
//! run_migrations(&pool).await?;
//!
//! let db = Database::from_pool(pool);
//! let playlists = db.list_playlists(&UserId::new("alice")).await?;
//! # Ok(())
//! # }
//! ```

mod database;
mod error;

// Vertical slices
pub mod playlists;
pub mod tracks;
pub mod users;

pub use database::Database;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Default pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default wait for the `SQLite` write lock
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Revert applied migrations newer than `target_version`
///
/// Runs the down scripts in reverse order. A target of `0` reverts everything.
///
/// # Errors
///
/// Returns an error if any down script fails
pub async fn revert_migrations(pool: &SqlitePool, target_version: i64) -> Result<(), StorageError> {
    tracing::info!(target_version, "Reverting migrations");
    MIGRATOR.undo(pool, target_version).await?;
    Ok(())
}

/// Create a new `SQLite` pool with default settings
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://setlist.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    create_pool_with(database_url, DEFAULT_MAX_CONNECTIONS, DEFAULT_BUSY_TIMEOUT).await
}

/// Create a new `SQLite` pool
///
/// `busy_timeout` bounds how long a transaction waits for another writer
/// before failing.
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool_with(
    database_url: &str,
    max_connections: u32,
    busy_timeout: Duration,
) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::debug!(max_connections, "SQLite pool created");

    Ok(pool)
}

/// Convert stored unix seconds back into a timestamp
pub(crate) fn from_unix(secs: i64) -> setlist_core::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| setlist_core::SetlistError::storage("Invalid timestamp"))
}
