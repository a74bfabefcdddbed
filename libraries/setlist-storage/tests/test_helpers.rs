//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so that migrations, WAL mode, cross-connection locking and foreign keys
//! behave exactly as in production.

use setlist_core::types::{Track, TrackId, UserId};
use setlist_storage::Database;
use sqlx::SqlitePool;
use std::time::Duration;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub db: Database,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = setlist_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        // Run migrations
        setlist_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            db: Database::from_pool(pool),
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }
}

/// Test fixture: Create a test user
pub async fn create_test_user(pool: &SqlitePool, name: &str) -> UserId {
    setlist_storage::users::create(pool, name, None)
        .await
        .expect("Failed to create test user")
        .id
}

/// Test fixture: Add a track to the catalog
pub async fn create_test_track(pool: &SqlitePool, title: &str, seconds: u64) -> TrackId {
    let track = Track::new(title, Duration::from_secs(seconds));
    insert_track(pool, &track).await;
    track.id
}

/// Test fixture: Add a fully described track to the catalog
pub async fn create_tagged_track(
    pool: &SqlitePool,
    title: &str,
    artist: &str,
    genre: &str,
    year: i32,
    seconds: u64,
) -> TrackId {
    let mut track = Track::new(title, Duration::from_secs(seconds));
    track.artist = Some(artist.to_string());
    track.genre = Some(genre.to_string());
    track.year = Some(year);
    insert_track(pool, &track).await;
    track.id
}

async fn insert_track(pool: &SqlitePool, track: &Track) {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    setlist_storage::tracks::create(&mut conn, track)
        .await
        .expect("Failed to create test track");
}

/// Test fixture: Remove a track from the catalog
pub async fn delete_test_track(pool: &SqlitePool, id: &TrackId) {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    setlist_storage::tracks::delete(&mut conn, id)
        .await
        .expect("Failed to delete test track");
}
