//! Migration tests
//!
//! Verifies the schema comes up cleanly and that reversible migrations
//! really undo what they add.

mod test_helpers;

use test_helpers::*;

async fn playlist_columns(pool: &sqlx::SqlitePool) -> Vec<String> {
    sqlx::query_scalar("SELECT name FROM pragma_table_info('playlists') ORDER BY cid")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_migrations_add_image_file_column() {
    let test_db = TestDb::new().await;

    let columns = playlist_columns(test_db.pool()).await;
    assert!(columns.iter().any(|c| c == "image_file"));
}

#[tokio::test]
async fn test_image_file_defaults_to_empty() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    sqlx::query(
        "INSERT INTO playlists (id, name, owner_id, created_at, updated_at) VALUES ('p', 'p', ?, 0, 0)",
    )
    .bind(&alice)
    .execute(pool)
    .await
    .unwrap();

    let image_file: String = sqlx::query_scalar("SELECT image_file FROM playlists WHERE id = 'p'")
        .fetch_one(pool)
        .await
        .unwrap();
    assert_eq!(image_file, "");
}

#[tokio::test]
async fn test_revert_drops_image_file_column() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    setlist_storage::revert_migrations(pool, 20_250_105_000_003)
        .await
        .expect("Failed to revert migrations");

    let columns = playlist_columns(pool).await;
    assert!(!columns.iter().any(|c| c == "image_file"));
    assert!(columns.iter().any(|c| c == "rules"));

    // And forward again
    setlist_storage::run_migrations(pool)
        .await
        .expect("Failed to re-apply migrations");
    let columns = playlist_columns(pool).await;
    assert!(columns.iter().any(|c| c == "image_file"));
}
