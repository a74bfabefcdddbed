//! User management and authentication queries

use crate::error::{Result, StorageError};
use setlist_core::types::{User, UserId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn user_from_row(row: &SqliteRow) -> Result<User> {
    let created_at = row.get::<i64, _>("created_at");
    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        created_at: chrono::DateTime::from_timestamp(created_at, 0)
            .ok_or_else(|| StorageError::Database(sqlx::Error::Decode("Invalid timestamp".into())))?,
    })
}

/// Create a user
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `name` - Unique display/login name
/// * `password_hash` - Hashed password (should already be hashed with bcrypt)
pub async fn create(pool: &SqlitePool, name: &str, password_hash: Option<&str>) -> Result<User> {
    let user = User::new(name);

    let result = sqlx::query(
        "INSERT INTO users (id, name, password_hash, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(password_hash)
    .bind(user.created_at.timestamp())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(StorageError::Duplicate(format!("user '{name}'")))
        }
        Err(e) => Err(e.into()),
    }
}

/// Get a user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<User> {
    let row = sqlx::query("SELECT id, name, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found("User", id.as_str()))?;

    user_from_row(&row)
}

/// Find a user by exact name
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, name, created_at FROM users WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Get user's password hash for authentication
///
/// Returns None if the user has no credentials
pub async fn get_password_hash(pool: &SqlitePool, user_id: &UserId) -> Result<Option<String>> {
    let hash = sqlx::query_scalar::<_, Option<String>>(
        "SELECT password_hash FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(hash.flatten())
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, name, created_at FROM users ORDER BY name")
        .fetch_all(pool)
        .await?;

    rows.iter().map(user_from_row).collect()
}
