//! Playlist persistence
//!
//! The row-level queries here all run on a caller-supplied connection, so the
//! mutation engine can compose them inside a single transaction.

pub mod materialize;
pub mod mutation;

use crate::from_unix;
use chrono::{SubsecRound, Utc};
use setlist_core::{
    error::Result,
    types::{Playlist, PlaylistId, PlaylistKind, PlaylistStats, TrackId, TrackList, UserId},
};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection};
use std::time::Duration;

/// Rows per multi-row insert; three bound parameters each
const INSERT_CHUNK: usize = 300;

const PLAYLIST_COLUMNS: &str = r#"
    SELECT p.id, p.name, p.comment, p.owner_id, COALESCE(u.name, '') AS owner_name,
           p.public, p.image_file, p.rules, p.song_count, p.duration_ms,
           p.created_at, p.updated_at
    FROM playlists p
    LEFT JOIN users u ON u.id = p.owner_id
"#;

/// A playlist as persisted, with its cached aggregates
///
/// The aggregates are only meaningful for explicit playlists; a smart
/// playlist's stats depend on the catalog at read time.
#[derive(Debug, Clone)]
pub struct StoredPlaylist {
    pub playlist: Playlist,
    pub stats: PlaylistStats,
}

fn stored_from_row(row: &SqliteRow, tracks: Vec<TrackId>) -> Result<StoredPlaylist> {
    let kind = match row.get::<Option<String>, _>("rules") {
        Some(rules) => PlaylistKind::Smart(serde_json::from_str(&rules)?),
        None => PlaylistKind::Explicit(TrackList::from(tracks)),
    };

    let playlist = Playlist {
        id: row.get("id"),
        name: row.get("name"),
        comment: row.get("comment"),
        owner_id: row.get("owner_id"),
        owner_name: row.get("owner_name"),
        public: row.get::<i64, _>("public") != 0,
        image_file: row.get("image_file"),
        kind,
        created_at: from_unix(row.get("created_at"))?,
        updated_at: from_unix(row.get("updated_at"))?,
    };

    let stats = PlaylistStats {
        song_count: row.get::<i64, _>("song_count").max(0) as u32,
        duration: Duration::from_millis(row.get::<i64, _>("duration_ms").max(0) as u64),
    };

    Ok(StoredPlaylist { playlist, stats })
}

/// Take the database write lock on behalf of `id`
///
/// Must be the first statement of a mutating transaction. `SQLite` allows a
/// single writer, so the transaction holds the lock until it ends and any
/// concurrent mutation waits here (bounded by the busy timeout) instead of
/// failing on a stale snapshot later.
///
/// Returns `false` when the playlist does not exist.
pub async fn lock(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<bool> {
    let result = sqlx::query("UPDATE playlists SET updated_at = updated_at WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load a playlist by ID, regardless of who owns it
pub async fn get(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<Option<StoredPlaylist>> {
    let mut builder = QueryBuilder::<Sqlite>::new(PLAYLIST_COLUMNS);
    builder.push(" WHERE p.id = ");
    builder.push_bind(id.clone());

    let Some(row) = builder.build().fetch_optional(&mut *conn).await? else {
        return Ok(None);
    };

    let tracks = if row.get::<Option<String>, _>("rules").is_none() {
        track_ids(conn, id).await?
    } else {
        Vec::new()
    };

    stored_from_row(&row, tracks).map(Some)
}

/// All playlists `user_id` may see: their own plus everyone's public ones
///
/// Only the rows are read. Explicit playlists come back with an empty track
/// list and their cached aggregates in `stats`; use [`get`] for the entries.
pub async fn get_all_visible(
    conn: &mut SqliteConnection,
    user_id: &UserId,
) -> Result<Vec<StoredPlaylist>> {
    let mut builder = QueryBuilder::<Sqlite>::new(PLAYLIST_COLUMNS);
    builder.push(" WHERE p.owner_id = ");
    builder.push_bind(user_id.clone());
    builder.push(" OR p.public = 1 ORDER BY p.name, p.id");
    let rows = builder.build().fetch_all(&mut *conn).await?;

    rows.iter()
        .map(|row| stored_from_row(row, Vec::new()))
        .collect()
}

async fn track_ids(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<Vec<TrackId>> {
    let ids = sqlx::query_scalar::<_, TrackId>(
        "SELECT track_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY position",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ids)
}

/// Insert or overwrite a playlist
///
/// Stamps `updated_at`, rewrites the track list with contiguous positions
/// `0..n` and refreshes the cached count and duration. `owner_id` and
/// `created_at` are never changed once the row exists.
pub async fn put(conn: &mut SqliteConnection, playlist: &mut Playlist) -> Result<()> {
    playlist.created_at = playlist.created_at.trunc_subsecs(0);
    playlist.updated_at = Utc::now().trunc_subsecs(0);

    let rules = playlist
        .smart_query()
        .map(serde_json::to_string)
        .transpose()?;

    sqlx::query(
        r#"
        INSERT INTO playlists
            (id, name, comment, owner_id, public, image_file, rules, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            comment = excluded.comment,
            public = excluded.public,
            image_file = excluded.image_file,
            rules = excluded.rules,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&playlist.id)
    .bind(&playlist.name)
    .bind(&playlist.comment)
    .bind(&playlist.owner_id)
    .bind(i64::from(playlist.public))
    .bind(&playlist.image_file)
    .bind(rules)
    .bind(playlist.created_at.timestamp())
    .bind(playlist.updated_at.timestamp())
    .execute(&mut *conn)
    .await?;

    let Some(tracks) = playlist.track_list() else {
        return Ok(());
    };

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ?")
        .bind(&playlist.id)
        .execute(&mut *conn)
        .await?;

    for (chunk_index, chunk) in tracks.as_slice().chunks(INSERT_CHUNK).enumerate() {
        let offset = chunk_index * INSERT_CHUNK;
        let mut builder = QueryBuilder::<Sqlite>::new(
            "INSERT INTO playlist_tracks (playlist_id, position, track_id) ",
        );
        builder.push_values(chunk.iter().enumerate(), |mut row, (i, track_id)| {
            row.push_bind(playlist.id.clone())
                .push_bind((offset + i) as i64)
                .push_bind(track_id.clone());
        });
        builder.build().execute(&mut *conn).await?;
    }

    // Missing catalog tracks still count as entries but add no duration
    sqlx::query(
        r#"
        UPDATE playlists SET
            song_count = (SELECT COUNT(*) FROM playlist_tracks WHERE playlist_id = ?),
            duration_ms = (
                SELECT COALESCE(SUM(t.duration_ms), 0)
                FROM playlist_tracks pt
                INNER JOIN tracks t ON t.id = pt.track_id
                WHERE pt.playlist_id = ?
            )
        WHERE id = ?
        "#,
    )
    .bind(&playlist.id)
    .bind(&playlist.id)
    .bind(&playlist.id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Delete a playlist and its entries
///
/// Returns `false` when nothing was deleted.
pub async fn delete(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<bool> {
    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
