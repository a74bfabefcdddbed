//! Playlist mutation engine
//!
//! Each operation opens one transaction, runs its steps on that transaction's
//! connection and then commits or rolls back based on the outcome. Nothing is
//! written outside that boundary, and dropping the future mid-flight drops the
//! transaction, which rolls it back.
//!
//! The `apply_*` steps take the connection instead of the pool. Callers that
//! own a transaction can run several of them inside it and decide themselves
//! whether to commit. They must be given a transaction's connection: on a bare
//! connection every statement commits on its own.

use super::StoredPlaylist;
use setlist_core::{
    error::{Result, SetlistError},
    types::{NewPlaylist, NewSmartPlaylist, Playlist, PlaylistId, PlaylistUpdate, UserId},
};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

/// Commit on success, roll back on failure
async fn finish<T>(tx: Transaction<'_, Sqlite>, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Failed to roll back playlist transaction");
            }
            Err(err)
        }
    }
}

/// Lock and load a playlist, then check that `acting` owns it
async fn load_owned(
    conn: &mut SqliteConnection,
    acting: &UserId,
    id: &PlaylistId,
) -> Result<Playlist> {
    if !super::lock(conn, id).await? {
        return Err(SetlistError::not_found("Playlist", id.as_str()));
    }

    let StoredPlaylist { playlist, .. } = super::get(conn, id)
        .await?
        .ok_or_else(|| SetlistError::not_found("Playlist", id.as_str()))?;

    if let Err(err) = playlist.ensure_owner(acting) {
        tracing::warn!(
            playlist_id = %id,
            user_id = %acting,
            owner_id = %playlist.owner_id,
            "Rejected playlist change by non-owner"
        );
        return Err(err);
    }

    Ok(playlist)
}

/// Create a playlist, or replace the tracks of an existing one
///
/// With `playlist_id` set the existing list is discarded and replaced by
/// `track_ids`; the name is left as it is. Without it a new playlist owned by
/// `acting` is created, which requires a non-empty name.
pub async fn create_or_extend(
    pool: &SqlitePool,
    acting: &UserId,
    new: NewPlaylist,
) -> Result<PlaylistId> {
    let mut tx = pool.begin().await?;
    let outcome = apply_create_or_extend(&mut tx, acting, new).await;
    finish(tx, outcome).await
}

/// [`create_or_extend`] on a caller-owned transaction
pub async fn apply_create_or_extend(
    conn: &mut SqliteConnection,
    acting: &UserId,
    new: NewPlaylist,
) -> Result<PlaylistId> {
    let mut playlist = match new.playlist_id {
        Some(id) => {
            let playlist = load_owned(conn, acting, &id).await?;
            tracing::debug!(
                playlist_id = %id,
                tracks = new.track_ids.len(),
                "Replacing playlist tracks"
            );
            playlist
        }
        None => {
            let name = new
                .name
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    SetlistError::invalid_operation("a playlist ID or a name is required")
                })?;
            tracing::debug!(name = %name, tracks = new.track_ids.len(), "Creating playlist");
            Playlist::new_explicit(acting.clone(), name)
        }
    };

    playlist.replace_tracks(new.track_ids)?;
    super::put(conn, &mut playlist).await?;

    Ok(playlist.id)
}

/// Create a smart playlist owned by `acting`
pub async fn create_smart(
    pool: &SqlitePool,
    acting: &UserId,
    new: NewSmartPlaylist,
) -> Result<PlaylistId> {
    // Rejected before a transaction is opened
    new.query.validate()?;

    let mut tx = pool.begin().await?;
    let outcome = apply_create_smart(&mut tx, acting, new).await;
    finish(tx, outcome).await
}

/// [`create_smart`] on a caller-owned transaction
pub async fn apply_create_smart(
    conn: &mut SqliteConnection,
    acting: &UserId,
    new: NewSmartPlaylist,
) -> Result<PlaylistId> {
    new.query.validate()?;

    let mut playlist = Playlist::new_smart(acting.clone(), new.name, new.query);
    playlist.comment = new.comment;
    playlist.public = new.public;

    tracing::debug!(
        name = %playlist.name,
        rules = playlist.smart_query().map_or(0, |query| query.rules.len()),
        "Creating smart playlist"
    );

    super::put(conn, &mut playlist).await?;

    Ok(playlist.id)
}

/// Apply a set of edits to a playlist
///
/// Removal positions refer to the track list as it was before this call, and
/// removals run before appends. Track edits on a smart playlist fail with
/// `InvalidOperation`. Any failure leaves the stored playlist untouched.
pub async fn update(
    pool: &SqlitePool,
    acting: &UserId,
    id: &PlaylistId,
    update: PlaylistUpdate,
) -> Result<()> {
    let mut tx = pool.begin().await?;
    let outcome = apply_update(&mut tx, acting, id, &update).await;
    finish(tx, outcome).await
}

/// [`update`] on a caller-owned transaction
pub async fn apply_update(
    conn: &mut SqliteConnection,
    acting: &UserId,
    id: &PlaylistId,
    update: &PlaylistUpdate,
) -> Result<()> {
    let mut playlist = load_owned(conn, acting, id).await?;

    if let Some(name) = &update.name {
        tracing::debug!(playlist_id = %id, name = %name, "Renaming playlist");
    }
    if !update.positions_to_remove.is_empty() {
        tracing::debug!(
            playlist_id = %id,
            positions = ?update.positions_to_remove,
            "Removing tracks from playlist"
        );
    }
    if !update.tracks_to_add.is_empty() {
        tracing::debug!(
            playlist_id = %id,
            count = update.tracks_to_add.len(),
            "Adding tracks to playlist"
        );
    }

    playlist.apply_update(update)?;
    super::put(conn, &mut playlist).await
}

/// Delete a playlist owned by `acting`
pub async fn delete(pool: &SqlitePool, acting: &UserId, id: &PlaylistId) -> Result<()> {
    let mut tx = pool.begin().await?;
    let outcome = apply_delete(&mut tx, acting, id).await;
    finish(tx, outcome).await
}

/// [`delete`] on a caller-owned transaction
pub async fn apply_delete(
    conn: &mut SqliteConnection,
    acting: &UserId,
    id: &PlaylistId,
) -> Result<()> {
    load_owned(conn, acting, id).await?;
    tracing::debug!(playlist_id = %id, "Deleting playlist");

    if super::delete(conn, id).await? {
        Ok(())
    } else {
        Err(SetlistError::not_found("Playlist", id.as_str()))
    }
}
