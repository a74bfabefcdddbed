//! Playlist materializer
//!
//! Turns stored playlists into the read models handed to clients. Explicit
//! playlists resolve their references against the catalog; smart playlists
//! are evaluated against the catalog as it is right now.

use super::StoredPlaylist;
use crate::tracks;
use chrono::Utc;
use setlist_core::{
    error::{Result, SetlistError},
    types::{
        summarize, PlaylistId, PlaylistKind, PlaylistStats, PlaylistSummary, PlaylistWithTracks,
        UserId,
    },
};
use sqlx::SqlitePool;

/// Summaries of every playlist visible to `acting`, sorted by name
pub async fn list(pool: &SqlitePool, acting: &UserId) -> Result<Vec<PlaylistSummary>> {
    let mut conn = pool.acquire().await?;
    let stored = super::get_all_visible(&mut conn, acting).await?;
    let now = Utc::now();

    let mut summaries = Vec::with_capacity(stored.len());
    for StoredPlaylist { playlist, stats } in stored {
        let stats = match &playlist.kind {
            PlaylistKind::Explicit(_) => stats,
            PlaylistKind::Smart(query) => tracks::smart_stats(&mut conn, query).await?,
        };
        summaries.push(summarize(&playlist, stats, now));
    }

    Ok(summaries)
}

/// A playlist summary plus its tracks in presentation order
///
/// Explicit entries whose track has left the catalog are omitted; duplicates
/// are kept. A private playlist owned by someone else is reported as not
/// found so its existence is not disclosed.
pub async fn get_with_tracks(
    pool: &SqlitePool,
    acting: &UserId,
    id: &PlaylistId,
) -> Result<PlaylistWithTracks> {
    // One read transaction so the row, its entries and the catalog agree
    let mut tx = pool.begin().await?;

    let StoredPlaylist { playlist, stats } = super::get(&mut tx, id)
        .await?
        .filter(|stored| stored.playlist.public || stored.playlist.is_owned_by(acting))
        .ok_or_else(|| SetlistError::not_found("Playlist", id.as_str()))?;

    let (entries, stats) = match &playlist.kind {
        PlaylistKind::Explicit(list) => {
            let catalog = tracks::get_by_ids(&mut tx, list.as_slice()).await?;
            let entries = list
                .iter()
                .filter_map(|track_id| catalog.get(track_id).cloned())
                .collect::<Vec<_>>();
            (entries, stats)
        }
        PlaylistKind::Smart(query) => {
            let entries = tracks::evaluate(&mut tx, query).await?;
            let stats = PlaylistStats::from_tracks(&entries);
            (entries, stats)
        }
    };

    tx.commit().await?;

    Ok(PlaylistWithTracks {
        summary: summarize(&playlist, stats, Utc::now()),
        entries,
    })
}
