//! Storage trait for playlist persistence

use crate::error::Result;
use crate::types::{
    NewPlaylist, NewSmartPlaylist, PlaylistId, PlaylistSummary, PlaylistUpdate,
    PlaylistWithTracks, UserId,
};
use async_trait::async_trait;

/// Datastore seam between request handlers and the persistent store
///
/// Every call takes the acting user explicitly. Implementations run each
/// mutation inside a single transaction: either all of its effects become
/// visible or none do.
#[async_trait]
pub trait PlaylistStorage: Send + Sync {
    // ========================================================================
    // Read side
    // ========================================================================

    /// Summaries of playlists visible to `acting` (owned or public), by name
    async fn list_playlists(&self, acting: &UserId) -> Result<Vec<PlaylistSummary>>;

    /// Summary plus resolved tracks
    ///
    /// Private playlists of other users are reported as not found.
    async fn get_playlist(&self, acting: &UserId, id: &PlaylistId) -> Result<PlaylistWithTracks>;

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a playlist, or replace the tracks of an existing one
    async fn create_or_extend(&self, acting: &UserId, playlist: NewPlaylist) -> Result<PlaylistId>;

    /// Create a smart playlist
    async fn create_smart(&self, acting: &UserId, playlist: NewSmartPlaylist)
        -> Result<PlaylistId>;

    /// Apply metadata and track edits to a playlist owned by `acting`
    async fn update_playlist(
        &self,
        acting: &UserId,
        id: &PlaylistId,
        update: PlaylistUpdate,
    ) -> Result<()>;

    /// Delete a playlist owned by `acting`
    async fn delete_playlist(&self, acting: &UserId, id: &PlaylistId) -> Result<()>;
}
