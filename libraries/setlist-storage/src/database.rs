/// Database implementation
use crate::error::Result;
use crate::playlists::{materialize, mutation};
use async_trait::async_trait;
use setlist_core::{
    NewPlaylist, NewSmartPlaylist, PlaylistId, PlaylistStorage, PlaylistSummary, PlaylistUpdate,
    PlaylistWithTracks, UserId,
};
use sqlx::sqlite::SqlitePool;

/// `SQLite` database with multi-user support
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) a database and bring its schema up to date
    ///
    /// # Errors
    /// Returns an error if the connection fails or migrations fail
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = crate::create_pool(database_url).await?;
        crate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Create database from an existing, already migrated pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PlaylistStorage for Database {
    async fn list_playlists(&self, acting: &UserId) -> setlist_core::Result<Vec<PlaylistSummary>> {
        materialize::list(&self.pool, acting).await
    }

    async fn get_playlist(
        &self,
        acting: &UserId,
        id: &PlaylistId,
    ) -> setlist_core::Result<PlaylistWithTracks> {
        materialize::get_with_tracks(&self.pool, acting, id).await
    }

    async fn create_or_extend(
        &self,
        acting: &UserId,
        playlist: NewPlaylist,
    ) -> setlist_core::Result<PlaylistId> {
        mutation::create_or_extend(&self.pool, acting, playlist).await
    }

    async fn create_smart(
        &self,
        acting: &UserId,
        playlist: NewSmartPlaylist,
    ) -> setlist_core::Result<PlaylistId> {
        mutation::create_smart(&self.pool, acting, playlist).await
    }

    async fn update_playlist(
        &self,
        acting: &UserId,
        id: &PlaylistId,
        update: PlaylistUpdate,
    ) -> setlist_core::Result<()> {
        mutation::update(&self.pool, acting, id, update).await
    }

    async fn delete_playlist(&self, acting: &UserId, id: &PlaylistId) -> setlist_core::Result<()> {
        mutation::delete(&self.pool, acting, id).await
    }
}
