/// Playlist domain types
use super::ids::{PlaylistId, TrackId, UserId};
use super::smart_query::SmartQuery;
use super::track::Track;
use super::track_list::TrackList;
use crate::error::{Result, SetlistError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What backs a playlist's membership
///
/// Fixed at construction: an explicit playlist with zero tracks is still
/// explicit, and a smart playlist never carries a track list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum PlaylistKind {
    /// Materialized, ordered track references
    Explicit(TrackList),
    /// Stored query evaluated at read time
    Smart(SmartQuery),
}

/// Playlist entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Free-form comment
    pub comment: String,

    /// Owner user ID, set at creation and never changed
    pub owner_id: UserId,

    /// Owner display name, resolved on read
    pub owner_name: String,

    /// Visible to other users
    pub public: bool,

    /// Optional cover image path, empty when unset
    pub image_file: String,

    /// Membership source
    pub kind: PlaylistKind,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Create an empty explicit playlist
    pub fn new_explicit(owner_id: UserId, name: impl Into<String>) -> Self {
        Self::with_kind(owner_id, name, PlaylistKind::Explicit(TrackList::new()))
    }

    /// Create a smart playlist
    pub fn new_smart(owner_id: UserId, name: impl Into<String>, query: SmartQuery) -> Self {
        Self::with_kind(owner_id, name, PlaylistKind::Smart(query))
    }

    fn with_kind(owner_id: UserId, name: impl Into<String>, kind: PlaylistKind) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            comment: String::new(),
            owner_id,
            owner_name: String::new(),
            public: false,
            image_file: String::new(),
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether membership is computed from a query
    pub fn is_smart(&self) -> bool {
        matches!(self.kind, PlaylistKind::Smart(_))
    }

    /// The track list of an explicit playlist
    pub fn track_list(&self) -> Option<&TrackList> {
        match &self.kind {
            PlaylistKind::Explicit(tracks) => Some(tracks),
            PlaylistKind::Smart(_) => None,
        }
    }

    /// The query of a smart playlist
    pub fn smart_query(&self) -> Option<&SmartQuery> {
        match &self.kind {
            PlaylistKind::Explicit(_) => None,
            PlaylistKind::Smart(query) => Some(query),
        }
    }

    /// Whether `user_id` owns this playlist
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    /// Fail with `NotAuthorized` unless `user_id` owns this playlist
    pub fn ensure_owner(&self, user_id: &UserId) -> Result<()> {
        if self.is_owned_by(user_id) {
            Ok(())
        } else {
            Err(SetlistError::NotAuthorized)
        }
    }

    /// Discard the current track list and replace it with `ids`
    pub fn replace_tracks(&mut self, ids: Vec<TrackId>) -> Result<()> {
        let tracks = self.explicit_tracks_mut()?;
        tracks.clear();
        tracks.append(ids);
        Ok(())
    }

    /// Apply an update in place
    ///
    /// Removals are evaluated against the list as it was before this call and
    /// run before appends, so a removal position never hits a track added by
    /// the same update. On error the playlist is left untouched.
    pub fn apply_update(&mut self, update: &PlaylistUpdate) -> Result<()> {
        if update.has_track_edits() {
            let tracks = self.explicit_tracks_mut()?;
            tracks.remove_at(&update.positions_to_remove);
            tracks.append(update.tracks_to_add.iter().cloned());
        }

        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(comment) = &update.comment {
            self.comment.clone_from(comment);
        }
        if let Some(public) = update.public {
            self.public = public;
        }

        Ok(())
    }

    fn explicit_tracks_mut(&mut self) -> Result<&mut TrackList> {
        match &mut self.kind {
            PlaylistKind::Explicit(tracks) => Ok(tracks),
            PlaylistKind::Smart(_) => Err(SetlistError::invalid_operation(
                "smart playlists have no editable track list",
            )),
        }
    }
}

/// Data for creating a playlist, or replacing the contents of an existing one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPlaylist {
    /// Existing playlist whose tracks are replaced
    pub playlist_id: Option<PlaylistId>,

    /// Name for a new playlist
    pub name: Option<String>,

    /// Tracks to place in the playlist, in order
    pub track_ids: Vec<TrackId>,
}

/// Data for creating a smart playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSmartPlaylist {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub public: bool,
    pub query: SmartQuery,
}

/// A coherent set of edits to one playlist
///
/// Each metadata field is tri-state: `None` leaves the value alone, while
/// `Some` sets it even when empty, so `Some(String::new())` clears a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistUpdate {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub public: Option<bool>,
    pub tracks_to_add: Vec<TrackId>,
    /// Positions in the list as it is before the update
    pub positions_to_remove: Vec<usize>,
}

impl PlaylistUpdate {
    /// Whether the update touches the track list
    pub fn has_track_edits(&self) -> bool {
        !self.tracks_to_add.is_empty() || !self.positions_to_remove.is_empty()
    }
}

/// Track count and total length of a playlist's current content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistStats {
    pub song_count: u32,
    pub duration: Duration,
}

impl PlaylistStats {
    /// Stats over an already resolved list of tracks
    pub fn from_tracks(tracks: &[Track]) -> Self {
        Self {
            song_count: tracks.len() as u32,
            duration: tracks.iter().map(Track::duration).sum(),
        }
    }
}

/// Read-side view of a playlist without its contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: PlaylistId,
    pub name: String,
    pub comment: String,
    pub song_count: u32,
    pub owner_id: UserId,
    pub owner_name: String,
    pub duration: Duration,
    pub public: bool,
    pub smart: bool,
    pub created_at: DateTime<Utc>,
    pub changed_at: DateTime<Utc>,
    pub cover_art_id: String,
}

/// Summary plus the resolved tracks, in presentation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistWithTracks {
    pub summary: PlaylistSummary,
    pub entries: Vec<Track>,
}

/// Build the read-side summary of a playlist
///
/// `now` becomes the change time of smart playlists, whose content is
/// re-evaluated on every read.
pub fn summarize(playlist: &Playlist, stats: PlaylistStats, now: DateTime<Utc>) -> PlaylistSummary {
    let changed_at = if playlist.is_smart() {
        now
    } else {
        playlist.updated_at
    };

    PlaylistSummary {
        id: playlist.id.clone(),
        name: playlist.name.clone(),
        comment: playlist.comment.clone(),
        song_count: stats.song_count,
        owner_id: playlist.owner_id.clone(),
        owner_name: playlist.owner_name.clone(),
        duration: stats.duration,
        public: playlist.public,
        smart: playlist.is_smart(),
        created_at: playlist.created_at,
        changed_at,
        cover_art_id: cover_art_id(playlist),
    }
}

/// Cover art key that changes whenever the playlist does
fn cover_art_id(playlist: &Playlist) -> String {
    format!("pl-{}_{:x}", playlist.id, playlist.updated_at.timestamp())
}
