/// Playlists API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    params::Params,
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use setlist_core::{
    NewPlaylist, NewSmartPlaylist, PlaylistId, PlaylistStorage, PlaylistSummary, PlaylistUpdate,
    PlaylistWithTracks, Track, TrackId, UserId,
};

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub id: String,
    pub name: String,
    pub comment: String,
    pub song_count: u32,
    pub owner: String,
    /// Whole seconds
    pub duration: u64,
    pub public: bool,
    pub created: DateTime<Utc>,
    pub changed: DateTime<Utc>,
    pub cover_art: String,
    pub smart: bool,
}

impl From<PlaylistSummary> for PlaylistResponse {
    fn from(summary: PlaylistSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name,
            comment: summary.comment,
            song_count: summary.song_count,
            owner: summary.owner_name,
            duration: summary.duration.as_secs(),
            public: summary.public,
            created: summary.created_at,
            changed: summary.changed_at,
            cover_art: summary.cover_art_id,
            smart: summary.smart,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongResponse {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Whole seconds
    pub duration: u64,
}

impl From<Track> for SongResponse {
    fn from(track: Track) -> Self {
        let duration = track.duration().as_secs();
        Self {
            id: track.id.to_string(),
            title: track.title,
            artist: track.artist,
            album: track.album,
            genre: track.genre,
            year: track.year,
            duration,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaylistWithSongsResponse {
    #[serde(flatten)]
    pub playlist: PlaylistResponse,
    pub entry: Vec<SongResponse>,
}

impl From<PlaylistWithTracks> for PlaylistWithSongsResponse {
    fn from(playlist: PlaylistWithTracks) -> Self {
        Self {
            playlist: playlist.summary.into(),
            entry: playlist.entries.into_iter().map(SongResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaylistsResponse {
    pub playlists: Vec<PlaylistResponse>,
}

// ============================================================================
// Request decoding
// ============================================================================

/// Decode create-or-replace parameters
///
/// An empty `name` or `playlistId` counts as absent. Having neither is
/// reported as a missing `name` before any storage work happens.
pub fn decode_create(params: &Params) -> Result<NewPlaylist> {
    let playlist_id = params
        .optional_string("playlistId")
        .filter(|id| !id.is_empty())
        .map(PlaylistId::new);
    let name = params.optional_string("name").filter(|name| !name.is_empty());

    if playlist_id.is_none() && name.is_none() {
        return Err(ServerError::missing("name"));
    }

    Ok(NewPlaylist {
        playlist_id,
        name,
        track_ids: params.strings("songId").into_iter().map(TrackId::new).collect(),
    })
}

/// Decode update parameters
///
/// Present-but-empty `name` and `comment` are kept as deliberate clears.
/// Negative removal indexes can never address an entry. They are kept as
/// out-of-range positions, so they still count as a track edit.
pub fn decode_update(params: &Params) -> Result<PlaylistUpdate> {
    let positions_to_remove = params
        .ints("songIndexToRemove")?
        .into_iter()
        .map(|index| usize::try_from(index).unwrap_or(usize::MAX))
        .collect();

    Ok(PlaylistUpdate {
        name: params.optional_string("name"),
        comment: params.optional_string("comment"),
        public: params.optional_bool("public")?,
        tracks_to_add: params
            .strings("songIdToAdd")
            .into_iter()
            .map(TrackId::new)
            .collect(),
        positions_to_remove,
    })
}

async fn playlist_with_songs(
    app_state: &AppState,
    acting: &UserId,
    id: &PlaylistId,
) -> Result<Json<PlaylistWithSongsResponse>> {
    let playlist = app_state.db.get_playlist(acting, id).await?;
    Ok(Json(playlist.into()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/playlists
/// Playlists owned by the user plus everyone's public playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistsResponse>> {
    let playlists = app_state.db.list_playlists(auth.user_id()).await?;

    Ok(Json(PlaylistsResponse {
        playlists: playlists.into_iter().map(PlaylistResponse::from).collect(),
    }))
}

/// GET /api/playlists/:id
/// Playlist details with resolved songs
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistWithSongsResponse>> {
    playlist_with_songs(&app_state, auth.user_id(), &PlaylistId::new(id)).await
}

/// POST /api/playlists?name=..&songId=..
/// POST /api/playlists?playlistId=..&songId=..
/// Create a playlist, or replace the songs of an existing one
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    params: Params,
) -> Result<Json<PlaylistWithSongsResponse>> {
    let new = decode_create(&params)?;
    let id = app_state.db.create_or_extend(auth.user_id(), new).await?;
    playlist_with_songs(&app_state, auth.user_id(), &id).await
}

/// POST /api/playlists/smart
/// Create a smart playlist from a JSON query descriptor
pub async fn create_smart_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    body: std::result::Result<Json<NewSmartPlaylist>, JsonRejection>,
) -> Result<Json<PlaylistWithSongsResponse>> {
    let Json(new) = body.map_err(|e| ServerError::invalid("body", e.body_text()))?;
    if new.name.is_empty() {
        return Err(ServerError::missing("name"));
    }

    let id = app_state.db.create_smart(auth.user_id(), new).await?;
    playlist_with_songs(&app_state, auth.user_id(), &id).await
}

/// PUT /api/playlists/:id?name=..&songIdToAdd=..&songIndexToRemove=..
/// Apply metadata and song edits in one transaction
pub async fn update_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    params: Params,
) -> Result<Json<Value>> {
    let update = decode_update(&params)?;
    app_state
        .db
        .update_playlist(auth.user_id(), &PlaylistId::new(id), update)
        .await?;
    Ok(Json(json!({})))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Value>> {
    app_state
        .db
        .delete_playlist(auth.user_id(), &PlaylistId::new(id))
        .await?;
    Ok(Json(json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    fn summary() -> PlaylistSummary {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        PlaylistSummary {
            id: PlaylistId::new("p1"),
            name: "Road Trip".to_string(),
            comment: String::new(),
            song_count: 2,
            owner_id: UserId::new("u1"),
            owner_name: "alice".to_string(),
            duration: Duration::from_millis(125_900),
            public: true,
            smart: false,
            created_at: created,
            changed_at: created,
            cover_art_id: "pl-p1_0".to_string(),
        }
    }

    #[test]
    fn summary_serializes_in_camel_case() {
        let value = serde_json::to_value(PlaylistResponse::from(summary())).unwrap();

        assert_eq!(value["songCount"], 2);
        assert_eq!(value["owner"], "alice");
        assert_eq!(value["duration"], 125);
        assert_eq!(value["coverArt"], "pl-p1_0");
        assert_eq!(value["created"], "2024-05-01T12:00:00Z");
        assert_eq!(value["public"], true);
    }

    #[test]
    fn playlist_with_songs_is_flattened() {
        let mut track = Track::new("Intro", Duration::from_secs(61));
        track.artist = Some("Band".to_string());
        let response = PlaylistWithSongsResponse::from(PlaylistWithTracks {
            summary: summary(),
            entries: vec![track],
        });

        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["name"], "Road Trip");
        assert_eq!(value["entry"][0]["title"], "Intro");
        assert_eq!(value["entry"][0]["artist"], "Band");
        assert_eq!(value["entry"][0]["duration"], 61);
        assert!(value["entry"][0].get("album").is_none());
    }

    #[test]
    fn create_needs_id_or_name() {
        let err = decode_create(&Params::from_pairs([("songId", "a")])).unwrap_err();
        assert!(matches!(err, ServerError::MissingParameter(name) if name == "name"));

        // Empty counts as absent on create
        let err = decode_create(&Params::from_pairs([("name", "")])).unwrap_err();
        assert!(matches!(err, ServerError::MissingParameter(_)));

        let new = decode_create(&Params::from_pairs([
            ("playlistId", "p1"),
            ("songId", "a"),
            ("songId", "b"),
        ]))
        .unwrap();
        assert_eq!(new.playlist_id, Some(PlaylistId::new("p1")));
        assert_eq!(new.name, None);
        assert_eq!(new.track_ids, vec![TrackId::new("a"), TrackId::new("b")]);
    }

    #[test]
    fn update_keeps_empty_values_and_negative_indexes() {
        let update = decode_update(&Params::from_pairs([
            ("comment", ""),
            ("public", "0"),
            ("songIndexToRemove", "2"),
            ("songIndexToRemove", "-1"),
            ("songIdToAdd", "x"),
        ]))
        .unwrap();

        assert_eq!(update.name, None);
        assert_eq!(update.comment, Some(String::new()));
        assert_eq!(update.public, Some(false));
        assert_eq!(update.positions_to_remove, vec![2, usize::MAX]);
        assert_eq!(update.tracks_to_add, vec![TrackId::new("x")]);

        let only_negative =
            decode_update(&Params::from_pairs([("songIndexToRemove", "-1")])).unwrap();
        assert!(only_negative.has_track_edits());
    }

    #[test]
    fn update_rejects_non_integer_index() {
        let err = decode_update(&Params::from_pairs([("songIndexToRemove", "first")])).unwrap_err();
        assert!(matches!(err, ServerError::InvalidParameter { .. }));
    }
}
