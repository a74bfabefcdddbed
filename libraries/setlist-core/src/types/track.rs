/// Catalog track type
use super::ids::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A track as resolved from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Genre
    pub genre: Option<String>,

    /// Release year
    pub year: Option<i32>,

    /// Track duration in milliseconds
    pub duration_ms: u64,

    /// When the track was added to the catalog
    pub created_at: DateTime<Utc>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(title: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: TrackId::generate(),
            title: title.into(),
            artist: None,
            album: None,
            genre: None,
            year: None,
            duration_ms: duration.as_millis() as u64,
            created_at: Utc::now(),
        }
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
