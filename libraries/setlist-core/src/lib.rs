//! Setlist Core
//!
//! Platform-agnostic domain types, traits, and error handling for Setlist.
//!
//! This crate holds everything about playlists that does not touch a database:
//! the ordered track reference list, the smart playlist query descriptor, the
//! playlist entity itself, and the read models handed to the HTTP layer.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Playlist`, `TrackList`, `SmartQuery`, `Track`, `User`
//! - **Read Models**: `PlaylistSummary`, `PlaylistWithTracks`
//! - **Storage Seam**: the `PlaylistStorage` trait
//! - **Error Handling**: Unified `SetlistError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use setlist_core::types::{Playlist, PlaylistUpdate, TrackId, UserId};
//!
//! let owner = UserId::new("alice");
//! let mut playlist = Playlist::new_explicit(owner, "Road Trip");
//!
//! let update = PlaylistUpdate {
//!     tracks_to_add: vec![TrackId::new("a"), TrackId::new("b"), TrackId::new("c")],
//!     ..PlaylistUpdate::default()
//! };
//! playlist.apply_update(&update).unwrap();
//! assert_eq!(playlist.track_list().map(|t| t.len()), Some(3));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SetlistError};
pub use storage::PlaylistStorage;

pub use types::{
    summarize, MatchMode, NewPlaylist, NewSmartPlaylist, Playlist, PlaylistId, PlaylistKind,
    PlaylistStats, PlaylistSummary, PlaylistUpdate, PlaylistWithTracks, RuleField, RuleOperator,
    RuleValue, SmartQuery, SmartRule, SortDirection, SortOrder, Track, TrackId, TrackList, User,
    UserId,
};
