mod ids;
mod playlist;
mod smart_query;
mod track;
mod track_list;
mod user;

pub use ids::{PlaylistId, TrackId, UserId};
pub use playlist::{
    summarize, NewPlaylist, NewSmartPlaylist, Playlist, PlaylistKind, PlaylistStats,
    PlaylistSummary, PlaylistUpdate, PlaylistWithTracks,
};
pub use smart_query::{
    MatchMode, RuleField, RuleOperator, RuleValue, SmartQuery, SmartRule, SortDirection,
    SortOrder,
};
pub use track::Track;
pub use track_list::TrackList;
pub use user::User;
