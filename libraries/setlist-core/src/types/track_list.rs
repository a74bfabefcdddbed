//! Ordered track reference list
//!
//! The materialized content of an explicit playlist: an ordered sequence of
//! track IDs where position (0-indexed) is play order and the same track may
//! appear more than once.

use super::ids::TrackId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, position-addressable list of track references
///
/// Positions are always contiguous: every mutation leaves the list as a plain
/// `0..len` sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackList(Vec<TrackId>);

impl TrackList {
    /// Create an empty list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append tracks to the tail in the given order
    ///
    /// IDs are not checked against the catalog.
    pub fn append<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = TrackId>,
    {
        self.0.extend(ids);
    }

    /// Remove every element whose current position is in `positions`
    ///
    /// All positions refer to the list as it is *before* this call, so the
    /// order in which they are given does not matter and removing one never
    /// shifts the target of another. Out-of-range and repeated positions are
    /// ignored. Returns the number of elements removed.
    pub fn remove_at(&mut self, positions: &[usize]) -> usize {
        let len = self.0.len();
        let doomed: HashSet<usize> = positions.iter().copied().filter(|&p| p < len).collect();
        if doomed.is_empty() {
            return 0;
        }

        let mut position = 0;
        self.0.retain(|_| {
            let keep = !doomed.contains(&position);
            position += 1;
            keep
        });

        len - self.0.len()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of entries (duplicates counted)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entry at `position`, if any
    pub fn get(&self, position: usize) -> Option<&TrackId> {
        self.0.get(position)
    }

    /// Iterate entries in play order
    pub fn iter(&self) -> std::slice::Iter<'_, TrackId> {
        self.0.iter()
    }

    /// Entries in play order
    pub fn as_slice(&self) -> &[TrackId] {
        &self.0
    }
}

impl From<Vec<TrackId>> for TrackList {
    fn from(ids: Vec<TrackId>) -> Self {
        Self(ids)
    }
}

impl FromIterator<TrackId> for TrackList {
    fn from_iter<I: IntoIterator<Item = TrackId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TrackList {
    type Item = &'a TrackId;
    type IntoIter = std::slice::Iter<'a, TrackId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[&str]) -> TrackList {
        ids.iter().map(|id| TrackId::new(*id)).collect()
    }

    fn ids(list: &TrackList) -> Vec<&str> {
        list.iter().map(TrackId::as_str).collect()
    }

    #[test]
    fn append_keeps_order_and_duplicates() {
        let mut tracks = list(&["a"]);
        tracks.append(vec![TrackId::new("b"), TrackId::new("a")]);
        assert_eq!(ids(&tracks), vec!["a", "b", "a"]);
    }

    #[test]
    fn append_empty_is_noop() {
        let mut tracks = list(&["a", "b"]);
        tracks.append(Vec::new());
        assert_eq!(tracks.len(), 2);
    }

    #[test]
    fn remove_at_uses_snapshot_positions() {
        // Sequential removal with re-indexing would drop "a", "c", "e" here
        let mut tracks = list(&["a", "b", "c", "d", "e"]);
        let removed = tracks.remove_at(&[0, 1, 2]);
        assert_eq!(removed, 3);
        assert_eq!(ids(&tracks), vec!["d", "e"]);
    }

    #[test]
    fn remove_at_is_order_independent() {
        let mut forward = list(&["a", "b", "c", "d"]);
        let mut backward = forward.clone();
        forward.remove_at(&[1, 3]);
        backward.remove_at(&[3, 1]);
        assert_eq!(forward, backward);
        assert_eq!(ids(&forward), vec!["a", "c"]);
    }

    #[test]
    fn remove_at_ignores_out_of_range_and_repeats() {
        let mut tracks = list(&["a", "b", "c"]);
        let removed = tracks.remove_at(&[1, 1, 7, 42]);
        assert_eq!(removed, 1);
        assert_eq!(ids(&tracks), vec!["a", "c"]);
    }

    #[test]
    fn remove_at_twice_is_noop_second_time() {
        let mut tracks = list(&["a", "b"]);
        tracks.remove_at(&[0, 1]);
        assert_eq!(tracks.remove_at(&[0, 1]), 0);
        assert!(tracks.is_empty());
    }

    #[test]
    fn remove_at_duplicates_only_hits_requested_position() {
        let mut tracks = list(&["x", "y", "x"]);
        tracks.remove_at(&[2]);
        assert_eq!(ids(&tracks), vec!["x", "y"]);
    }
}
