//! Property-based tests for track list mutation
//!
//! Uses proptest to verify the removal and append invariants across many
//! random lists and position sets.

use proptest::prelude::*;
use setlist_core::{Playlist, PlaylistUpdate, TrackId, TrackList, UserId};
use std::collections::HashSet;

// ===== Helpers =====

/// Small alphabet so duplicates show up often
fn arbitrary_ids() -> impl Strategy<Value = Vec<TrackId>> {
    prop::collection::vec("[a-e]", 0..30).prop_map(|ids| ids.into_iter().map(TrackId::new).collect())
}

/// A list plus removal positions, some of them past the end
fn list_and_positions() -> impl Strategy<Value = (Vec<TrackId>, Vec<usize>)> {
    arbitrary_ids().prop_flat_map(|ids| {
        let upper = ids.len() + 5;
        (Just(ids), prop::collection::vec(0..upper, 0..12))
    })
}

/// Reference result: elements whose snapshot position is not in `positions`
fn expected_after_removal(ids: &[TrackId], positions: &[usize]) -> Vec<TrackId> {
    let doomed: HashSet<usize> = positions.iter().copied().collect();
    ids.iter()
        .enumerate()
        .filter(|(position, _)| !doomed.contains(position))
        .map(|(_, id)| id.clone())
        .collect()
}

// ===== Property Tests =====

proptest! {
    /// Property: removal keeps exactly the non-targeted elements, in order
    #[test]
    fn removal_matches_snapshot_semantics((ids, positions) in list_and_positions()) {
        let mut tracks = TrackList::from(ids.clone());
        tracks.remove_at(&positions);

        let expected = expected_after_removal(&ids, &positions);
        prop_assert_eq!(tracks.as_slice(), expected.as_slice());
    }

    /// Property: the order positions are listed in does not matter
    #[test]
    fn removal_is_order_independent((ids, positions) in list_and_positions()) {
        let mut as_given = TrackList::from(ids.clone());
        as_given.remove_at(&positions);

        let mut reversed_positions = positions.clone();
        reversed_positions.reverse();
        let mut reversed = TrackList::from(ids.clone());
        reversed.remove_at(&reversed_positions);

        let mut sorted_positions = positions;
        sorted_positions.sort_unstable();
        let mut sorted = TrackList::from(ids);
        sorted.remove_at(&sorted_positions);

        prop_assert_eq!(&as_given, &reversed);
        prop_assert_eq!(&as_given, &sorted);
    }

    /// Property: length drops by the number of distinct in-range positions
    #[test]
    fn removal_count_is_consistent((ids, positions) in list_and_positions()) {
        let in_range: HashSet<usize> = positions.iter().copied().filter(|&p| p < ids.len()).collect();

        let mut tracks = TrackList::from(ids.clone());
        let removed = tracks.remove_at(&positions);

        prop_assert_eq!(removed, in_range.len());
        prop_assert_eq!(tracks.len(), ids.len() - in_range.len());
    }

    /// Property: re-sending positions that are now past the end changes nothing
    #[test]
    fn repeated_out_of_range_removal_is_noop((ids, positions) in list_and_positions()) {
        let mut tracks = TrackList::from(ids);
        tracks.remove_at(&positions);
        let after_first = tracks.clone();

        let stale: Vec<usize> = positions.into_iter().filter(|&p| p >= after_first.len()).collect();
        let removed = tracks.remove_at(&stale);

        prop_assert_eq!(removed, 0);
        prop_assert_eq!(tracks, after_first);
    }

    /// Property: an update is "remove against the original, then append"
    #[test]
    fn update_never_removes_appended_tracks(
        (ids, positions) in list_and_positions(),
        added in arbitrary_ids(),
    ) {
        let mut playlist = Playlist::new_explicit(UserId::new("owner"), "p");
        playlist.replace_tracks(ids.clone()).unwrap();

        let update = PlaylistUpdate {
            tracks_to_add: added.clone(),
            positions_to_remove: positions.clone(),
            ..PlaylistUpdate::default()
        };
        playlist.apply_update(&update).unwrap();

        let mut expected = expected_after_removal(&ids, &positions);
        expected.extend(added.iter().cloned());

        let tracks = playlist.track_list().unwrap();
        prop_assert_eq!(tracks.as_slice(), expected.as_slice());
        prop_assert!(tracks.as_slice().ends_with(&added));
    }
}

#[test]
fn round_trip_remove_one_add_one() {
    let mut playlist = Playlist::new_explicit(UserId::new("owner"), "p");
    playlist
        .replace_tracks(vec!["a".into(), "b".into(), "c".into()])
        .unwrap();

    let update = PlaylistUpdate {
        tracks_to_add: vec!["d".into()],
        positions_to_remove: vec![1],
        ..PlaylistUpdate::default()
    };
    playlist.apply_update(&update).unwrap();

    let ids: Vec<&str> = playlist.track_list().unwrap().iter().map(TrackId::as_str).collect();
    assert_eq!(ids, vec!["a", "c", "d"]);
}
