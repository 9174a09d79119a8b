// src/alerting/track_store.rs
//
// Alert state per tracker id. Entries coast through short tracker dropouts
// and are dropped once an id has been missing for more than the grace
// window, so a reacquired id starts again from Clear.

use crate::types::TrackAlertState;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct TrackEntry {
    state: TrackAlertState,
    missed_frames: u32,
}

pub struct TrackStateStore {
    entries: HashMap<u32, TrackEntry>,
    grace_frames: u32,
}

impl TrackStateStore {
    pub fn new(grace_frames: u32) -> Self {
        Self {
            entries: HashMap::new(),
            grace_frames,
        }
    }

    /// Unknown ids are Clear.
    pub fn get(&self, id: u32) -> TrackAlertState {
        self.entries
            .get(&id)
            .map(|e| e.state)
            .unwrap_or(TrackAlertState::Clear)
    }

    pub fn set(&mut self, id: u32, state: TrackAlertState) {
        self.entries
            .entry(id)
            .and_modify(|e| e.state = state)
            .or_insert(TrackEntry {
                state,
                missed_frames: 0,
            });
    }

    /// Age out ids not in `active`. Returns the removed ids with their last
    /// state.
    pub fn expire(&mut self, active: &HashSet<u32>) -> Vec<(u32, TrackAlertState)> {
        let grace = self.grace_frames;
        let mut removed = Vec::new();

        self.entries.retain(|&id, entry| {
            if active.contains(&id) {
                entry.missed_frames = 0;
                return true;
            }
            entry.missed_frames += 1;
            if entry.missed_frames > grace {
                debug!(
                    "Track {} expired after {} missed frames ({:?})",
                    id, entry.missed_frames, entry.state
                );
                removed.push((id, entry.state));
                false
            } else {
                true
            }
        });

        removed.sort_unstable_by_key(|&(id, _)| id);
        removed
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[u32]) -> HashSet<u32> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_unknown_track_is_clear() {
        let store = TrackStateStore::new(3);
        assert_eq!(store.get(42), TrackAlertState::Clear);
        assert!(!store.contains(42));
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = TrackStateStore::new(3);
        store.set(1, TrackAlertState::Buffered);
        store.set(1, TrackAlertState::InDanger);
        assert_eq!(store.get(1), TrackAlertState::InDanger);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_zero_grace_drops_immediately() {
        let mut store = TrackStateStore::new(0);
        store.set(1, TrackAlertState::InDanger);
        store.set(2, TrackAlertState::Buffered);

        let removed = store.expire(&ids(&[2]));
        assert_eq!(removed, vec![(1, TrackAlertState::InDanger)]);
        assert!(!store.contains(1));
        assert!(store.contains(2));
    }

    #[test]
    fn test_grace_window_survives_dropout() {
        let mut store = TrackStateStore::new(2);
        store.set(5, TrackAlertState::InDanger);

        assert!(store.expire(&ids(&[])).is_empty());
        assert!(store.expire(&ids(&[])).is_empty());
        // reappears: counter resets
        store.expire(&ids(&[5]));
        assert!(store.expire(&ids(&[])).is_empty());
        assert!(store.expire(&ids(&[])).is_empty());
        assert_eq!(store.get(5), TrackAlertState::InDanger);

        let removed = store.expire(&ids(&[]));
        assert_eq!(removed, vec![(5, TrackAlertState::InDanger)]);
        assert!(store.is_empty());
        assert_eq!(store.get(5), TrackAlertState::Clear);
    }
}
