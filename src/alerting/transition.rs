// src/alerting/transition.rs
//
// Per-track alert state machine.
//
//   Clear ──Danger──▶ InDanger   (Alert)
//   Buffered ─Danger─▶ InDanger  (Alert)
//   InDanger ─Buffer─▶ Buffered  (Clear)
//   Clear ──Buffer──▶ Buffered
//   any ──None──▶ unchanged
//
// Alerts are edge-triggered: a track sitting in the danger zone raises one
// Alert, not one per frame. An object that leaves the danger zone without
// passing through a buffer stays InDanger (last known position) until it
// is seen in a buffer or its track expires. Expiry emits nothing.

use super::TrackStateStore;
use crate::types::{AlertEvent, TrackAlertState, ZoneClassification};
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionOutcome {
    pub events: Vec<AlertEvent>,
    /// Index into the frame's observations for each entry of `events`.
    pub triggers: Vec<usize>,
    /// Tracks removed by expiry this frame, with their final state.
    pub expired: Vec<(u32, TrackAlertState)>,
}

pub struct TransitionEngine {
    store: TrackStateStore,
}

impl TransitionEngine {
    pub fn new(grace_frames: u32) -> Self {
        Self {
            store: TrackStateStore::new(grace_frames),
        }
    }

    /// Apply one frame of observations in order, then age out missing
    /// tracks.
    pub fn process_frame(
        &mut self,
        observations: &[(u32, ZoneClassification)],
    ) -> TransitionOutcome {
        let mut outcome = TransitionOutcome::default();
        let mut active = HashSet::with_capacity(observations.len());

        for (index, &(id, classification)) in observations.iter().enumerate() {
            active.insert(id);
            if let Some(event) = self.apply(id, classification) {
                outcome.events.push(event);
                outcome.triggers.push(index);
            }
        }

        if !self.store.is_empty() {
            outcome.expired = self.store.expire(&active);
        }
        outcome
    }

    fn apply(&mut self, id: u32, classification: ZoneClassification) -> Option<AlertEvent> {
        let prior = self.store.get(id);

        match classification {
            ZoneClassification::Danger => {
                self.store.set(id, TrackAlertState::InDanger);
                if prior != TrackAlertState::InDanger {
                    warn!("🚨 Track {} entered danger zone", id);
                    Some(AlertEvent::Alert(id))
                } else {
                    None
                }
            }
            ZoneClassification::Buffer => {
                self.store.set(id, TrackAlertState::Buffered);
                if prior == TrackAlertState::InDanger {
                    info!("✓ Track {} cleared via buffer zone", id);
                    Some(AlertEvent::Clear(id))
                } else {
                    None
                }
            }
            ZoneClassification::None => {
                if !self.store.contains(id) {
                    // first sighting: start tracking so expiry applies
                    self.store.set(id, TrackAlertState::Clear);
                }
                debug!("Track {} outside zones, holding {:?}", id, prior);
                None
            }
        }
    }

    pub fn store(&self) -> &TrackStateStore {
        &self.store
    }
}
