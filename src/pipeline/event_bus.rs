// src/pipeline/event_bus.rs
//
// Alert events queued for the rendering side. The monitor publishes,
// consumers drain once per frame.

use crate::types::{Point, TrackAlertState};
use std::collections::VecDeque;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    DangerEntered {
        track_id: u32,
        frame_id: u64,
        class_name: String,
        anchor: Point,
    },

    DangerCleared {
        track_id: u32,
        frame_id: u64,
    },

    TrackExpired {
        track_id: u32,
        frame_id: u64,
        last_state: TrackAlertState,
    },
}

impl PipelineEvent {
    pub fn track_id(&self) -> u32 {
        match self {
            PipelineEvent::DangerEntered { track_id, .. }
            | PipelineEvent::DangerCleared { track_id, .. }
            | PipelineEvent::TrackExpired { track_id, .. } => *track_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PipelineEvent::DangerEntered { .. } => "danger_entered",
            PipelineEvent::DangerCleared { .. } => "danger_cleared",
            PipelineEvent::TrackExpired { .. } => "track_expired",
        }
    }
}

pub struct EventBus {
    events: VecDeque<PipelineEvent>,
    max_pending: usize,
}

impl EventBus {
    pub fn new(max_pending: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_pending),
            max_pending,
        }
    }

    pub fn publish(&mut self, event: PipelineEvent) {
        if self.events.len() >= self.max_pending {
            if let Some(dropped) = self.events.pop_front() {
                warn!(
                    "Event bus at {} pending, dropped {} for track {}",
                    self.max_pending,
                    dropped.kind(),
                    dropped.track_id()
                );
            }
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<PipelineEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared(track_id: u32) -> PipelineEvent {
        PipelineEvent::DangerCleared {
            track_id,
            frame_id: 1,
        }
    }

    #[test]
    fn test_drain_returns_in_order() {
        let mut bus = EventBus::new(8);
        bus.publish(cleared(1));
        bus.publish(cleared(2));
        assert_eq!(bus.drain(), vec![cleared(1), cleared(2)]);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_oldest() {
        let mut bus = EventBus::new(2);
        bus.publish(cleared(1));
        bus.publish(cleared(2));
        bus.publish(cleared(3));
        assert_eq!(bus.pending_count(), 2);
        assert_eq!(bus.drain(), vec![cleared(2), cleared(3)]);
    }

    #[test]
    fn test_event_names_its_track() {
        let expired = PipelineEvent::TrackExpired {
            track_id: 9,
            frame_id: 4,
            last_state: TrackAlertState::InDanger,
        };
        assert_eq!(expired.track_id(), 9);
        assert_eq!(expired.kind(), "track_expired");
        assert_eq!(cleared(3).track_id(), 3);
        assert_eq!(cleared(3).kind(), "danger_cleared");
    }
}
