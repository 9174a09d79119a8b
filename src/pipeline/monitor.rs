// src/pipeline/monitor.rs
//
// Per-frame entry point. One call consumes one frame of tracker output and
// must finish before the next frame is handed in; all state lives in the
// monitor itself.
//
// Flow per frame:
//   1. compile zones for the frame size (cached)
//   2. drop classes outside the allow-list
//   3. classify each anchor point
//   4. feed tracked ids to the transition engine (anonymous detections are
//      reported but carry no state)
//   5. publish resulting events on the bus

use crate::alerting::TransitionEngine;
use crate::error::ZoneError;
use crate::pipeline::{EventBus, MonitorMetrics, PipelineEvent};
use crate::types::{
    AlertEvent, ClassifiedObject, Config, FrameReport, TrackAlertState, TrackerFrame,
    ZoneClassification,
};
use crate::zones::{classify, CompiledZoneCache, ZoneSet};
use std::collections::HashSet;
use tracing::{debug, info};

pub struct ProximityMonitor {
    zones: CompiledZoneCache,
    allowed_classes: HashSet<String>,
    engine: TransitionEngine,
    bus: EventBus,
    metrics: MonitorMetrics,
}

impl ProximityMonitor {
    pub fn new(config: &Config) -> Result<Self, ZoneError> {
        config.zones.validate()?;

        let allowed_classes: HashSet<String> =
            config.tracking.allowed_classes.iter().cloned().collect();
        if allowed_classes.is_empty() {
            info!("Class allow-list empty, all classes take part in zone checks");
        } else {
            info!("Zone checks limited to classes: {:?}", allowed_classes);
        }

        Ok(Self {
            zones: CompiledZoneCache::new(config.zones.clone()),
            allowed_classes,
            engine: TransitionEngine::new(config.tracking.expiry_grace_frames),
            bus: EventBus::new(config.event_bus.max_pending),
            metrics: MonitorMetrics::new(),
        })
    }

    pub fn process_frame(&mut self, frame: &TrackerFrame) -> Result<FrameReport, ZoneError> {
        let zones = self.zones.zones_for(frame.width, frame.height)?;

        let mut objects = Vec::with_capacity(frame.detections.len());
        let mut observations = Vec::with_capacity(frame.detections.len());
        // objects row behind each observation
        let mut rows = Vec::with_capacity(frame.detections.len());

        for det in &frame.detections {
            self.metrics.detections_seen += 1;

            if !self.allowed_classes.is_empty() && !self.allowed_classes.contains(&det.class_name)
            {
                self.metrics.detections_filtered += 1;
                continue;
            }

            let anchor = det.bbox.anchor();
            let classification = classify(anchor, zones);

            match det.track_id {
                Some(id) => {
                    observations.push((id, classification));
                    rows.push(objects.len());
                }
                None => self.metrics.anonymous_detections += 1,
            }

            objects.push(ClassifiedObject {
                track_id: det.track_id,
                class_name: det.class_name.clone(),
                classification,
                anchor,
            });
        }

        let outcome = self.engine.process_frame(&observations);

        for (event, &trigger) in outcome.events.iter().zip(&outcome.triggers) {
            match *event {
                AlertEvent::Alert(track_id) => {
                    let obj = &objects[rows[trigger]];
                    self.bus.publish(PipelineEvent::DangerEntered {
                        track_id,
                        frame_id: frame.frame_id,
                        class_name: obj.class_name.clone(),
                        anchor: obj.anchor,
                    });
                    self.metrics.alerts_raised += 1;
                }
                AlertEvent::Clear(track_id) => {
                    self.bus.publish(PipelineEvent::DangerCleared {
                        track_id,
                        frame_id: frame.frame_id,
                    });
                    self.metrics.alerts_cleared += 1;
                }
            }
        }

        for &(track_id, last_state) in &outcome.expired {
            if last_state == TrackAlertState::InDanger {
                debug!("Track {} expired while in danger", track_id);
            }
            self.bus.publish(PipelineEvent::TrackExpired {
                track_id,
                frame_id: frame.frame_id,
                last_state,
            });
            self.metrics.tracks_expired += 1;
        }

        if objects
            .iter()
            .any(|o| o.classification == ZoneClassification::Danger)
        {
            self.metrics.frames_with_danger += 1;
        }
        self.metrics.total_frames += 1;
        self.metrics.zone_compilations = self.zones.compilations();

        debug!(
            "Frame {}: {} objects, {} events, {} tracks held, {} bus events pending",
            frame.frame_id,
            objects.len(),
            outcome.events.len(),
            self.engine.store().len(),
            self.bus.pending_count()
        );

        Ok(FrameReport {
            frame_id: frame.frame_id,
            objects,
            events: outcome.events,
        })
    }

    pub fn drain_events(&mut self) -> Vec<PipelineEvent> {
        self.bus.drain()
    }

    pub fn tracked_count(&self) -> usize {
        self.engine.store().len()
    }

    /// Zones compiled for the most recent frame size.
    pub fn zones(&self) -> Option<&ZoneSet> {
        self.zones.current()
    }

    pub fn metrics(&self) -> &MonitorMetrics {
        &self.metrics
    }
}
