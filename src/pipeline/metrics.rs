// src/pipeline/metrics.rs
//
// Counts for the per-feed summary log.

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct MonitorMetrics {
    pub total_frames: u64,
    pub detections_seen: u64,
    pub detections_filtered: u64,
    pub anonymous_detections: u64,
    pub frames_with_danger: u64,
    pub alerts_raised: u64,
    pub alerts_cleared: u64,
    pub tracks_expired: u64,
    pub zone_compilations: u64,
    pub started_at: Instant,
}

impl MonitorMetrics {
    pub fn new() -> Self {
        Self {
            total_frames: 0,
            detections_seen: 0,
            detections_filtered: 0,
            anonymous_detections: 0,
            frames_with_danger: 0,
            alerts_raised: 0,
            alerts_cleared: 0,
            tracks_expired: 0,
            zone_compilations: 0,
            started_at: Instant::now(),
        }
    }

    pub fn fps(&self) -> f64 {
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            self.total_frames as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_frames: self.total_frames,
            fps: self.fps(),
            detections_seen: self.detections_seen,
            detections_filtered: self.detections_filtered,
            anonymous_detections: self.anonymous_detections,
            frames_with_danger: self.frames_with_danger,
            alerts_raised: self.alerts_raised,
            alerts_cleared: self.alerts_cleared,
            tracks_expired: self.tracks_expired,
            zone_compilations: self.zone_compilations,
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub fps: f64,
    pub detections_seen: u64,
    pub detections_filtered: u64,
    pub anonymous_detections: u64,
    pub frames_with_danger: u64,
    pub alerts_raised: u64,
    pub alerts_cleared: u64,
    pub tracks_expired: u64,
    pub zone_compilations: u64,
    pub elapsed_secs: f64,
}
