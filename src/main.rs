// src/main.rs

mod alerting;
mod config;
mod error;
mod overlay;
mod pipeline;
mod replay;
mod types;
mod zones;

use anyhow::{Context, Result};
use pipeline::{PipelineEvent, ProximityMonitor};
use replay::ReplaySource;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use types::Config;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("bike_proximity_alert={}", config.logging.level))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚲 Proximity alert starting");
    info!("✓ Configuration loaded from {}", config_path);
    info!(
        "Tracking: classes={:?}, expiry_grace_frames={}, frame_stride={}, min_confidence={:.2}",
        config.tracking.allowed_classes,
        config.tracking.expiry_grace_frames,
        config.replay.frame_stride,
        config.replay.min_confidence
    );

    let source = ReplaySource::new(config.replay.clone());
    let feeds = source.find_feeds()?;

    if feeds.is_empty() {
        error!("No tracker feeds found in {}", config.replay.input_dir);
        return Ok(());
    }

    for (idx, feed_path) in feeds.iter().enumerate() {
        info!(
            "Processing feed {}/{}: {}",
            idx + 1,
            feeds.len(),
            feed_path.display()
        );

        // fresh state per recording: tracker ids do not carry across files
        match process_feed(feed_path, &source, &config) {
            Ok(summary) => {
                info!("✓ Feed processed");
                info!("  Frames: {}", summary.total_frames);
                info!(
                    "  Detections: {} seen, {} filtered by class, {} anonymous",
                    summary.detections_seen,
                    summary.detections_filtered,
                    summary.anonymous_detections
                );
                if summary.alerts_raised > 0 {
                    warn!(
                        "  🚨 Alerts raised: {} ({} cleared via buffer)",
                        summary.alerts_raised, summary.alerts_cleared
                    );
                } else {
                    info!("  Alerts raised: 0");
                }
                info!("  Tracks expired: {}", summary.tracks_expired);
                info!("  Processing speed: {:.1} FPS", summary.fps);
            }
            Err(e) => {
                error!("Failed to process feed: {:#}", e);
            }
        }
    }

    Ok(())
}

fn process_feed(
    path: &Path,
    source: &ReplaySource,
    config: &Config,
) -> Result<pipeline::MetricsSummary> {
    let mut monitor = ProximityMonitor::new(config).context("invalid zone layout")?;
    let mut reader = source.open_feed(path)?;
    let mut processed: u64 = 0;

    while let Some(frame) = reader.read_frame()? {
        if config.replay.max_frames.is_some_and(|max| processed >= max) {
            info!("Frame limit reached after {} frames", processed);
            break;
        }

        let report = monitor
            .process_frame(&frame)
            .with_context(|| format!("frame {}", frame.frame_id))?;
        processed += 1;

        let marks = overlay::markers(&report.objects);
        if report.has_alert() {
            for mark in &marks {
                debug!(
                    "Frame {}: marker {} at ({:.0}, {:.0})",
                    report.frame_id, mark.label, mark.anchor.x, mark.anchor.y
                );
            }
        } else if !marks.is_empty() {
            debug!("Frame {}: {} overlay marker(s)", report.frame_id, marks.len());
        }

        for event in monitor.drain_events() {
            match event {
                PipelineEvent::DangerEntered {
                    track_id,
                    frame_id,
                    class_name,
                    anchor,
                } => warn!(
                    "ALERT frame={} track={} class={} anchor=({:.0}, {:.0})",
                    frame_id, track_id, class_name, anchor.x, anchor.y
                ),
                PipelineEvent::DangerCleared { track_id, frame_id } => {
                    info!("CLEAR frame={} track={}", frame_id, track_id)
                }
                PipelineEvent::TrackExpired {
                    track_id,
                    frame_id,
                    last_state,
                } => debug!(
                    "EXPIRED frame={} track={} last_state={:?}",
                    frame_id, track_id, last_state
                ),
            }
        }
    }

    if let Some(zones) = monitor.zones() {
        let (w, h) = zones.frame_size();
        debug!(
            "Final zone overlay at {}x{}: {} fill(s)",
            w,
            h,
            overlay::zone_fills(zones).len()
        );
    }

    info!(
        "Read {} frame(s), processed {}, {} track(s) still held",
        reader.frames_read(),
        processed,
        monitor.tracked_count()
    );
    Ok(monitor.metrics().summary())
}
