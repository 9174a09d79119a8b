use crate::error::ZoneError;
use crate::types::{
    Config, EventBusConfig, LoggingConfig, NormalizedPoint, ReplayConfig, TrackingConfig,
    ZoneKind, ZoneLayout,
};
use crate::zones::geometry::signed_area;
use anyhow::{Context, Result};
use std::fs;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
        let config: Config =
            serde_yaml::from_str(&contents).with_context(|| format!("parsing config {}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.zones.validate()?;
        if self.replay.frame_stride == 0 {
            anyhow::bail!("replay.frame_stride must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.replay.min_confidence) {
            anyhow::bail!(
                "replay.min_confidence {} is outside [0, 1]",
                self.replay.min_confidence
            );
        }
        if self.event_bus.max_pending == 0 {
            anyhow::bail!("event_bus.max_pending must be at least 1");
        }
        Ok(())
    }
}

impl ZoneLayout {
    pub fn polygons(&self) -> [(ZoneKind, &[NormalizedPoint]); 3] {
        [
            (ZoneKind::Danger, self.danger.as_slice()),
            (ZoneKind::BufferLeft, self.buffer_left.as_slice()),
            (ZoneKind::BufferRight, self.buffer_right.as_slice()),
        ]
    }

    pub fn validate(&self) -> Result<(), ZoneError> {
        for (zone, points) in self.polygons() {
            validate_polygon(zone, points)?;
        }
        Ok(())
    }
}

fn validate_polygon(zone: ZoneKind, points: &[NormalizedPoint]) -> Result<(), ZoneError> {
    if points.len() < 3 {
        return Err(ZoneError::TooFewVertices {
            zone,
            count: points.len(),
        });
    }
    for (index, &[x, y]) in points.iter().enumerate() {
        // NaN fails both range checks
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return Err(ZoneError::CoordinateOutOfRange { zone, index, x, y });
        }
    }
    let area = signed_area(points.iter().map(|&[x, y]| (x, y)));
    if area.abs() < f32::EPSILON {
        return Err(ZoneError::DegeneratePolygon { zone });
    }
    Ok(())
}

// Field-deployed layout: a trapezoid ahead of the wheel with a buffer strip
// on each side.
impl Default for ZoneLayout {
    fn default() -> Self {
        Self {
            danger: vec![[0.2, 1.0], [0.8, 1.0], [0.6, 0.5], [0.4, 0.5]],
            buffer_left: vec![[0.0, 1.0], [0.2, 1.0], [0.2, 0.5], [0.1, 0.5]],
            buffer_right: vec![[0.85, 1.0], [1.0, 1.0], [1.0, 0.5], [0.8, 0.5]],
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            allowed_classes: vec!["person".to_string(), "car".to_string()],
            expiry_grace_frames: 15, // ~1.5s at 30fps with stride 3
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            input_dir: "data/tracks".to_string(),
            frame_stride: 3,
            min_confidence: 0.4,
            max_frames: None,
        }
    }
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self { max_pending: 256 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
