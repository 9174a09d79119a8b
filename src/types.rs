use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub zones: ZoneLayout,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub event_bus: EventBusConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Zone polygons as fractions of frame width/height.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneLayout {
    pub danger: Vec<NormalizedPoint>,
    pub buffer_left: Vec<NormalizedPoint>,
    pub buffer_right: Vec<NormalizedPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Class labels that take part in zone checks. Empty admits everything.
    pub allowed_classes: Vec<String>,
    /// Consecutive missed frames a track survives before it is forgotten.
    pub expiry_grace_frames: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub input_dir: String,
    /// Hand every Nth recorded frame to the monitor.
    pub frame_stride: u32,
    pub min_confidence: f32,
    /// Stop after this many processed frames per feed.
    #[serde(default)]
    pub max_frames: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBusConfig {
    pub max_pending: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// `[x, y]` with both components in `[0, 1]`.
pub type NormalizedPoint = [f32; 2];

// ============================================================================
// GEOMETRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Danger,
    BufferLeft,
    BufferRight,
}

impl ZoneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Danger => "DANGER",
            Self::BufferLeft => "BUFFER_L",
            Self::BufferRight => "BUFFER_R",
        }
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self, Self::BufferLeft | Self::BufferRight)
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned box in pixel coordinates, `(x1, y1)` top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Bottom-midpoint: where the object meets the road.
    pub fn anchor(&self) -> Point {
        Point::new((self.x1 + self.x2) * 0.5, self.y2)
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(b: [f32; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

// ============================================================================
// TRACKER FEED
// ============================================================================

/// One detection from the upstream tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    pub class_name: String,
    pub bbox: BoundingBox,
    /// Absent until the tracker has associated the detection with a history.
    #[serde(default)]
    pub track_id: Option<u32>,
    /// Score from the detector, if the feed carries one.
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Everything the tracker reported for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerFrame {
    pub frame_id: u64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<TrackedObject>,
}

// ============================================================================
// ZONE STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneClassification {
    None,
    Buffer,
    Danger,
}

impl ZoneClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Buffer => "BUFFER",
            Self::Danger => "DANGER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackAlertState {
    #[default]
    Clear,
    Buffered,
    InDanger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertEvent {
    Alert(u32),
    Clear(u32),
}

/// Per-object row handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedObject {
    pub track_id: Option<u32>,
    pub class_name: String,
    pub classification: ZoneClassification,
    pub anchor: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_id: u64,
    pub objects: Vec<ClassifiedObject>,
    pub events: Vec<AlertEvent>,
}

impl FrameReport {
    pub fn has_alert(&self) -> bool {
        self.events.iter().any(|e| matches!(e, AlertEvent::Alert(_)))
    }
}
