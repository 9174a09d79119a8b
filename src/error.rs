// src/error.rs
//
// Configuration failures are fatal at startup. A detection without a track
// id is not an error and never shows up here.

use crate::types::ZoneKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneError {
    #[error("{zone} polygon has {count} vertices, at least 3 are required")]
    TooFewVertices { zone: ZoneKind, count: usize },

    #[error("{zone} vertex {index} ({x}, {y}) lies outside the normalized [0, 1] range")]
    CoordinateOutOfRange {
        zone: ZoneKind,
        index: usize,
        x: f32,
        y: f32,
    },

    #[error("{zone} polygon encloses no area")]
    DegeneratePolygon { zone: ZoneKind },

    #[error("invalid frame size {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },
}
