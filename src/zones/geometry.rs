// src/zones/geometry.rs
//
// Converts normalized zone layouts into pixel-space polygons and answers
// point-in-polygon queries against them.
//
// Design:
//   - Polygons are only constructed through `compile_polygon`, so every
//     `ZonePolygon` has >= 3 vertices and non-zero area
//   - Compilation is pure; `CompiledZoneCache` reuses the last result until
//     the frame size changes
//   - Membership is a crossing-number test with inclusive edges

use crate::error::ZoneError;
use crate::types::{NormalizedPoint, Point, ZoneKind, ZoneLayout};
use tracing::debug;

/// Distance in pixels within which a point counts as lying on an edge.
const EDGE_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct ZonePolygon {
    kind: ZoneKind,
    vertices: Vec<Point>,
}

impl ZonePolygon {
    pub fn kind(&self) -> ZoneKind {
        self.kind
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// True if `p` is inside the polygon or on its boundary.
    pub fn contains(&self, p: Point) -> bool {
        point_in_polygon(p, &self.vertices)
    }
}

/// Scale one normalized polygon to a `width` x `height` frame.
pub fn compile_polygon(
    kind: ZoneKind,
    normalized: &[NormalizedPoint],
    width: u32,
    height: u32,
) -> Result<ZonePolygon, ZoneError> {
    if width == 0 || height == 0 {
        return Err(ZoneError::InvalidFrameSize { width, height });
    }
    if normalized.len() < 3 {
        return Err(ZoneError::TooFewVertices {
            zone: kind,
            count: normalized.len(),
        });
    }

    let (w, h) = (width as f32, height as f32);
    let vertices: Vec<Point> = normalized
        .iter()
        .map(|&[x, y]| Point::new(x * w, y * h))
        .collect();

    if signed_area(vertices.iter().map(|p| (p.x, p.y))).abs() < f32::EPSILON {
        return Err(ZoneError::DegeneratePolygon { zone: kind });
    }

    Ok(ZonePolygon { kind, vertices })
}

/// The three zones compiled for one frame size.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSet {
    pub danger: ZonePolygon,
    pub buffer_left: ZonePolygon,
    pub buffer_right: ZonePolygon,
    width: u32,
    height: u32,
}

impl ZoneSet {
    pub fn compile(layout: &ZoneLayout, width: u32, height: u32) -> Result<Self, ZoneError> {
        Ok(Self {
            danger: compile_polygon(ZoneKind::Danger, &layout.danger, width, height)?,
            buffer_left: compile_polygon(
                ZoneKind::BufferLeft,
                &layout.buffer_left,
                width,
                height,
            )?,
            buffer_right: compile_polygon(
                ZoneKind::BufferRight,
                &layout.buffer_right,
                width,
                height,
            )?,
            width,
            height,
        })
    }

    pub fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZonePolygon> {
        [&self.danger, &self.buffer_left, &self.buffer_right].into_iter()
    }
}

/// Holds the zones for the most recently seen frame size.
pub struct CompiledZoneCache {
    layout: ZoneLayout,
    current: Option<ZoneSet>,
    compilations: u64,
}

impl CompiledZoneCache {
    pub fn new(layout: ZoneLayout) -> Self {
        Self {
            layout,
            current: None,
            compilations: 0,
        }
    }

    pub fn zones_for(&mut self, width: u32, height: u32) -> Result<&ZoneSet, ZoneError> {
        let stale = self
            .current
            .as_ref()
            .map_or(true, |z| z.frame_size() != (width, height));

        if stale {
            let zones = ZoneSet::compile(&self.layout, width, height)?;
            self.compilations += 1;
            debug!("Compiled zones for {}x{}", width, height);
            self.current = Some(zones);
        }

        match self.current.as_ref() {
            Some(zones) => Ok(zones),
            None => Err(ZoneError::InvalidFrameSize { width, height }),
        }
    }

    pub fn current(&self) -> Option<&ZoneSet> {
        self.current.as_ref()
    }

    pub fn compilations(&self) -> u64 {
        self.compilations
    }
}

/// Crossing-number test. Points on an edge or vertex count as inside.
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[j];

        if on_segment(p, a, b) {
            return true;
        }

        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = dx.hypot(dy);
    if len < EDGE_EPSILON {
        return (p.x - a.x).hypot(p.y - a.y) <= EDGE_EPSILON;
    }

    // perpendicular distance from p to the line through a, b
    let cross = dx * (p.y - a.y) - dy * (p.x - a.x);
    if cross.abs() / len > EDGE_EPSILON {
        return false;
    }

    p.x >= a.x.min(b.x) - EDGE_EPSILON
        && p.x <= a.x.max(b.x) + EDGE_EPSILON
        && p.y >= a.y.min(b.y) - EDGE_EPSILON
        && p.y <= a.y.max(b.y) + EDGE_EPSILON
}

/// Shoelace area; sign follows winding.
pub fn signed_area(points: impl Iterator<Item = (f32, f32)>) -> f32 {
    let pts: Vec<(f32, f32)> = points.collect();
    if pts.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..pts.len() {
        let (x1, y1) = pts[i];
        let (x2, y2) = pts[(i + 1) % pts.len()];
        sum += x1 * y2 - x2 * y1;
    }
    sum * 0.5
}
