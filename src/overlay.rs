// src/overlay.rs
//
// Draw instructions for the external renderer: translucent zone fills and a
// dot on each anchor that sits in a zone. Nothing here touches pixels.

use crate::types::{ClassifiedObject, Point, ZoneClassification, ZoneKind};
use crate::zones::ZoneSet;

pub const ZONE_ALPHA: f32 = 0.2;
pub const MARKER_RADIUS: u32 = 6;

/// BGR, matching the capture pipeline's channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bgr(pub u8, pub u8, pub u8);

pub const RED: Bgr = Bgr(0, 0, 255);
pub const GREEN: Bgr = Bgr(0, 255, 0);
pub const BLUE: Bgr = Bgr(255, 0, 0);

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneFill {
    pub kind: ZoneKind,
    pub vertices: Vec<Point>,
    pub color: Bgr,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMarker {
    pub anchor: Point,
    pub color: Bgr,
    pub radius: u32,
    pub label: String,
}

pub fn zone_fills(zones: &ZoneSet) -> Vec<ZoneFill> {
    zones
        .iter()
        .map(|poly| ZoneFill {
            kind: poly.kind(),
            vertices: poly.vertices().to_vec(),
            color: if poly.kind().is_buffer() { BLUE } else { RED },
            alpha: ZONE_ALPHA,
        })
        .collect()
}

pub fn markers(objects: &[ClassifiedObject]) -> Vec<OverlayMarker> {
    objects
        .iter()
        .filter_map(|obj| {
            let color = match obj.classification {
                ZoneClassification::Danger => RED,
                ZoneClassification::Buffer => GREEN,
                ZoneClassification::None => return None,
            };
            let label = match obj.track_id {
                Some(id) => format!("{} #{} {}", obj.class_name, id, obj.classification.as_str()),
                None => format!("{} {}", obj.class_name, obj.classification.as_str()),
            };
            Some(OverlayMarker {
                anchor: obj.anchor,
                color,
                radius: MARKER_RADIUS,
                label,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ZoneLayout;

    fn object(track_id: Option<u32>, classification: ZoneClassification) -> ClassifiedObject {
        ClassifiedObject {
            track_id,
            class_name: "car".to_string(),
            classification,
            anchor: Point::new(10.0, 20.0),
        }
    }

    #[test]
    fn test_zone_fill_colors() {
        let zones = ZoneSet::compile(&ZoneLayout::default(), 640, 480).unwrap();
        let fills = zone_fills(&zones);
        assert_eq!(fills.len(), 3);
        assert_eq!(fills[0].kind, ZoneKind::Danger);
        assert_eq!(fills[0].color, RED);
        assert!(fills[1..].iter().all(|f| f.color == BLUE));
        assert_eq!(fills[0].vertices, zones.danger.vertices());
    }

    #[test]
    fn test_markers_skip_outside_objects() {
        let objs = vec![
            object(Some(3), ZoneClassification::Danger),
            object(None, ZoneClassification::Buffer),
            object(Some(4), ZoneClassification::None),
        ];
        let marks = markers(&objs);
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].color, RED);
        assert_eq!(marks[0].label, "car #3 DANGER");
        assert_eq!(marks[1].color, GREEN);
        assert_eq!(marks[1].label, "car BUFFER");
    }
}
