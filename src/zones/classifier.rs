// src/zones/classifier.rs
//
// Maps an anchor point to a zone classification. Buffers are tested first
// and win over the danger zone wherever they overlap: a point in a buffer
// is treated as leaving the danger corridor.

use super::geometry::ZoneSet;
use crate::types::{Point, ZoneClassification};

pub fn classify(anchor: Point, zones: &ZoneSet) -> ZoneClassification {
    if zones.buffer_left.contains(anchor) || zones.buffer_right.contains(anchor) {
        return ZoneClassification::Buffer;
    }
    if zones.danger.contains(anchor) {
        return ZoneClassification::Danger;
    }
    ZoneClassification::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ZoneLayout;

    /// 100x100 frame: danger spans the lower half, buffers are strips at
    /// either side that overlap it.
    fn overlapping_zones() -> ZoneSet {
        let layout = ZoneLayout {
            danger: vec![[0.0, 0.5], [1.0, 0.5], [1.0, 1.0], [0.0, 1.0]],
            buffer_left: vec![[0.0, 0.5], [0.2, 0.5], [0.2, 1.0], [0.0, 1.0]],
            buffer_right: vec![[0.8, 0.5], [1.0, 0.5], [1.0, 1.0], [0.8, 1.0]],
        };
        ZoneSet::compile(&layout, 100, 100).unwrap()
    }

    #[test]
    fn test_danger_zone_hit() {
        let zones = overlapping_zones();
        assert_eq!(
            classify(Point::new(50.0, 90.0), &zones),
            ZoneClassification::Danger
        );
    }

    #[test]
    fn test_buffer_overrides_danger() {
        let zones = overlapping_zones();
        assert_eq!(
            classify(Point::new(10.0, 90.0), &zones),
            ZoneClassification::Buffer
        );
        assert_eq!(
            classify(Point::new(90.0, 60.0), &zones),
            ZoneClassification::Buffer
        );
    }

    #[test]
    fn test_buffer_precedence_across_overlap_grid() {
        let zones = overlapping_zones();
        for x in 0..=20 {
            for y in 50..=100 {
                let p = Point::new(x as f32, y as f32);
                assert_eq!(
                    classify(p, &zones),
                    ZoneClassification::Buffer,
                    "point ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_outside_all_zones() {
        let zones = overlapping_zones();
        assert_eq!(
            classify(Point::new(50.0, 20.0), &zones),
            ZoneClassification::None
        );
    }

    #[test]
    fn test_edge_of_buffer_is_buffer() {
        let zones = overlapping_zones();
        // x = 20 is the inner edge of the left buffer
        assert_eq!(
            classify(Point::new(20.0, 75.0), &zones),
            ZoneClassification::Buffer
        );
        // top edge of the danger zone, clear of the buffers
        assert_eq!(
            classify(Point::new(50.0, 50.0), &zones),
            ZoneClassification::Danger
        );
    }

    #[test]
    fn test_default_layout_regions() {
        let zones = ZoneSet::compile(&ZoneLayout::default(), 1280, 720).unwrap();
        // straight ahead, bottom of frame
        assert_eq!(
            classify(Point::new(640.0, 700.0), &zones),
            ZoneClassification::Danger
        );
        // lower-left corner strip
        assert_eq!(
            classify(Point::new(60.0, 700.0), &zones),
            ZoneClassification::Buffer
        );
        // horizon
        assert_eq!(
            classify(Point::new(640.0, 100.0), &zones),
            ZoneClassification::None
        );
    }

    #[test]
    fn test_resolution_independent() {
        let layout = ZoneLayout::default();
        let small = ZoneSet::compile(&layout, 320, 180).unwrap();
        let large = ZoneSet::compile(&layout, 1920, 1080).unwrap();

        let relative = [
            (0.5, 0.9),
            (0.05, 0.95),
            (0.95, 0.9),
            (0.5, 0.2),
            (0.3, 0.7),
            (0.7, 0.6),
        ];
        for (rx, ry) in relative {
            let a = classify(Point::new(rx * 320.0, ry * 180.0), &small);
            let b = classify(Point::new(rx * 1920.0, ry * 1080.0), &large);
            assert_eq!(a, b, "relative anchor ({}, {})", rx, ry);
        }
    }
}
