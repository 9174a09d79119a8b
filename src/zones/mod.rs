// src/zones/mod.rs

pub mod classifier;
pub mod geometry;

pub use classifier::classify;
pub use geometry::{CompiledZoneCache, ZoneSet};
