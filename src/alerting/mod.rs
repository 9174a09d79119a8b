// src/alerting/mod.rs

pub mod track_store;
pub mod transition;

pub use track_store::TrackStateStore;
pub use transition::TransitionEngine;
