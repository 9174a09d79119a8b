// src/pipeline/mod.rs

pub mod event_bus;
pub mod metrics;
pub mod monitor;

pub use event_bus::{EventBus, PipelineEvent};
pub use metrics::{MetricsSummary, MonitorMetrics};
pub use monitor::ProximityMonitor;
