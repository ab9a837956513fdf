//! # taktnet telemetry
//!
//! Crate for logging and metrics of the simulation runner.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
