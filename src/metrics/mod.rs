//! Device metrics collection and data structures.
//!
//! This module reads battery charge, installed RAM and storage usage from
//! the OS and turns them into display-ready summaries, with sentinel values
//! standing in for anything that could not be read.

pub mod collector;
pub mod data;
pub mod format;
pub mod probe;
pub mod traits;

// Re-export commonly used items
pub use collector::DeviceMetricsCollector;
pub use data::DeviceReport;
pub use probe::SystemProbe;
pub use traits::{Capabilities, MetricsProvider, PlatformProbe};
