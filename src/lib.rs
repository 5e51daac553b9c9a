//! # Device Pulse - Battery, RAM and Storage Readout
//!
//! A small crate that reads battery charge, installed RAM and storage usage
//! from the running system and turns them into display-ready text. Every
//! read is best-effort: anything the OS will not tell us shows up as
//! `Unknown` (or an empty storage record) instead of an error.
//!
//! ## Features
//!
//! - **Battery level**: percentage from the power supply service
//! - **RAM**: total installed memory, rounded up to a standard hardware size
//! - **Storage**: used/total for internal storage and any external volumes
//! - **Paced refresh**: a refresh control with a busy indicator and a
//!   fixed delay before the re-read
//! - **Library + Binary**: use as a crate or standalone application
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use device_pulse::{DeviceMetricsCollector, DisplayText, MonitorConfig, SystemProbe};
//!
//! let probe = SystemProbe::new(MonitorConfig::default());
//! let collector = DeviceMetricsCollector::new(probe);
//! let text = DisplayText::from(&collector.collect());
//!
//! println!("{}\n{}\n{}", text.battery, text.ram, text.storage);
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod refresh;

// Re-export public API
pub use config::{ExternalVolumes, MonitorConfig};
pub use error::{MetricsError, Result};
pub use metrics::{
    collector::DeviceMetricsCollector,
    data::{BatteryLevel, DeviceReport, FsStats, RamSummary, StorageSummary},
    format::{normalize_ram, DisplayText},
    probe::SystemProbe,
    traits::{Capabilities, MetricsProvider, PlatformProbe},
};
pub use refresh::{DisplayState, DisplaySurface, RefreshController};

/// The default delay between a refresh request and the re-read, in milliseconds
pub const DEFAULT_REFRESH_DELAY_MS: u64 = 1500;
