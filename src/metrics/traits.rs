//! Traits for device metrics collection.

use crate::error::Result;
use crate::metrics::data::{DeviceReport, FsStats};
use std::path::{Path, PathBuf};

/// Which modern OS services a probe can use.
///
/// When a flag is false the collector takes the legacy branch of the
/// matching accessor instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// A memory-info service reporting total RAM in bytes
    pub memory_info_api: bool,
    /// Enumeration of every mounted, user-visible volume
    pub volume_enumeration: bool,
}

/// Access to the OS collaborators the collector reads from.
///
/// Implementations report failures as errors; turning them into sentinels
/// is the collector's job.
pub trait PlatformProbe {
    fn capabilities(&self) -> Capabilities;

    /// Raw battery capacity. Values outside `0..=100` mean "unsupported".
    fn battery_capacity(&self) -> Result<i64>;

    /// Total RAM in bytes from the memory-info service.
    fn total_memory_bytes(&self) -> Result<u64>;

    /// Contents of the `/proc/meminfo`-style memory table.
    fn read_meminfo(&self) -> Result<String>;

    /// Total and available bytes for the filesystem holding `path`, from a
    /// single statistics query.
    fn filesystem_stats(&self, path: &Path) -> Result<FsStats>;

    /// Path whose filesystem is the internal storage.
    fn internal_storage_path(&self) -> PathBuf;

    /// Mounted user-visible volumes, primary first.
    fn storage_volumes(&self) -> Result<Vec<PathBuf>>;

    /// The single external volume path used without enumeration support.
    fn legacy_external_path(&self) -> Option<PathBuf>;
}

/// Anything that can produce a full device report on demand.
pub trait MetricsProvider {
    /// Read every metric. Never fails: unreadable metrics become sentinels.
    fn collect_report(&self) -> DeviceReport;
}
