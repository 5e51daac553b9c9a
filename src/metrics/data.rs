//! Data structures for device metrics.

use serde::{Deserialize, Serialize};

/// Bytes in one gigabyte (binary).
pub const BYTES_PER_GB: u64 = 1 << 30;

/// Kilobytes in one gigabyte (binary).
pub const KB_PER_GB: u64 = 1 << 20;

/// Battery charge as reported by the battery service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryLevel {
    /// Charge percentage in `0..=100`
    Percent(u8),
    /// The battery service could not be queried
    Unknown,
}

impl BatteryLevel {
    /// Build a level from a raw capacity value. Anything outside `0..=100`
    /// is what platforms return for an unsupported property.
    pub fn from_raw(raw: i64) -> Self {
        match u8::try_from(raw) {
            Ok(percent) if percent <= 100 => Self::Percent(percent),
            _ => Self::Unknown,
        }
    }
}

/// Total installed RAM in whole gigabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RamSummary {
    /// Truncated total in GB, before bucketing
    Gigabytes(u64),
    /// Neither the memory-info API nor the memory table gave a value
    Unknown,
}

impl RamSummary {
    /// The standard hardware size label, or `None` when unknown.
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Gigabytes(gb) => Some(super::format::normalize_ram(
                i64::try_from(*gb).unwrap_or(i64::MAX),
            )),
            Self::Unknown => None,
        }
    }
}

/// Raw result of one filesystem-statistics query.
///
/// Both counters come from the same call so they describe the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FsStats {
    /// Size of the filesystem in bytes
    pub total_bytes: u64,
    /// Bytes available to unprivileged users
    pub available_bytes: u64,
}

/// Storage usage of one volume in whole gigabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageSummary {
    pub total_gb: u64,
    pub used_gb: u64,
    pub free_gb: u64,
}

impl StorageSummary {
    /// Sentinel for an absent volume or a failed query.
    pub const EMPTY: StorageSummary = StorageSummary {
        total_gb: 0,
        used_gb: 0,
        free_gb: 0,
    };

    /// Convert a statistics sample. Used bytes are taken from the raw
    /// counters and each field is truncated on its own, so `used_gb + free_gb`
    /// may fall one short of `total_gb`.
    pub fn from_stats(stats: FsStats) -> Self {
        let available_bytes = stats.available_bytes.min(stats.total_bytes);
        Self {
            total_gb: stats.total_bytes / BYTES_PER_GB,
            used_gb: (stats.total_bytes - available_bytes) / BYTES_PER_GB,
            free_gb: available_bytes / BYTES_PER_GB,
        }
    }

    /// Whether this volume should be left off the display.
    pub fn is_empty(&self) -> bool {
        self.total_gb == 0
    }
}

/// One full reading of every metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReport {
    /// Timestamp when this report was taken (Unix timestamp in milliseconds)
    pub timestamp: u64,
    pub battery: BatteryLevel,
    pub ram: RamSummary,
    pub internal_storage: StorageSummary,
    /// Selected external volumes, possibly containing `EMPTY` entries
    pub external_storage: Vec<StorageSummary>,
}

impl DeviceReport {
    /// Create a report stamped with the current time.
    pub fn new(
        battery: BatteryLevel,
        ram: RamSummary,
        internal_storage: StorageSummary,
        external_storage: Vec<StorageSummary>,
    ) -> Self {
        Self {
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            battery,
            ram,
            internal_storage,
            external_storage,
        }
    }
}
