//! Core device metrics collection implementation.

use crate::config::ExternalVolumes;
use crate::error::{MetricsError, Result};
use crate::metrics::{
    data::*,
    traits::{MetricsProvider, PlatformProbe},
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads battery, RAM and storage through a [`PlatformProbe`].
///
/// Every read is a stateless query-convert cycle. Failures never reach the
/// caller; they are logged and replaced by the metric's sentinel.
pub struct DeviceMetricsCollector<P> {
    probe: P,
    external_volumes: ExternalVolumes,
}

impl<P: PlatformProbe> DeviceMetricsCollector<P> {
    /// Create a collector reporting the default external volume selection.
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            external_volumes: ExternalVolumes::default(),
        }
    }

    /// Choose which enumerated volumes count as external storage.
    pub fn with_external_volumes(mut self, selection: ExternalVolumes) -> Self {
        self.external_volumes = selection;
        self
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Read the battery charge percentage.
    pub fn read_battery(&self) -> BatteryLevel {
        match self.probe.battery_capacity() {
            Ok(raw) => {
                let level = BatteryLevel::from_raw(raw);
                if level == BatteryLevel::Unknown {
                    warn!("Battery service returned out-of-range capacity {}", raw);
                } else {
                    debug!("Battery capacity: {}%", raw);
                }
                level
            }
            Err(err) => {
                warn!("Failed to read battery level: {}", err);
                BatteryLevel::Unknown
            }
        }
    }

    /// Read total installed RAM in whole gigabytes.
    pub fn read_total_ram(&self) -> RamSummary {
        match self.total_ram_gb() {
            Ok(gb) => {
                debug!("Total RAM: {} GB", gb);
                RamSummary::Gigabytes(gb)
            }
            Err(err) => {
                warn!("Failed to read total RAM: {}", err);
                RamSummary::Unknown
            }
        }
    }

    fn total_ram_gb(&self) -> Result<u64> {
        if self.probe.capabilities().memory_info_api {
            let bytes = self.probe.total_memory_bytes()?;
            if bytes == 0 {
                return Err(MetricsError::unavailable(
                    "memory-info service reported zero total memory",
                ));
            }
            Ok(bytes / BYTES_PER_GB)
        } else {
            let table = self.probe.read_meminfo()?;
            Ok(parse_meminfo_total_kb(&table)? / KB_PER_GB)
        }
    }

    /// Read usage of the filesystem holding `path`.
    ///
    /// An absent path or a failed query yields [`StorageSummary::EMPTY`].
    pub fn read_storage(&self, path: Option<&Path>) -> StorageSummary {
        let Some(path) = path else {
            return StorageSummary::EMPTY;
        };

        match self.probe.filesystem_stats(path) {
            Ok(stats) => {
                let summary = StorageSummary::from_stats(stats);
                debug!(
                    "Storage {}: {} GB used / {} GB total",
                    path.display(),
                    summary.used_gb,
                    summary.total_gb
                );
                summary
            }
            Err(err) => {
                warn!("Failed to read storage for {}: {}", path.display(), err);
                StorageSummary::EMPTY
            }
        }
    }

    /// Read the volume the probe names as internal storage.
    pub fn read_internal_storage(&self) -> StorageSummary {
        let path = self.probe.internal_storage_path();
        self.read_storage(Some(&path))
    }

    /// Read the selected external volumes.
    ///
    /// Uses volume enumeration when the probe supports it and the legacy
    /// single external path otherwise. Entries may be `EMPTY`.
    pub fn read_external_storage(&self) -> Vec<StorageSummary> {
        if !self.probe.capabilities().volume_enumeration {
            let path = self.probe.legacy_external_path();
            return vec![self.read_storage(path.as_deref())];
        }

        let volumes = match self.probe.storage_volumes() {
            Ok(volumes) => volumes,
            Err(err) => {
                warn!("Failed to enumerate storage volumes: {}", err);
                return vec![StorageSummary::EMPTY];
            }
        };

        match self.external_volumes {
            ExternalVolumes::Index(index) => {
                vec![self.read_storage(volumes.get(index).map(PathBuf::as_path))]
            }
            ExternalVolumes::All => volumes
                .iter()
                .skip(1)
                .map(|volume| self.read_storage(Some(volume)))
                .collect(),
        }
    }

    /// Read every metric into a fresh report.
    pub fn collect(&self) -> DeviceReport {
        DeviceReport::new(
            self.read_battery(),
            self.read_total_ram(),
            self.read_internal_storage(),
            self.read_external_storage(),
        )
    }
}

impl<P: PlatformProbe> MetricsProvider for DeviceMetricsCollector<P> {
    fn collect_report(&self) -> DeviceReport {
        self.collect()
    }
}

/// Extract the total from a memory table: the first numeric token of the
/// first line, in kilobytes.
pub fn parse_meminfo_total_kb(table: &str) -> Result<u64> {
    let first_line = table
        .lines()
        .next()
        .ok_or_else(|| MetricsError::parse_error("memory table is empty"))?;

    first_line
        .split(|c: char| !c.is_ascii_digit())
        .find(|token| !token.is_empty())
        .ok_or_else(|| {
            MetricsError::parse_error(format!("no numeric value in '{}'", first_line.trim()))
        })?
        .parse::<u64>()
        .map_err(|e| MetricsError::parse_error(format!("bad memory total: {}", e)))
}
