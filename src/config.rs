//! Monitor configuration.

use crate::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Which externally mounted volumes to report.
///
/// Volume enumeration lists the primary volume first, so `Index(1)` is the
/// first secondary volume (an SD card or USB stick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalVolumes {
    /// Report only the volume at this position of the enumeration
    Index(usize),
    /// Report every enumerated volume after the primary one
    All,
}

impl Default for ExternalVolumes {
    fn default() -> Self {
        Self::Index(1)
    }
}

impl FromStr for ExternalVolumes {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<usize>().map(Self::Index).map_err(|_| {
            MetricsError::config_error(format!(
                "Invalid external volume selector '{}': expected an index or 'all'",
                s
            ))
        })
    }
}

impl fmt::Display for ExternalVolumes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{}", index),
            Self::All => f.write_str("all"),
        }
    }
}

/// Configuration for the probe, the collector and the refresh loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Delay between a refresh request and the re-read, in milliseconds
    pub refresh_delay_ms: u64,
    /// Path whose filesystem is reported as internal storage
    pub internal_path: PathBuf,
    /// External volume selection
    pub external_volumes: ExternalVolumes,
    /// Single external path used when volume enumeration is unavailable
    pub external_path: Option<PathBuf>,
    /// Textual memory table used by the legacy RAM path
    pub meminfo_path: PathBuf,
    /// Directory of power supply entries (sysfs layout)
    pub power_supply_dir: PathBuf,
    /// Force the legacy branch of every capability-checked accessor
    pub legacy_apis: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: crate::DEFAULT_REFRESH_DELAY_MS,
            internal_path: default_internal_path(),
            external_volumes: ExternalVolumes::default(),
            external_path: None,
            meminfo_path: PathBuf::from("/proc/meminfo"),
            power_supply_dir: PathBuf::from("/sys/class/power_supply"),
            legacy_apis: false,
        }
    }
}

#[cfg(target_os = "android")]
fn default_internal_path() -> PathBuf {
    PathBuf::from("/data")
}

#[cfg(not(target_os = "android"))]
fn default_internal_path() -> PathBuf {
    PathBuf::from("/")
}

impl MonitorConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            MetricsError::config_error(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Set the refresh delay in milliseconds.
    pub fn with_refresh_delay_ms(mut self, delay_ms: u64) -> Self {
        self.refresh_delay_ms = delay_ms;
        self
    }

    /// Set the internal storage path.
    pub fn with_internal_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.internal_path = path.into();
        self
    }

    /// Set the external volume selection.
    pub fn with_external_volumes(mut self, selection: ExternalVolumes) -> Self {
        self.external_volumes = selection;
        self
    }

    /// Set the legacy single external path.
    pub fn with_external_path(mut self, path: Option<PathBuf>) -> Self {
        self.external_path = path;
        self
    }

    /// Set the memory table path.
    pub fn with_meminfo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.meminfo_path = path.into();
        self
    }

    /// Set the power supply directory.
    pub fn with_power_supply_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.power_supply_dir = path.into();
        self
    }

    /// Force or release the legacy accessors.
    pub fn with_legacy_apis(mut self, legacy: bool) -> Self {
        self.legacy_apis = legacy;
        self
    }

    /// The refresh delay as a `Duration`.
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }
}
