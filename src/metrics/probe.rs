//! OS-backed platform probe using sysinfo and sysfs.

use crate::config::MonitorConfig;
use crate::error::{MetricsError, Result};
use crate::metrics::data::FsStats;
use crate::metrics::traits::{Capabilities, PlatformProbe};
use std::fs;
use std::path::{Path, PathBuf};
use sysinfo::{Disks, System};
use tracing::debug;

/// Mount roots under which a volume counts as user-visible.
const USER_VOLUME_ROOTS: &[&str] = &["/media", "/run/media", "/mnt", "/storage", "/Volumes"];

/// Mounts under a user volume root that are aliases of internal storage.
const INTERNAL_ALIASES: &[&str] = &["/storage/emulated", "/storage/self"];

/// Platform probe reading from the running system.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    config: MonitorConfig,
}

impl SystemProbe {
    /// Read the sources named in `config`.
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Locate the first power supply entry whose type is `Battery`.
    fn find_battery(&self) -> Result<PathBuf> {
        let dir = &self.config.power_supply_dir;
        let mut candidates: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                fs::read_to_string(path.join("type"))
                    .map(|kind| kind.trim().eq_ignore_ascii_case("battery"))
                    .unwrap_or(false)
            })
            .collect();
        candidates.sort();

        candidates.into_iter().next().ok_or_else(|| {
            MetricsError::unavailable(format!("no battery under {}", dir.display()))
        })
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl PlatformProbe for SystemProbe {
    fn capabilities(&self) -> Capabilities {
        let modern = sysinfo::IS_SUPPORTED_SYSTEM && !self.config.legacy_apis;
        Capabilities {
            memory_info_api: modern,
            volume_enumeration: modern,
        }
    }

    fn battery_capacity(&self) -> Result<i64> {
        let battery = self.find_battery()?;
        let raw = fs::read_to_string(battery.join("capacity"))?;
        debug!("Battery entry {}: capacity {}", battery.display(), raw.trim());
        raw.trim()
            .parse::<i64>()
            .map_err(|e| MetricsError::parse_error(format!("battery capacity '{}': {}", raw.trim(), e)))
    }

    fn total_memory_bytes(&self) -> Result<u64> {
        let mut system = System::new();
        system.refresh_memory();
        Ok(system.total_memory())
    }

    fn read_meminfo(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.config.meminfo_path)?)
    }

    fn filesystem_stats(&self, path: &Path) -> Result<FsStats> {
        let resolved = path.canonicalize()?;
        let disks = Disks::new_with_refreshed_list();

        let disk = containing_mount(&resolved, disks.iter(), |disk| disk.mount_point())
            .ok_or_else(|| {
                MetricsError::unavailable(format!("no mounted filesystem holds {}", path.display()))
            })?;

        debug!(
            "Storage {} resolved to mount {}",
            path.display(),
            disk.mount_point().display()
        );
        Ok(FsStats {
            total_bytes: disk.total_space(),
            available_bytes: disk.available_space(),
        })
    }

    fn internal_storage_path(&self) -> PathBuf {
        self.config.internal_path.clone()
    }

    fn storage_volumes(&self) -> Result<Vec<PathBuf>> {
        let disks = Disks::new_with_refreshed_list();
        let internal = &self.config.internal_path;

        let mut secondary: Vec<PathBuf> = disks
            .iter()
            .filter(|disk| disk.total_space() > 0)
            .filter(|disk| disk.is_removable() || is_user_visible(disk.mount_point()))
            .map(|disk| disk.mount_point().to_path_buf())
            .filter(|mount| mount != internal && !is_internal_alias(mount))
            .collect();
        secondary.sort();
        secondary.dedup();

        let mut volumes = Vec::with_capacity(secondary.len() + 1);
        volumes.push(internal.clone());
        volumes.extend(secondary);
        debug!("Enumerated storage volumes: {:?}", volumes);
        Ok(volumes)
    }

    fn legacy_external_path(&self) -> Option<PathBuf> {
        self.config.external_path.clone()
    }
}

fn is_user_visible(mount: &Path) -> bool {
    USER_VOLUME_ROOTS
        .iter()
        .any(|root| mount.starts_with(root) && mount != Path::new(root))
}

fn is_internal_alias(mount: &Path) -> bool {
    INTERNAL_ALIASES.iter().any(|alias| mount.starts_with(alias))
}

/// The entry whose mount point is the longest prefix of `path`.
fn containing_mount<'a, T>(
    path: &Path,
    entries: impl IntoIterator<Item = &'a T>,
    mount_point: impl Fn(&T) -> &Path,
) -> Option<&'a T>
where
    T: 'a,
{
    entries
        .into_iter()
        .filter(|entry| path.starts_with(mount_point(entry)))
        .max_by_key(|entry| mount_point(entry).components().count())
}
