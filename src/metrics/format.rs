//! Display text for device reports.

use crate::metrics::data::{BatteryLevel, DeviceReport, RamSummary, StorageSummary};
use serde::{Deserialize, Serialize};

/// Round a RAM total up to the nearest size hardware ships with.
///
/// Totals above 32 GB are echoed as-is. Zero and negative input land in
/// the smallest bucket.
pub fn normalize_ram(gb: i64) -> String {
    match gb {
        i64::MIN..=2 => "2 GB".to_string(),
        3..=4 => "4 GB".to_string(),
        5..=6 => "6 GB".to_string(),
        7..=8 => "8 GB".to_string(),
        9..=12 => "12 GB".to_string(),
        13..=16 => "16 GB".to_string(),
        17..=24 => "24 GB".to_string(),
        25..=32 => "32 GB".to_string(),
        _ => format!("{} GB", gb),
    }
}

/// The battery line, e.g. `Battery Level: 64%`.
pub fn battery_text(battery: &BatteryLevel) -> String {
    match battery {
        BatteryLevel::Percent(percent) => format!("Battery Level: {}%", percent),
        BatteryLevel::Unknown => "Battery Level: Unknown".to_string(),
    }
}

/// The RAM line with the total bucketed to a standard size.
pub fn ram_text(ram: &RamSummary) -> String {
    match ram.label() {
        Some(label) => format!("RAM Usage: {}", label),
        None => "RAM Usage: Unknown".to_string(),
    }
}

/// Internal line, then one `External:` line per non-empty external volume.
pub fn storage_text(internal: &StorageSummary, external: &[StorageSummary]) -> String {
    let mut text = format!(
        "Internal: {} GB used / {} GB total\n",
        internal.used_gb, internal.total_gb
    );
    for volume in external.iter().filter(|volume| !volume.is_empty()) {
        text.push_str(&format!(
            "External: {} GB used / {} GB total\n",
            volume.used_gb, volume.total_gb
        ));
    }
    text.trim_end().to_string()
}

/// The three strings shown for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayText {
    pub battery: String,
    pub ram: String,
    pub storage: String,
}

impl From<&DeviceReport> for DisplayText {
    fn from(report: &DeviceReport) -> Self {
        Self {
            battery: battery_text(&report.battery),
            ram: ram_text(&report.ram),
            storage: storage_text(&report.internal_storage, &report.external_storage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket_rank(label: &str) -> usize {
        const BUCKETS: [&str; 8] = [
            "2 GB", "4 GB", "6 GB", "8 GB", "12 GB", "16 GB", "24 GB", "32 GB",
        ];
        BUCKETS
            .iter()
            .position(|bucket| *bucket == label)
            .unwrap_or(BUCKETS.len())
    }

    #[test]
    fn test_normalize_ram_buckets() {
        assert_eq!(normalize_ram(2), "2 GB");
        assert_eq!(normalize_ram(3), "4 GB");
        assert_eq!(normalize_ram(4), "4 GB");
        assert_eq!(normalize_ram(5), "6 GB");
        assert_eq!(normalize_ram(7), "8 GB");
        assert_eq!(normalize_ram(8), "8 GB");
        assert_eq!(normalize_ram(11), "12 GB");
        assert_eq!(normalize_ram(12), "12 GB");
        assert_eq!(normalize_ram(15), "16 GB");
        assert_eq!(normalize_ram(16), "16 GB");
        assert_eq!(normalize_ram(24), "24 GB");
        assert_eq!(normalize_ram(31), "32 GB");
        assert_eq!(normalize_ram(32), "32 GB");
        assert_eq!(normalize_ram(33), "33 GB");
        assert_eq!(normalize_ram(48), "48 GB");
    }

    #[test]
    fn test_normalize_ram_small_and_negative() {
        assert_eq!(normalize_ram(1), "2 GB");
        assert_eq!(normalize_ram(0), "2 GB");
        assert_eq!(normalize_ram(-5), "2 GB");
        assert_eq!(normalize_ram(i64::MIN), "2 GB");
    }

    #[test]
    fn test_normalize_ram_is_monotonic() {
        let mut previous = 0;
        for gb in -4..=32 {
            let rank = bucket_rank(&normalize_ram(gb));
            assert!(rank >= previous, "rank dropped at {} GB", gb);
            previous = rank;
        }
    }

    #[test]
    fn test_normalize_ram_is_idempotent_on_representatives() {
        for gb in [2, 4, 6, 8, 12, 16, 24, 32, 48] {
            let label = normalize_ram(gb);
            let representative: i64 = label.trim_end_matches(" GB").parse().unwrap();
            assert_eq!(representative, gb);
            assert_eq!(normalize_ram(representative), label);
        }
    }

    #[test]
    fn test_battery_and_ram_text() {
        assert_eq!(battery_text(&BatteryLevel::Percent(42)), "Battery Level: 42%");
        assert_eq!(battery_text(&BatteryLevel::Unknown), "Battery Level: Unknown");
        assert_eq!(ram_text(&RamSummary::Gigabytes(5)), "RAM Usage: 6 GB");
        assert_eq!(ram_text(&RamSummary::Unknown), "RAM Usage: Unknown");
    }

    #[test]
    fn test_storage_text_hides_empty_external() {
        let internal = StorageSummary {
            total_gb: 128,
            used_gb: 100,
            free_gb: 28,
        };
        assert_eq!(
            storage_text(&internal, &[StorageSummary::EMPTY]),
            "Internal: 100 GB used / 128 GB total"
        );
        assert_eq!(
            storage_text(&internal, &[]),
            "Internal: 100 GB used / 128 GB total"
        );
    }

    #[test]
    fn test_storage_text_with_external() {
        let internal = StorageSummary {
            total_gb: 64,
            used_gb: 30,
            free_gb: 34,
        };
        let sd_card = StorageSummary {
            total_gb: 32,
            used_gb: 2,
            free_gb: 30,
        };
        assert_eq!(
            storage_text(&internal, &[StorageSummary::EMPTY, sd_card]),
            "Internal: 30 GB used / 64 GB total\nExternal: 2 GB used / 32 GB total"
        );
    }
}
