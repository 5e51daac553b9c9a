//! Device Pulse - Battery, RAM and Storage Readout Binary
//!
//! A standalone binary that prints device metrics once, or keeps them on
//! screen with a paced refresh on each Enter press.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use device_pulse::{
    DeviceMetricsCollector, DeviceReport, DisplayState, DisplaySurface, DisplayText,
    ExternalVolumes, MonitorConfig, PlatformProbe, RefreshController, SystemProbe,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "device_pulse")]
#[command(about = "🔋 Device Pulse - battery, RAM and storage readout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Austin Couch")]
#[command(long_about = "Reads battery level, installed RAM and storage usage, once or on demand")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Delay between a refresh request and the re-read, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Path whose filesystem is reported as internal storage
    #[arg(long)]
    internal_path: Option<PathBuf>,

    /// External volume to report: an enumeration index or 'all'
    #[arg(long)]
    external_volume: Option<ExternalVolumes>,

    /// External volume path used when volumes cannot be enumerated
    #[arg(long)]
    external_path: Option<PathBuf>,

    /// Use the legacy memory table and single external path
    #[arg(long)]
    legacy: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep the metrics on screen and refresh on Enter (default)
    Watch,

    /// Print a single report and exit
    Snapshot(SnapshotArgs),

    /// Show probe capabilities and resolved paths
    Info,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;
    let config = build_config(&cli)?;

    match &cli.command {
        Some(Commands::Watch) | None => watch_command(config).await?,
        Some(Commands::Snapshot(args)) => snapshot_command(config, args)?,
        Some(Commands::Info) => info_command(config)?,
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Config file first, then command-line overrides.
fn build_config(cli: &Cli) -> anyhow::Result<MonitorConfig> {
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MonitorConfig::default(),
    };

    if let Some(delay_ms) = cli.delay_ms {
        config = config.with_refresh_delay_ms(delay_ms);
    }
    if let Some(path) = &cli.internal_path {
        config = config.with_internal_path(path.clone());
    }
    if let Some(selection) = cli.external_volume {
        config = config.with_external_volumes(selection);
    }
    if cli.external_path.is_some() {
        config = config.with_external_path(cli.external_path.clone());
    }
    if cli.legacy {
        config = config.with_legacy_apis(true);
    }

    Ok(config)
}

fn collector_for(config: &MonitorConfig) -> DeviceMetricsCollector<SystemProbe> {
    DeviceMetricsCollector::new(SystemProbe::new(config.clone()))
        .with_external_volumes(config.external_volumes)
}

fn print_banner() {
    println!("🔋 Device Pulse - Battery, RAM and Storage");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
}

/// Prints the fields whenever the controller finishes a batch of changes.
#[derive(Default)]
struct TerminalDisplay {
    state: DisplayState,
}

impl DisplaySurface for TerminalDisplay {
    fn set_battery_text(&mut self, text: &str) {
        self.state.set_battery_text(text);
    }

    fn set_ram_text(&mut self, text: &str) {
        self.state.set_ram_text(text);
    }

    fn set_storage_text(&mut self, text: &str) {
        self.state.set_storage_text(text);
    }

    fn set_refresh_enabled(&mut self, enabled: bool) {
        self.state.set_refresh_enabled(enabled);
    }

    fn is_refresh_enabled(&self) -> bool {
        self.state.is_refresh_enabled()
    }

    fn set_busy(&mut self, busy: bool) {
        self.state.set_busy(busy);
    }

    fn render(&mut self) {
        if self.state.busy {
            println!("⏳ Refreshing...");
            return;
        }
        println!("{}", self.state.battery_text);
        println!("{}", self.state.ram_text);
        println!("{}", self.state.storage_text);
        println!();
    }
}

async fn watch_command(config: MonitorConfig) -> anyhow::Result<()> {
    print_banner();

    let collector = Arc::new(collector_for(&config));
    let display = Arc::new(Mutex::new(TerminalDisplay::default()));
    let mut controller = RefreshController::new(collector, display, config.refresh_delay());

    controller.load_initial();
    info!("Watching with {}ms refresh delay", controller.delay().as_millis());
    println!("Press Enter to refresh, 'q' then Enter to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }
        if !controller.trigger() {
            println!("Refresh already in progress");
        }
    }

    Ok(())
}

fn snapshot_command(config: MonitorConfig, args: &SnapshotArgs) -> anyhow::Result<()> {
    let report = collector_for(&config).collect();

    match args.format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        "pretty" => {
            print_banner();
            print_pretty_report(&report);
        }
        other => bail!("Unsupported format: {}. Use 'json' or 'pretty'", other),
    }

    Ok(())
}

fn info_command(config: MonitorConfig) -> anyhow::Result<()> {
    print_banner();
    println!("Device Pulse Probe Information");
    println!("==============================");
    println!();

    let probe = SystemProbe::new(config);
    let config = probe.config();
    let caps = probe.capabilities();

    println!("Capabilities:");
    println!("  Memory-info service: {}", yes_no(caps.memory_info_api));
    println!("  Volume enumeration: {}", yes_no(caps.volume_enumeration));
    println!();

    println!("Sources:");
    println!("  Power supply: {}", config.power_supply_dir.display());
    println!("  Memory table: {}", config.meminfo_path.display());
    println!("  Internal storage: {}", probe.internal_storage_path().display());
    println!("  External selection: {}", config.external_volumes);
    match probe.legacy_external_path() {
        Some(path) => println!("  Legacy external path: {}", path.display()),
        None => println!("  Legacy external path: (none)"),
    }
    println!();

    if caps.volume_enumeration {
        println!("Volumes:");
        for (index, volume) in probe.storage_volumes()?.iter().enumerate() {
            println!("  [{}] {}", index, volume.display());
        }
    }

    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "✓"
    } else {
        "✗"
    }
}

fn print_pretty_report(report: &DeviceReport) {
    println!(
        "📱 Device Report ({})",
        chrono::DateTime::from_timestamp_millis(report.timestamp as i64)
            .unwrap_or_default()
            .format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("==========================================");
    println!();

    let text = DisplayText::from(report);
    println!("{}", text.battery);
    println!("{}", text.ram);
    println!("{}", text.storage);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli =
            Cli::try_parse_from(["device_pulse", "--delay-ms", "250", "--external-volume", "all"])
                .unwrap();
        assert_eq!(cli.delay_ms, Some(250));
        assert_eq!(cli.external_volume, Some(ExternalVolumes::All));
    }

    #[test]
    fn test_bad_external_volume_is_rejected() {
        assert!(Cli::try_parse_from(["device_pulse", "--external-volume", "sd"]).is_err());
    }

    #[test]
    fn test_overrides_apply_over_defaults() {
        let cli = Cli::try_parse_from([
            "device_pulse",
            "--delay-ms",
            "10",
            "--external-volume",
            "0",
            "--legacy",
            "snapshot",
            "--format",
            "json",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.refresh_delay_ms, 10);
        assert_eq!(config.external_volumes, ExternalVolumes::Index(0));
        assert!(config.legacy_apis);
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["device_pulse"]).unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.refresh_delay_ms, device_pulse::DEFAULT_REFRESH_DELAY_MS);
        assert_eq!(config.external_volumes, ExternalVolumes::Index(1));
        assert!(cli.command.is_none());
    }
}
