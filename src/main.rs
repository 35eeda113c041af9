//! USB device discovery - CLI entry point.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use hotplugd::UsbDevice;
use hotplugd::config::{Config, example_config};
use hotplugd::logging::setup_logging;
use hotplugd::sysfs::DiscoveryMode;

#[derive(Parser)]
#[command(name = "hotplugd")]
#[command(about = "Discover USB devices attached to this host")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: auto-detect)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// USB bus device directory (default: /sys/bus/usb/devices)
    #[arg(long)]
    sysfs: Option<PathBuf>,

    /// Skip unreadable devices instead of failing
    #[arg(long)]
    best_effort: bool,

    /// Log filter when RUST_LOG is not set (e.g. "debug")
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List attached USB devices
    List {
        /// Show only devices with this vendor ID (e.g. 046d)
        #[arg(long)]
        vendor: Option<String>,

        /// Show the sysfs node of each device
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print example config file
    InitConfig,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "hotplugd", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::InitConfig) => {
            print!("{}", example_config());
            return Ok(());
        }
        _ => {}
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    // Command line flags override the config file
    if let Some(path) = cli.sysfs {
        config.discovery.sysfs_path = path;
    }
    if cli.best_effort {
        config.discovery.best_effort = true;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    setup_logging(&config.logging.level)?;

    let discovery = config.discovery();
    tracing::debug!(
        path = %discovery.base_path().display(),
        best_effort = discovery.mode() == DiscoveryMode::BestEffort,
        "Discovering USB devices"
    );
    let devices = discovery.discover()?;

    let (vendor, verbose) = match cli.command {
        Some(Commands::List { vendor, verbose }) => (vendor, verbose),
        _ => (None, false),
    };
    print_device_list(&devices, vendor.as_deref(), verbose);

    Ok(())
}

fn print_device_list(devices: &[UsbDevice], vendor: Option<&str>, verbose: bool) {
    for device in devices {
        if let Some(vendor) = vendor
            && !device.vendor_id().eq_ignore_ascii_case(vendor)
        {
            continue;
        }

        if verbose {
            println!("{}  {}", device, device.node().display());
        } else {
            println!("{}", device);
        }
    }
}
