use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use env_logger::Env;
use log::{info, LevelFilter};
use std::path::PathBuf;

use fabricconf::config_loader::{self, CliOverrides};
use fabricconf::orchestrator::generate_fabric_config;

/// Data-plane configuration synthesizer for network fabrics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the fabric configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for topology and rule files (overrides the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leave host-facing links out of the topology file
    #[arg(long)]
    exclude_host_links: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging before anything logs. RUST_LOG, when set, wins over
    // the configured level; otherwise the filter starts at "info".
    let rust_log = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(Env::default().default_filter_or("trace")).init();
    if !rust_log {
        log::set_max_level(LevelFilter::Info);
    }

    let mut config = config_loader::load_config(&args.config)?;
    config_loader::apply_overrides(
        &mut config,
        &CliOverrides {
            output: args.output.clone(),
            exclude_host_links: args.exclude_host_links,
        },
    )?;

    if !rust_log {
        log::set_max_level(log_filter(config.general.log_level.as_deref())?);
    }

    info!("Starting fabricconf");
    info!("Configuration file: {:?}", args.config);
    info!("Output directory: {:?}", config.general.output);

    let summary = generate_fabric_config(&config)?;

    info!(
        "Done: {} switches, {} hosts, {} rules",
        summary.switches, summary.hosts, summary.rules
    );
    Ok(())
}

/// Level filter for a configured `general.log_level`, "info" when unset
fn log_filter(level: Option<&str>) -> Result<LevelFilter> {
    match level {
        Some(level) => level
            .parse()
            .map_err(|_| eyre!("Invalid log level '{}'", level)),
        None => Ok(LevelFilter::Info),
    }
}
