//! Metec BD braille display driver CLI
//!
//! Inspect a connected BD-20/BD-40, watch its keys and write cells.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use metec_driver::DriverConfig;
use tracing::info;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;
use commands::Source;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config
    let config_path = cli.config.clone().unwrap_or_else(DriverConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let config = DriverConfig::load(&config_path)?;

    let source = Source {
        replay: cli.replay.as_deref(),
        printer: commands::create_printer_config(cli.monitor, cli.hex, cli.all),
    };

    match cli.command {
        // Default: show device info
        None | Some(Commands::Info) => commands::query::info(&source, &config)?,
        Some(Commands::List) => commands::query::list()?,
        Some(Commands::Watch) => commands::watch::watch(&source, &config)?,
        Some(Commands::Display { cells, hold_ms }) => {
            commands::display::display(&source, &config, &cells, Duration::from_millis(hold_ms))?
        }
        Some(Commands::Clear) => commands::display::clear(&source, &config)?,
        Some(Commands::SaveConfig) => {
            config.save(&config_path)?;
            println!("Config written to {}", config_path.display());
        }
    }

    Ok(())
}
