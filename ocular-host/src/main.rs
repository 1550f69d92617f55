//! Ocular host — entry point.
//!
//! ```text
//! ocular-host                  Run in the foreground
//! ocular-host --config <path>  Load a custom config TOML
//! ocular-host --gen-config     Write the default config to stdout
//! ```

mod config;
mod producer;
mod service;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::HostConfig;
use crate::service::HostService;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ocular-host", about = "Ocular host — serves capture frames to a viewer")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "ocular-host.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&HostConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let config = HostConfig::load(&cli.config);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("ocular-host v{}", env!("CARGO_PKG_VERSION"));
    info!("port: {}", config.network.port);
    info!("target fps: {}", config.stream.fps);
    info!(
        "compression: {} level {}",
        config.stream.compression_method(),
        config.stream.level
    );

    let service = HostService::new(config);
    tokio::select! {
        result = service.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received — shutting down");
        }
    }

    Ok(())
}
