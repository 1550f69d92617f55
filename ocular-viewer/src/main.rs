//! Ocular viewer — entry point.
//!
//! ```text
//! ocular-viewer                   Connect using the default config
//! ocular-viewer --config <path>   Load a custom config TOML
//! ocular-viewer --host <addr>     Override the host address
//! ocular-viewer --gen-config      Write the default config to stdout
//! ```

mod config;
mod session;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ViewerConfig;
use crate::session::ViewerSession;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ocular-viewer", about = "Ocular viewer — watch a remote host")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "ocular-viewer.toml")]
    config: PathBuf,

    /// Host address (`ip:port`), overriding the config file.
    #[arg(long)]
    host: Option<String>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&ViewerConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let mut config = ViewerConfig::load(&cli.config);
    if let Some(host) = cli.host {
        config.network.host_addr = host;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("ocular-viewer v{}", env!("CARGO_PKG_VERSION"));

    let session = ViewerSession::new(config);
    tokio::select! {
        result = session.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received — shutting down");
        }
    }

    Ok(())
}
