//! Configuration for the host service.

use std::path::Path;

use ocular_core::CompressionMethod;
use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Outbound frame stream settings.
    pub stream: StreamConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address to bind the listener on.
    pub listen_addr: String,
    /// TCP port to listen for viewer connections.
    pub port: u16,
}

/// Frame stream configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Target frames per second.
    pub fps: u8,
    /// Compression method: "none" or "zstd".
    pub method: String,
    /// Compression level passed to the codec.
    pub level: i32,
    /// Generated frame width in pixels.
    pub frame_width: usize,
    /// Generated frame height in pixels.
    pub frame_height: usize,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".into(),
            port: 9750,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            fps: 20,
            method: "zstd".into(),
            level: 3,
            frame_width: 640,
            frame_height: 480,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl HostConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

impl StreamConfig {
    /// The compression method named in the config file. Unknown names
    /// fall back to zstd with a warning.
    pub fn compression_method(&self) -> CompressionMethod {
        match self.method.as_str() {
            "none" => CompressionMethod::None,
            "zstd" => CompressionMethod::Zstd,
            other => {
                tracing::warn!("unsupported compression method {other:?}; using zstd");
                CompressionMethod::Zstd
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
