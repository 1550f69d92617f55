//! Viewer-side session — consume frames, report disconnects.
//!
//! Rendering belongs to a GUI layer this binary does not carry; the
//! session decompresses each frame at the collaborator boundary and
//! keeps running statistics instead, which is enough to watch a host
//! live from a terminal.

use std::time::{Duration, Instant};

use ocular_core::{
    CaptureMessage, CompressionMethod, Connection, ConnectionEvent, DisconnectReason,
    HelloMessage, Message, OcularError,
};
use tracing::{debug, error, info, trace, warn};

use crate::config::ViewerConfig;

pub struct ViewerSession {
    config: ViewerConfig,
}

impl ViewerSession {
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    /// Connect and run until the host goes away.
    pub async fn run(&self) -> Result<(), OcularError> {
        let addr = &self.config.network.host_addr;
        let timeout = Duration::from_millis(self.config.network.connect_timeout_ms);

        info!("connecting to host at {addr}");
        let mut connection = tokio::time::timeout(timeout, Connection::connect(addr))
            .await
            .map_err(|_| std::io::Error::from(std::io::ErrorKind::TimedOut))??;

        connection
            .send(Message::Hello(HelloMessage::current()))
            .await?;

        // Liveness pings from a separate task, through the same
        // serialized writer.
        let ping_tx = connection.sender();
        let ping_interval = Duration::from_secs(self.config.session.ping_interval_secs.max(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(ping_interval);
            loop {
                interval.tick().await;
                if ping_tx.send(Message::Ping).await.is_err() {
                    break;
                }
            }
        });

        let mut stats = FrameStats::new();
        while let Some(event) = connection.recv().await {
            match event {
                ConnectionEvent::Message(Message::Hello(hello)) => {
                    info!("host speaks protocol {hello}");
                }
                ConnectionEvent::Message(Message::Capture(frame)) => {
                    self.handle_frame(frame, &mut stats)?;
                }
                ConnectionEvent::Message(Message::MouseLocation(location)) => {
                    trace!("host pointer at ({}, {})", location.x(), location.y());
                }
                ConnectionEvent::Message(Message::Ping) => {
                    trace!("ping from host");
                }
                ConnectionEvent::Message(Message::Goodbye) => {
                    info!("host said goodbye");
                    break;
                }
                ConnectionEvent::Message(other) => {
                    debug!("ignoring {} from host", other.message_type());
                }
                ConnectionEvent::Disconnected(reason) => {
                    match reason {
                        DisconnectReason::PeerClosed => info!("disconnected"),
                        DisconnectReason::Transport(detail) => info!("disconnected ({detail})"),
                        DisconnectReason::Protocol(detail) => error!("error, reason: {detail}"),
                    }
                    break;
                }
            }
        }
        Ok(())
    }

    fn handle_frame(
        &self,
        frame: CaptureMessage,
        stats: &mut FrameStats,
    ) -> Result<(), OcularError> {
        if let Some(cfg) = frame.configuration() {
            info!("codec (re)negotiated: {cfg}");
        }

        let pixels = match frame.method() {
            CompressionMethod::None => frame.payload().to_vec(),
            CompressionMethod::Zstd => {
                zstd::decode_all(frame.payload()).map_err(OcularError::Io)?
            }
            other => {
                warn!("no decoder for {other}; dropping frame {}", frame.id());
                return Ok(());
            }
        };

        stats.record(frame.id(), frame.payload().len(), pixels.len());
        Ok(())
    }
}

// ── FrameStats ───────────────────────────────────────────────────

/// Rolling per-second frame statistics, logged instead of rendered.
struct FrameStats {
    window_start: Instant,
    frames: u64,
    wire_bytes: u64,
    pixel_bytes: u64,
    last_id: Option<i32>,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            wire_bytes: 0,
            pixel_bytes: 0,
            last_id: None,
        }
    }

    fn record(&mut self, id: i32, wire_bytes: usize, pixel_bytes: usize) {
        if let Some(last) = self.last_id {
            if id != last.wrapping_add(1) {
                warn!("frame id jumped from {last} to {id}");
            }
        }
        self.last_id = Some(id);

        self.frames += 1;
        self.wire_bytes += wire_bytes as u64;
        self.pixel_bytes += pixel_bytes as u64;

        let elapsed = self.window_start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            let secs = elapsed.as_secs_f64();
            info!(
                "{:.1} fps, {:.0} KiB/s on the wire ({:.0} KiB/s decoded)",
                self.frames as f64 / secs,
                self.wire_bytes as f64 / 1024.0 / secs,
                self.pixel_bytes as f64 / 1024.0 / secs,
            );
            self.window_start = Instant::now();
            self.frames = 0;
            self.wire_bytes = 0;
            self.pixel_bytes = 0;
        }
    }
}
