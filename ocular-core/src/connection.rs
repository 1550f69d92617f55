//! Managed duplex connection — one reader task, one writer task.
//!
//! Send and receive are two independent loops that talk to the rest
//! of the system only through channels. The writer task drains an
//! mpsc queue, so the write path is serialized by construction: two
//! encodings can never interleave their bytes, and only one message
//! is in flight on the wire at a time. Messages cross the wire in
//! strict send order; there is no reordering and no multiplexing.
//!
//! Cancellation is closing the stream — a pending read or write
//! unblocks with an end-of-stream or error condition, which the
//! fault classifier turns into a disconnect event.

use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::error::OcularError;
use crate::fault::{self, FaultKind};
use crate::message::Message;

const CHANNEL_DEPTH: usize = 100;

// ── Events ───────────────────────────────────────────────────────

/// Why a connection ended, in terms the session can show the user:
/// "disconnected" for the first two, "error, reason: …" for the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The peer closed the stream between two messages.
    PeerClosed,
    /// The transport failed in one of the ways networks normally do.
    Transport(String),
    /// The framing can no longer be trusted; the connection must be
    /// torn down and re-established.
    Protocol(String),
}

impl std::fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisconnectReason::PeerClosed => write!(f, "peer closed the connection"),
            DisconnectReason::Transport(detail) => write!(f, "transport fault: {detail}"),
            DisconnectReason::Protocol(detail) => write!(f, "protocol violation: {detail}"),
        }
    }
}

/// What the reader task hands to the single consumer.
#[derive(Debug)]
pub enum ConnectionEvent {
    /// A fully-assembled inbound message.
    Message(Message),
    /// The connection ended; no further events will follow.
    Disconnected(DisconnectReason),
}

// ── Connection ───────────────────────────────────────────────────

/// A managed connection to a single peer.
///
/// Dropping the handle closes both loops: the writer ends when its
/// queue does, and the reader ends once its consumer is gone.
#[derive(Debug)]
pub struct Connection {
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<ConnectionEvent>,
}

impl Connection {
    /// Take ownership of a connected stream and spawn the two loops.
    pub fn new(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();

        // Session -> wire.
        let (user_tx, outbound_rx) = mpsc::channel(CHANNEL_DEPTH);
        // Wire -> session (single-consumer handoff).
        let (event_tx, user_rx) = mpsc::channel(CHANNEL_DEPTH);

        tokio::spawn(write_loop(write_half, outbound_rx));
        tokio::spawn(read_loop(read_half, event_tx));

        Self {
            tx: user_tx,
            rx: user_rx,
        }
    }

    /// Connect to a peer and wrap the stream.
    pub async fn connect(addr: &str) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }

    /// Queue a message for transmission.
    pub async fn send(&self, message: Message) -> Result<(), OcularError> {
        self.tx.send(message).await?;
        Ok(())
    }

    /// Receive the next event. `None` once both the connection and
    /// its event queue are finished.
    pub async fn recv(&mut self) -> Option<ConnectionEvent> {
        self.rx.recv().await
    }

    /// A cloneable handle for producing outbound messages from other
    /// tasks. All clones feed the same serialized writer.
    pub fn sender(&self) -> mpsc::Sender<Message> {
        self.tx.clone()
    }
}

// ── Loops ────────────────────────────────────────────────────────

async fn read_loop(mut reader: OwnedReadHalf, events: mpsc::Sender<ConnectionEvent>) {
    loop {
        match Message::decode(&mut reader).await {
            Ok(message) => {
                if events.send(ConnectionEvent::Message(message)).await.is_err() {
                    // Consumer dropped; nobody is listening anymore.
                    break;
                }
            }
            Err(err) => {
                let reason = match fault::classify(&err) {
                    FaultKind::Transport => {
                        info!("connection ended: {err}");
                        match err {
                            OcularError::Closed => DisconnectReason::PeerClosed,
                            other => DisconnectReason::Transport(other.to_string()),
                        }
                    }
                    FaultKind::Protocol => {
                        error!("tearing down connection: {err}");
                        DisconnectReason::Protocol(err.to_string())
                    }
                    FaultKind::Fatal => fault::fatal(&err),
                };
                let _ = events.send(ConnectionEvent::Disconnected(reason)).await;
                break;
            }
        }
    }
}

async fn write_loop(mut writer: OwnedWriteHalf, mut outbound: mpsc::Receiver<Message>) {
    while let Some(message) = outbound.recv().await {
        if let Err(err) = message.encode(&mut writer).await {
            match fault::classify(&err) {
                FaultKind::Transport => info!("send path closed: {err}"),
                FaultKind::Protocol => error!("send failed: {err}"),
                FaultKind::Fatal => fault::fatal(&err),
            }
            break;
        }
    }
    // Queue finished or the peer is gone; dropping the half sends FIN.
}
