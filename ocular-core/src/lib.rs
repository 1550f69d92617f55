//! # ocular-core
//!
//! Core protocol library for ocular — screen sharing between a
//! controlling viewer and a controlled host over a single duplex
//! byte stream.
//!
//! This crate contains:
//! - **Wire codec**: big-endian primitives, one-byte enum ordinals and
//!   length-prefixed buffers, built on a single partial-read-tolerant
//!   full-frame reader
//! - **Messages**: the `MessageType` registry, the `Message` envelope
//!   with its dispatch, and every variant (capture frames, compressor
//!   configuration, pointer/keyboard traffic, handshake, liveness)
//! - **Fault classification**: transport vs protocol vs fatal, and the
//!   process-level escalation policy
//! - **Connection**: the paired read/write loops and the event handoff
//!   to the session

pub mod connection;
pub mod error;
pub mod fault;
pub mod message;
pub mod wire;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use connection::{Connection, ConnectionEvent, DisconnectReason};
pub use error::OcularError;
pub use fault::FaultKind;
pub use message::{
    CaptureMessage, CompressionMethod, CompressorConfigurationMessage, HelloMessage,
    KeyControlMessage, Message, MessageType, MouseControlMessage, MouseLocationMessage,
};
pub use wire::MAX_PAYLOAD_SIZE;
