//! Domain-specific error types for the ocular wire protocol.
//!
//! All fallible operations return `Result<T, OcularError>`.
//! No panics on bytes received from the peer — every failure is typed.

use thiserror::Error;

/// The canonical error type for the ocular protocol.
#[derive(Debug, Error)]
pub enum OcularError {
    // ── Transport ────────────────────────────────────────────────
    /// The peer closed the stream cleanly, between two messages.
    #[error("connection closed by peer")]
    Closed,

    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    /// An mpsc channel was closed unexpectedly.
    #[error("channel closed")]
    ChannelClosed,

    // ── Framing ──────────────────────────────────────────────────
    /// The stream ended while a message frame was still incomplete.
    #[error("truncated message: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    /// A wire ordinal did not map to any known enum variant.
    #[error("unknown {type_name} ordinal: {value:#04x}")]
    UnknownVariant { type_name: &'static str, value: u8 },

    /// An embedded message carried a tag other than the one required
    /// at that position.
    #[error("unexpected message type: expected {expected}, got {got}")]
    UnexpectedMessage {
        expected: &'static str,
        got: &'static str,
    },

    /// A length field decoded to a negative value.
    #[error("negative length field: {0}")]
    NegativeLength(i32),

    /// A payload exceeds the protocol maximum, either at construction
    /// or as a declared length on the wire.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for OcularError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        OcularError::ChannelClosed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = OcularError::Truncated {
            expected: 100,
            got: 42,
        };
        assert!(e.to_string().contains("100"));
        assert!(e.to_string().contains("42"));

        let e = OcularError::UnknownVariant {
            type_name: "MessageType",
            value: 0xFF,
        };
        assert!(e.to_string().contains("MessageType"));
        assert!(e.to_string().contains("0xff"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: OcularError = io_err.into();
        assert!(matches!(e, OcularError::Io(_)));
    }
}
