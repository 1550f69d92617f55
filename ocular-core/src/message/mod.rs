//! Message envelope, type registry and dispatch.
//!
//! Every encoded message begins with one byte: its [`MessageType`]
//! ordinal. Decoding is two-phase — read the tag, then invoke the
//! decoder for that variant. Variant decoders that embed another
//! message call [`Message::decode`] recursively, so nested messages
//! stay complete, independently-decodable envelopes.

pub mod capture;
pub mod compressor;
pub mod hello;
pub mod input;

use tokio::io::{AsyncRead, AsyncWrite};

pub use capture::CaptureMessage;
pub use compressor::{CompressionMethod, CompressorConfigurationMessage};
pub use hello::HelloMessage;
pub use input::{
    KeyAction, KeyControlMessage, MouseAction, MouseButton, MouseControlMessage,
    MouseLocationMessage,
};

use crate::error::OcularError;
use crate::wire;

// ── MessageType ──────────────────────────────────────────────────

/// Wire ordinal of each message variant.
///
/// The set is closed and append-only: new variants go at the end of
/// the ordinal space, and an ordinal stays reserved forever once
/// assigned — even if its variant is later removed — so peers running
/// different protocol revisions never misread a stale tag as a
/// different current variant.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Protocol revision handshake.
    Hello = 0,
    /// One compressed capture frame.
    Capture = 1,
    /// Codec tunables, standalone or embedded in a capture.
    CompressorConfiguration = 2,
    /// Pointer position on the host (host → viewer).
    MouseLocation = 3,
    /// Pointer input to inject (viewer → host).
    MouseControl = 4,
    /// Keyboard input to inject (viewer → host).
    KeyControl = 5,
    /// Liveness probe.
    Ping = 6,
    /// Graceful close.
    Goodbye = 7,
}

impl MessageType {
    pub fn name(&self) -> &'static str {
        match self {
            MessageType::Hello => "Hello",
            MessageType::Capture => "Capture",
            MessageType::CompressorConfiguration => "CompressorConfiguration",
            MessageType::MouseLocation => "MouseLocation",
            MessageType::MouseControl => "MouseControl",
            MessageType::KeyControl => "KeyControl",
            MessageType::Ping => "Ping",
            MessageType::Goodbye => "Goodbye",
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = OcularError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MessageType::Hello),
            1 => Ok(MessageType::Capture),
            2 => Ok(MessageType::CompressorConfiguration),
            3 => Ok(MessageType::MouseLocation),
            4 => Ok(MessageType::MouseControl),
            5 => Ok(MessageType::KeyControl),
            6 => Ok(MessageType::Ping),
            7 => Ok(MessageType::Goodbye),
            _ => Err(OcularError::UnknownVariant {
                type_name: "MessageType",
                value,
            }),
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Message ──────────────────────────────────────────────────────

/// A fully-assembled protocol message.
///
/// Messages are ephemeral: built per send or per successful decode,
/// handed once across the connection boundary, never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Hello(HelloMessage),
    Capture(CaptureMessage),
    CompressorConfiguration(CompressorConfigurationMessage),
    MouseLocation(MouseLocationMessage),
    MouseControl(MouseControlMessage),
    KeyControl(KeyControlMessage),
    Ping,
    Goodbye,
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Hello(_) => MessageType::Hello,
            Message::Capture(_) => MessageType::Capture,
            Message::CompressorConfiguration(_) => MessageType::CompressorConfiguration,
            Message::MouseLocation(_) => MessageType::MouseLocation,
            Message::MouseControl(_) => MessageType::MouseControl,
            Message::KeyControl(_) => MessageType::KeyControl,
            Message::Ping => MessageType::Ping,
            Message::Goodbye => MessageType::Goodbye,
        }
    }

    /// Exact number of bytes [`encode`](Self::encode) will produce.
    ///
    /// A pure function of the fields; any divergence from the encoded
    /// byte count is a protocol defect, not a tolerated approximation.
    pub fn wire_size(&self) -> usize {
        match self {
            Message::Hello(m) => m.wire_size(),
            Message::Capture(m) => m.wire_size(),
            Message::CompressorConfiguration(m) => m.wire_size(),
            Message::MouseLocation(m) => m.wire_size(),
            Message::MouseControl(m) => m.wire_size(),
            Message::KeyControl(m) => m.wire_size(),
            // tag only
            Message::Ping | Message::Goodbye => 1,
        }
    }

    /// Encode the complete envelope — type tag, then variant body.
    pub async fn encode<W>(&self, writer: &mut W) -> Result<(), OcularError>
    where
        W: AsyncWrite + Unpin,
    {
        match self {
            Message::Hello(m) => m.encode(writer).await,
            Message::Capture(m) => m.encode(writer).await,
            Message::CompressorConfiguration(m) => m.encode(writer).await,
            Message::MouseLocation(m) => m.encode(writer).await,
            Message::MouseControl(m) => m.encode(writer).await,
            Message::KeyControl(m) => m.encode(writer).await,
            Message::Ping => wire::write_enum(writer, MessageType::Ping as u8).await,
            Message::Goodbye => wire::write_enum(writer, MessageType::Goodbye as u8).await,
        }
    }

    /// Decode one complete message from the stream.
    ///
    /// Reads the type tag, then dispatches to the variant decoder.
    /// End-of-stream on the tag byte itself is a clean close
    /// ([`OcularError::Closed`]), not a truncated frame.
    pub async fn decode<R>(reader: &mut R) -> Result<Message, OcularError>
    where
        R: AsyncRead + Unpin,
    {
        let tag = match wire::read_u8(reader).await {
            Err(OcularError::Truncated { got: 0, .. }) => return Err(OcularError::Closed),
            other => other?,
        };

        match MessageType::try_from(tag)? {
            MessageType::Hello => Ok(Message::Hello(HelloMessage::decode_body(reader).await?)),
            MessageType::Capture => {
                Ok(Message::Capture(CaptureMessage::decode_body(reader).await?))
            }
            MessageType::CompressorConfiguration => Ok(Message::CompressorConfiguration(
                CompressorConfigurationMessage::decode_body(reader).await?,
            )),
            MessageType::MouseLocation => Ok(Message::MouseLocation(
                MouseLocationMessage::decode_body(reader).await?,
            )),
            MessageType::MouseControl => Ok(Message::MouseControl(
                MouseControlMessage::decode_body(reader).await?,
            )),
            MessageType::KeyControl => Ok(Message::KeyControl(
                KeyControlMessage::decode_body(reader).await?,
            )),
            MessageType::Ping => Ok(Message::Ping),
            MessageType::Goodbye => Ok(Message::Goodbye),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
