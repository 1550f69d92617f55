//! Capture frame message — one compressed screen frame plus the
//! metadata the receiving side needs to decompress and order it.
//!
//! ## Wire format (all integers big-endian)
//!
//! ```text
//! type tag:        u8   (1)  MessageType::Capture
//! id:              i32  (4)  capture sequence number
//! method:          u8   (1)  CompressionMethod ordinal
//! config-present:  u8   (1)  0 or 1
//! [configuration]  var       full envelope, only if flag = 1
//! payload length:  i32  (4)
//! payload:         var       opaque compressed bytes
//! ```

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::OcularError;
use crate::message::compressor::{CompressionMethod, CompressorConfigurationMessage};
use crate::message::{Message, MessageType};
use crate::wire;

/// One capture frame in flight.
///
/// The payload is exclusively owned and immutable after construction;
/// the `id` is assigned monotonically by the producer and used by the
/// consumer only for ordering and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureMessage {
    id: i32,
    method: CompressionMethod,
    configuration: Option<CompressorConfigurationMessage>,
    payload: Bytes,
}

impl CaptureMessage {
    /// Envelope overhead without an embedded configuration:
    /// tag + id + method + flag + payload length.
    pub const BASE_WIRE_SIZE: usize = 1 + 4 + 1 + 1 + 4;

    /// Build a capture frame. The configuration is present only when
    /// codec parameters are being (re)negotiated.
    pub fn new(
        id: i32,
        method: CompressionMethod,
        configuration: Option<CompressorConfigurationMessage>,
        payload: impl Into<Bytes>,
    ) -> Result<Self, OcularError> {
        let payload = payload.into();
        if payload.len() > wire::MAX_PAYLOAD_SIZE {
            return Err(OcularError::PayloadTooLarge {
                size: payload.len(),
                max: wire::MAX_PAYLOAD_SIZE,
            });
        }
        Ok(Self {
            id,
            method,
            configuration,
            payload,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    pub fn configuration(&self) -> Option<&CompressorConfigurationMessage> {
        self.configuration.as_ref()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Exact encoded size. The embedded configuration contributes its
    /// own actual envelope size, never a fixed estimate.
    pub fn wire_size(&self) -> usize {
        let nested = self
            .configuration
            .as_ref()
            .map_or(0, |cfg| cfg.wire_size());
        Self::BASE_WIRE_SIZE + nested + self.payload.len()
    }

    /// Encode the complete envelope, type tag included.
    pub async fn encode<W>(&self, writer: &mut W) -> Result<(), OcularError>
    where
        W: AsyncWrite + Unpin,
    {
        wire::write_enum(writer, MessageType::Capture as u8).await?;
        wire::write_i32(writer, self.id).await?;
        wire::write_enum(writer, self.method as u8).await?;
        wire::write_u8(writer, self.configuration.is_some() as u8).await?;
        if let Some(cfg) = &self.configuration {
            // The nested message is embedded by value as a complete
            // envelope, its own type tag included.
            cfg.encode(writer).await?;
        }
        wire::write_length_prefixed(writer, &self.payload).await?;
        Ok(())
    }

    /// Decode the body; the type tag has already been consumed by the
    /// envelope dispatcher.
    pub async fn decode_body<R>(reader: &mut R) -> Result<Self, OcularError>
    where
        R: AsyncRead + Unpin,
    {
        let id = wire::read_i32(reader).await?;
        let method = wire::read_enum(reader).await?;

        let configuration = match wire::read_u8(reader).await? {
            0 => None,
            1 => {
                // Recurse through the envelope dispatcher so the nested
                // tag is validated the same way a top-level one is.
                // (Boxed: decode is self-referential here.)
                match Box::pin(Message::decode(reader)).await? {
                    Message::CompressorConfiguration(cfg) => Some(cfg),
                    other => {
                        return Err(OcularError::UnexpectedMessage {
                            expected: MessageType::CompressorConfiguration.name(),
                            got: other.message_type().name(),
                        });
                    }
                }
            }
            value => {
                return Err(OcularError::UnknownVariant {
                    type_name: "configuration flag",
                    value,
                });
            }
        };

        let payload = wire::read_length_prefixed(reader).await?;
        Ok(Self {
            id,
            method,
            configuration,
            payload: payload.into(),
        })
    }
}

impl std::fmt::Display for CaptureMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[id:{}] [{}] {} bytes",
            self.id,
            self.method,
            self.payload.len()
        )
    }
}

// ── Tests ────────────────────────────────────────────────────────
