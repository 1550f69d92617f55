//! Compressor configuration — the codec identifier and its tunables.
//!
//! The configuration is fully self-describing: decoding needs nothing
//! beyond the bytes of the message itself, so it can travel standalone
//! or embedded by value inside a capture frame.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::OcularError;
use crate::message::MessageType;
use crate::wire;

// ── CompressionMethod ────────────────────────────────────────────

/// Identifier of the codec applied to a capture payload.
///
/// Ordinals are wire-stable; append only.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    /// Payload is raw, uncompressed bytes.
    None = 0,
    Gzip = 1,
    Xz = 2,
    Zstd = 3,
}

impl TryFrom<u8> for CompressionMethod {
    type Error = OcularError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CompressionMethod::None),
            1 => Ok(CompressionMethod::Gzip),
            2 => Ok(CompressionMethod::Xz),
            3 => Ok(CompressionMethod::Zstd),
            _ => Err(OcularError::UnknownVariant {
                type_name: "CompressionMethod",
                value,
            }),
        }
    }
}

impl std::fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionMethod::None => write!(f, "none"),
            CompressionMethod::Gzip => write!(f, "gzip"),
            CompressionMethod::Xz => write!(f, "xz"),
            CompressionMethod::Zstd => write!(f, "zstd"),
        }
    }
}

// ── CompressorConfigurationMessage ───────────────────────────────

/// Codec tunables announced when parameters are (re)negotiated.
///
/// `level` is interpreted per method: zstd/gzip compression level, xz
/// preset. Meaningless for [`CompressionMethod::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressorConfigurationMessage {
    method: CompressionMethod,
    level: i32,
}

impl CompressorConfigurationMessage {
    /// Encoded size of the full envelope: tag + method + level.
    pub const WIRE_SIZE: usize = 1 + 1 + 4;

    pub fn new(method: CompressionMethod, level: i32) -> Self {
        Self { method, level }
    }

    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    /// Encode the complete envelope, type tag included.
    pub async fn encode<W>(&self, writer: &mut W) -> Result<(), OcularError>
    where
        W: AsyncWrite + Unpin,
    {
        wire::write_enum(writer, MessageType::CompressorConfiguration as u8).await?;
        wire::write_enum(writer, self.method as u8).await?;
        wire::write_i32(writer, self.level).await?;
        Ok(())
    }

    /// Decode the body; the type tag has already been consumed by the
    /// envelope dispatcher.
    pub async fn decode_body<R>(reader: &mut R) -> Result<Self, OcularError>
    where
        R: AsyncRead + Unpin,
    {
        let method = wire::read_enum(reader).await?;
        let level = wire::read_i32(reader).await?;
        Ok(Self { method, level })
    }
}

impl std::fmt::Display for CompressorConfigurationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} level:{}]", self.method, self.level)
    }
}

// ── Tests ────────────────────────────────────────────────────────
