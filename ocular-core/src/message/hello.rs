//! Protocol revision handshake, sent by both sides on connect.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::OcularError;
use crate::message::MessageType;
use crate::wire;

/// Current protocol revision announced in [`HelloMessage::current`].
pub const PROTOCOL_MAJOR: i32 = 1;
pub const PROTOCOL_MINOR: i32 = 0;

/// First message on every connection, in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelloMessage {
    major: i32,
    minor: i32,
}

impl HelloMessage {
    pub const WIRE_SIZE: usize = 1 + 4 + 4;

    pub fn new(major: i32, minor: i32) -> Self {
        Self { major, minor }
    }

    /// Hello announcing the revision this build speaks.
    pub fn current() -> Self {
        Self::new(PROTOCOL_MAJOR, PROTOCOL_MINOR)
    }

    pub fn major(&self) -> i32 {
        self.major
    }

    pub fn minor(&self) -> i32 {
        self.minor
    }

    pub fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    pub async fn encode<W>(&self, writer: &mut W) -> Result<(), OcularError>
    where
        W: AsyncWrite + Unpin,
    {
        wire::write_enum(writer, MessageType::Hello as u8).await?;
        wire::write_i32(writer, self.major).await?;
        wire::write_i32(writer, self.minor).await?;
        Ok(())
    }

    pub async fn decode_body<R>(reader: &mut R) -> Result<Self, OcularError>
    where
        R: AsyncRead + Unpin,
    {
        let major = wire::read_i32(reader).await?;
        let minor = wire::read_i32(reader).await?;
        Ok(Self { major, minor })
    }
}

impl std::fmt::Display for HelloMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[tokio::test]
    async fn hello_roundtrip() {
        let hello = HelloMessage::current();

        let mut buf = Vec::new();
        hello.encode(&mut buf).await.unwrap();
        assert_eq!(buf.len(), hello.wire_size());
        assert_eq!(buf.len(), 9);

        let mut slice = buf.as_slice();
        match Message::decode(&mut slice).await.unwrap() {
            Message::Hello(decoded) => {
                assert_eq!(decoded.major(), PROTOCOL_MAJOR);
                assert_eq!(decoded.minor(), PROTOCOL_MINOR);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }
}
