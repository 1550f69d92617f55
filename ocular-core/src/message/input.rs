//! Pointer and keyboard traffic.
//!
//! `MouseLocation` flows host → viewer (where the host pointer is);
//! `MouseControl` and `KeyControl` flow viewer → host (input to
//! inject). Injection itself is the host collaborator's business —
//! this layer only frames the events.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::OcularError;
use crate::message::MessageType;
use crate::wire;

// ── MouseLocationMessage ─────────────────────────────────────────

/// Host pointer position, for the viewer to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseLocationMessage {
    x: i32,
    y: i32,
}

impl MouseLocationMessage {
    pub const WIRE_SIZE: usize = 1 + 4 + 4;

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    pub async fn encode<W>(&self, writer: &mut W) -> Result<(), OcularError>
    where
        W: AsyncWrite + Unpin,
    {
        wire::write_enum(writer, MessageType::MouseLocation as u8).await?;
        wire::write_i32(writer, self.x).await?;
        wire::write_i32(writer, self.y).await?;
        Ok(())
    }

    pub async fn decode_body<R>(reader: &mut R) -> Result<Self, OcularError>
    where
        R: AsyncRead + Unpin,
    {
        let x = wire::read_i32(reader).await?;
        let y = wire::read_i32(reader).await?;
        Ok(Self { x, y })
    }
}

// ── MouseControlMessage ──────────────────────────────────────────

/// What the pointer did.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Moved = 0,
    Pressed = 1,
    Released = 2,
    Wheeled = 3,
}

impl TryFrom<u8> for MouseAction {
    type Error = OcularError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MouseAction::Moved),
            1 => Ok(MouseAction::Pressed),
            2 => Ok(MouseAction::Released),
            3 => Ok(MouseAction::Wheeled),
            _ => Err(OcularError::UnknownVariant {
                type_name: "MouseAction",
                value,
            }),
        }
    }
}

/// Which button, when the action involves one.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    None = 0,
    Left = 1,
    Middle = 2,
    Right = 3,
}

impl TryFrom<u8> for MouseButton {
    type Error = OcularError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MouseButton::None),
            1 => Ok(MouseButton::Left),
            2 => Ok(MouseButton::Middle),
            3 => Ok(MouseButton::Right),
            _ => Err(OcularError::UnknownVariant {
                type_name: "MouseButton",
                value,
            }),
        }
    }
}

/// Pointer input to inject on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseControlMessage {
    action: MouseAction,
    button: MouseButton,
    x: i32,
    y: i32,
    /// Wheel rotation; meaningful only for [`MouseAction::Wheeled`].
    wheel: i32,
}

impl MouseControlMessage {
    pub const WIRE_SIZE: usize = 1 + 1 + 1 + 4 + 4 + 4;

    pub fn moved(x: i32, y: i32) -> Self {
        Self {
            action: MouseAction::Moved,
            button: MouseButton::None,
            x,
            y,
            wheel: 0,
        }
    }

    pub fn pressed(x: i32, y: i32, button: MouseButton) -> Self {
        Self {
            action: MouseAction::Pressed,
            button,
            x,
            y,
            wheel: 0,
        }
    }

    pub fn released(x: i32, y: i32, button: MouseButton) -> Self {
        Self {
            action: MouseAction::Released,
            button,
            x,
            y,
            wheel: 0,
        }
    }

    pub fn wheeled(x: i32, y: i32, wheel: i32) -> Self {
        Self {
            action: MouseAction::Wheeled,
            button: MouseButton::None,
            x,
            y,
            wheel,
        }
    }

    pub fn action(&self) -> MouseAction {
        self.action
    }

    pub fn button(&self) -> MouseButton {
        self.button
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn wheel(&self) -> i32 {
        self.wheel
    }

    pub fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    pub async fn encode<W>(&self, writer: &mut W) -> Result<(), OcularError>
    where
        W: AsyncWrite + Unpin,
    {
        wire::write_enum(writer, MessageType::MouseControl as u8).await?;
        wire::write_enum(writer, self.action as u8).await?;
        wire::write_enum(writer, self.button as u8).await?;
        wire::write_i32(writer, self.x).await?;
        wire::write_i32(writer, self.y).await?;
        wire::write_i32(writer, self.wheel).await?;
        Ok(())
    }

    pub async fn decode_body<R>(reader: &mut R) -> Result<Self, OcularError>
    where
        R: AsyncRead + Unpin,
    {
        let action = wire::read_enum(reader).await?;
        let button = wire::read_enum(reader).await?;
        let x = wire::read_i32(reader).await?;
        let y = wire::read_i32(reader).await?;
        let wheel = wire::read_i32(reader).await?;
        Ok(Self {
            action,
            button,
            x,
            y,
            wheel,
        })
    }
}

// ── KeyControlMessage ────────────────────────────────────────────

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Pressed = 0,
    Released = 1,
}

impl TryFrom<u8> for KeyAction {
    type Error = OcularError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(KeyAction::Pressed),
            1 => Ok(KeyAction::Released),
            _ => Err(OcularError::UnknownVariant {
                type_name: "KeyAction",
                value,
            }),
        }
    }
}

/// Keyboard input to inject on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyControlMessage {
    action: KeyAction,
    key_code: i32,
    /// Unicode scalar of the produced character, or -1 when the key
    /// produces none.
    character: i32,
}

impl KeyControlMessage {
    pub const WIRE_SIZE: usize = 1 + 1 + 4 + 4;

    pub fn pressed(key_code: i32, character: i32) -> Self {
        Self {
            action: KeyAction::Pressed,
            key_code,
            character,
        }
    }

    pub fn released(key_code: i32, character: i32) -> Self {
        Self {
            action: KeyAction::Released,
            key_code,
            character,
        }
    }

    pub fn action(&self) -> KeyAction {
        self.action
    }

    pub fn key_code(&self) -> i32 {
        self.key_code
    }

    pub fn character(&self) -> i32 {
        self.character
    }

    pub fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    pub async fn encode<W>(&self, writer: &mut W) -> Result<(), OcularError>
    where
        W: AsyncWrite + Unpin,
    {
        wire::write_enum(writer, MessageType::KeyControl as u8).await?;
        wire::write_enum(writer, self.action as u8).await?;
        wire::write_i32(writer, self.key_code).await?;
        wire::write_i32(writer, self.character).await?;
        Ok(())
    }

    pub async fn decode_body<R>(reader: &mut R) -> Result<Self, OcularError>
    where
        R: AsyncRead + Unpin,
    {
        let action = wire::read_enum(reader).await?;
        let key_code = wire::read_i32(reader).await?;
        let character = wire::read_i32(reader).await?;
        Ok(Self {
            action,
            key_code,
            character,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    async fn roundtrip(msg: Message) -> Message {
        let mut buf = Vec::new();
        msg.encode(&mut buf).await.unwrap();
        assert_eq!(buf.len(), msg.wire_size());

        let mut slice = buf.as_slice();
        let decoded = Message::decode(&mut slice).await.unwrap();
        assert!(slice.is_empty());
        decoded
    }

    #[tokio::test]
    async fn mouse_location_roundtrip() {
        let msg = Message::MouseLocation(MouseLocationMessage::new(640, -12));
        assert_eq!(roundtrip(msg.clone()).await, msg);
    }

    #[tokio::test]
    async fn mouse_control_roundtrip() {
        let events = [
            MouseControlMessage::moved(10, 20),
            MouseControlMessage::pressed(10, 20, MouseButton::Left),
            MouseControlMessage::released(10, 20, MouseButton::Right),
            MouseControlMessage::wheeled(10, 20, -3),
        ];
        for event in events {
            let msg = Message::MouseControl(event);
            assert_eq!(roundtrip(msg.clone()).await, msg);
        }
    }

    #[tokio::test]
    async fn key_control_roundtrip() {
        let msg = Message::KeyControl(KeyControlMessage::pressed(0x41, 'A' as i32));
        match roundtrip(msg).await {
            Message::KeyControl(decoded) => {
                assert_eq!(decoded.action(), KeyAction::Pressed);
                assert_eq!(decoded.key_code(), 0x41);
                assert_eq!(decoded.character(), 65);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_mouse_action_rejected() {
        // MouseControl envelope with an out-of-range action ordinal.
        let bytes = [MessageType::MouseControl as u8, 9];
        let mut slice = bytes.as_slice();
        let err = Message::decode(&mut slice).await.unwrap_err();
        assert!(matches!(
            err,
            OcularError::UnknownVariant {
                type_name: "MouseAction",
                value: 9,
            }
        ));
    }

    #[test]
    fn action_ordinals_are_stable() {
        assert_eq!(MouseAction::Moved as u8, 0);
        assert_eq!(MouseAction::Wheeled as u8, 3);
        assert_eq!(MouseButton::None as u8, 0);
        assert_eq!(MouseButton::Right as u8, 3);
        assert_eq!(KeyAction::Pressed as u8, 0);
        assert_eq!(KeyAction::Released as u8, 1);
    }
}
