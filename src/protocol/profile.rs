//! Protocol profiles.
//!
//! A profile bundles one opcode set with one framing layout. The connection
//! and shell layers are generic over [`Profile`], so the same plumbing speaks
//! either protocol without mixing their opcodes.

use std::fmt;

use super::frame::Command;
use super::frame_buffer::FrameBuffer;
use super::opcodes::{DeviceOpcode, DEVICE_PROFILE, MESSAGE_PROFILE};
use super::wire_format::FramingOptions;
use crate::error::{FramingError, Result};

/// Incremental decoder fed with raw socket reads.
pub trait Decoder: Send {
    /// Decoded item type.
    type Item;

    /// Append `data` and return every complete item.
    ///
    /// Items decoded before a bad packet are returned; the error is held
    /// for [`Decoder::take_error`] or the next push.
    fn push(&mut self, data: &[u8]) -> Result<Vec<Self::Item>>;

    /// Take the error held back by the last push, if any.
    fn take_error(&mut self) -> Option<FramingError>;

    /// True when no partial packet is buffered.
    fn is_empty(&self) -> bool;
}

/// One self-consistent opcode set plus framing layout.
pub trait Profile: Send + Sync + 'static {
    /// Command type carried by this profile.
    type Command: fmt::Debug + Send;
    /// Streaming decoder for incoming bytes.
    type Decoder: Decoder<Item = Self::Command>;

    /// Profile name for logs and errors.
    const NAME: &'static str;

    /// Encode a command into one packet.
    fn encode(&self, command: &Self::Command) -> Result<Vec<u8>>;

    /// Create a fresh decoder for one connection.
    fn decoder(&self) -> Self::Decoder;
}

/// Length-prefixed message protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageProtocol {
    options: FramingOptions,
}

impl MessageProtocol {
    pub fn new(options: FramingOptions) -> Self {
        Self { options }
    }
}

impl Profile for MessageProtocol {
    type Command = Command;
    type Decoder = CommandBuffer;

    const NAME: &'static str = MESSAGE_PROFILE;

    fn encode(&self, command: &Command) -> Result<Vec<u8>> {
        Ok(command.encode_with(&self.options)?)
    }

    fn decoder(&self) -> CommandBuffer {
        CommandBuffer {
            frames: FrameBuffer::with_options(self.options),
            pending_error: None,
        }
    }
}

/// [`FrameBuffer`] that converts frames into [`Command`]s.
///
/// Frames after one that fails to convert in the same push are dropped.
pub struct CommandBuffer {
    frames: FrameBuffer,
    pending_error: Option<FramingError>,
}

impl Decoder for CommandBuffer {
    type Item = Command;

    fn push(&mut self, data: &[u8]) -> Result<Vec<Command>> {
        if let Some(err) = self.pending_error.take() {
            return Err(err.into());
        }

        let mut commands = Vec::new();
        for frame in self.frames.push(data)? {
            match Command::try_from(frame) {
                Ok(command) => commands.push(command),
                Err(err) if commands.is_empty() => return Err(err.into()),
                Err(err) => {
                    self.pending_error = Some(err);
                    break;
                }
            }
        }
        Ok(commands)
    }

    fn take_error(&mut self) -> Option<FramingError> {
        self.pending_error
            .take()
            .or_else(|| self.frames.take_error())
    }

    fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Single-byte device-toggle protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceToggleProtocol;

impl Profile for DeviceToggleProtocol {
    type Command = DeviceOpcode;
    type Decoder = OpcodeBuffer;

    const NAME: &'static str = DEVICE_PROFILE;

    fn encode(&self, command: &DeviceOpcode) -> Result<Vec<u8>> {
        Ok(command.encode().to_vec())
    }

    fn decoder(&self) -> OpcodeBuffer {
        OpcodeBuffer::default()
    }
}

/// Every byte is one complete device command.
#[derive(Debug, Default)]
pub struct OpcodeBuffer {
    pending_error: Option<FramingError>,
}

impl Decoder for OpcodeBuffer {
    type Item = DeviceOpcode;

    fn push(&mut self, data: &[u8]) -> Result<Vec<DeviceOpcode>> {
        if let Some(err) = self.pending_error.take() {
            return Err(err.into());
        }

        let mut opcodes = Vec::with_capacity(data.len());
        for &byte in data {
            match DeviceOpcode::for_decode(byte) {
                Ok(opcode) => opcodes.push(opcode),
                Err(err) if opcodes.is_empty() => return Err(err.into()),
                Err(err) => {
                    self.pending_error = Some(err);
                    break;
                }
            }
        }
        Ok(opcodes)
    }

    fn take_error(&mut self) -> Option<FramingError> {
        self.pending_error.take()
    }

    fn is_empty(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpwireError;
    use crate::protocol::MessageOpcode;

    #[test]
    fn test_message_profile_encode() {
        let profile = MessageProtocol::default();
        let bytes = profile.encode(&Command::message_text("Hi")).unwrap();
        assert_eq!(bytes, b"\x02\x00\x00\x00\x00\x00\x00\x02Hi".to_vec());
    }

    #[test]
    fn test_message_profile_limit() {
        let profile = MessageProtocol::new(FramingOptions::strict().with_max_payload(1));
        let err = profile.encode(&Command::message_text("Hi")).unwrap_err();
        assert!(err.as_encoding().is_some());
    }

    #[test]
    fn test_command_buffer_across_pushes() {
        let profile = MessageProtocol::default();
        let mut decoder = profile.decoder();
        let mut bytes = profile.encode(&Command::message_text("one")).unwrap();
        bytes.extend(profile.encode(&Command::shutdown()).unwrap());

        let first = decoder.push(&bytes[..9]).unwrap();
        assert!(first.is_empty());
        assert!(!decoder.is_empty());

        let rest = decoder.push(&bytes[9..]).unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].message(), "one");
        assert_eq!(rest[1].opcode(), MessageOpcode::Shutdown);
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_command_buffer_rejects_device_opcode() {
        let mut decoder = MessageProtocol::default().decoder();
        let err = decoder.push(&[0x04, 0, 0, 0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(
            err,
            OpwireError::Framing(FramingError::UnknownOpcode { opcode: 0x04, .. })
        ));
    }

    #[test]
    fn test_device_profile_roundtrip() {
        let profile = DeviceToggleProtocol;
        let mut decoder = profile.decoder();
        let mut bytes = Vec::new();
        for op in DeviceOpcode::ALL {
            bytes.extend(profile.encode(&op).unwrap());
        }
        assert_eq!(bytes.len(), DeviceOpcode::ALL.len());
        assert_eq!(decoder.push(&bytes).unwrap(), DeviceOpcode::ALL.to_vec());
    }

    #[test]
    fn test_command_buffer_keeps_commands_before_bad_opcode() {
        let profile = MessageProtocol::default();
        let mut decoder = profile.decoder();
        let mut bytes = profile.encode(&Command::message_text("keep me")).unwrap();
        bytes.extend_from_slice(&[0x09, 0, 0, 0, 0, 0, 0, 0]);

        let commands = decoder.push(&bytes).unwrap();
        assert_eq!(commands, vec![Command::message_text("keep me")]);
        assert_eq!(
            decoder.take_error(),
            Some(FramingError::UnknownOpcode {
                profile: MESSAGE_PROFILE,
                opcode: 0x09
            })
        );
        assert_eq!(decoder.take_error(), None);
    }

    #[test]
    fn test_command_buffer_surfaces_frame_error() {
        let profile = MessageProtocol::default();
        let mut decoder = profile.decoder();
        let mut bytes = profile.encode(&Command::close_connection()).unwrap();
        bytes.extend_from_slice(&[0x02, 0xff, 0, 0, 0, 0, 0, 0]);

        assert_eq!(decoder.push(&bytes).unwrap().len(), 1);
        let err = decoder.push(&[]).unwrap_err();
        assert_eq!(err.as_framing(), Some(&FramingError::NonZeroPadding([0xff, 0, 0])));
    }

    #[test]
    fn test_opcode_buffer_rejects_unknown_byte() {
        let mut decoder = DeviceToggleProtocol.decoder();
        assert!(decoder.push(&[0x02, 0x04]).is_err());

        assert_eq!(decoder.push(&[0x04, 0x02, 0x05]).unwrap(), vec![DeviceOpcode::GreenOn]);
        assert!(matches!(
            decoder.take_error(),
            Some(FramingError::UnknownOpcode { opcode: 0x02, .. })
        ));
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(MessageProtocol::NAME, "message");
        assert_eq!(DeviceToggleProtocol::NAME, "device-toggle");
    }
}
