//! Operation codes, one closed set per protocol profile.
//!
//! The two profiles disagree on numbering (0x06 is `Shutdown` for the
//! message protocol and `RedOn` for the device protocol), so each set is its
//! own type and never converts into the other.

use std::fmt;

use crate::error::{EncodingError, FramingError};

/// Profile name used in errors for the length-prefixed protocol.
pub const MESSAGE_PROFILE: &str = "message";

/// Profile name used in errors for the single-byte protocol.
pub const DEVICE_PROFILE: &str = "device-toggle";

/// Opcodes of the length-prefixed message protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageOpcode {
    /// Deliver a UTF-8 text message.
    Message = 0x02,
    /// Ask the server to close this connection.
    CloseConnection = 0x03,
    /// Ask the server to shut down.
    Shutdown = 0x06,
}

impl MessageOpcode {
    /// All opcodes in wire order.
    pub const ALL: [MessageOpcode; 3] = [
        MessageOpcode::Message,
        MessageOpcode::CloseConnection,
        MessageOpcode::Shutdown,
    ];

    /// Wire value.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether commands with this opcode normally carry text.
    #[inline]
    pub fn carries_payload(self) -> bool {
        matches!(self, MessageOpcode::Message)
    }

    /// Look up an opcode for encoding.
    pub fn for_encode(value: u8) -> Result<Self, EncodingError> {
        Self::from_u8(value).ok_or(EncodingError::UnsupportedOpcode {
            profile: MESSAGE_PROFILE,
            opcode: value,
        })
    }

    /// Look up an opcode read off the wire.
    pub fn for_decode(value: u8) -> Result<Self, FramingError> {
        Self::from_u8(value).ok_or(FramingError::UnknownOpcode {
            profile: MESSAGE_PROFILE,
            opcode: value,
        })
    }

    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x02 => Some(MessageOpcode::Message),
            0x03 => Some(MessageOpcode::CloseConnection),
            0x06 => Some(MessageOpcode::Shutdown),
            _ => None,
        }
    }
}

impl TryFrom<u8> for MessageOpcode {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::for_encode(value)
    }
}

impl From<MessageOpcode> for u8 {
    fn from(op: MessageOpcode) -> u8 {
        op.as_u8()
    }
}

impl fmt::Display for MessageOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageOpcode::Message => "MESSAGE",
            MessageOpcode::CloseConnection => "CLOSE_CONNECTION",
            MessageOpcode::Shutdown => "SHUTDOWN",
        };
        write!(f, "{} (0x{:02x})", name, self.as_u8())
    }
}

/// Opcodes of the single-byte device-toggle protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceOpcode {
    CloseConnection = 0x03,
    GreenOn = 0x04,
    GreenOff = 0x05,
    RedOn = 0x06,
    RedOff = 0x07,
    YellowOn = 0x08,
    YellowOff = 0x09,
}

impl DeviceOpcode {
    /// All opcodes in wire order.
    pub const ALL: [DeviceOpcode; 7] = [
        DeviceOpcode::CloseConnection,
        DeviceOpcode::GreenOn,
        DeviceOpcode::GreenOff,
        DeviceOpcode::RedOn,
        DeviceOpcode::RedOff,
        DeviceOpcode::YellowOn,
        DeviceOpcode::YellowOff,
    ];

    /// Wire value.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Look up an opcode for encoding.
    pub fn for_encode(value: u8) -> Result<Self, EncodingError> {
        Self::from_u8(value).ok_or(EncodingError::UnsupportedOpcode {
            profile: DEVICE_PROFILE,
            opcode: value,
        })
    }

    /// Look up an opcode read off the wire.
    pub fn for_decode(value: u8) -> Result<Self, FramingError> {
        Self::from_u8(value).ok_or(FramingError::UnknownOpcode {
            profile: DEVICE_PROFILE,
            opcode: value,
        })
    }

    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x03 => Some(DeviceOpcode::CloseConnection),
            0x04 => Some(DeviceOpcode::GreenOn),
            0x05 => Some(DeviceOpcode::GreenOff),
            0x06 => Some(DeviceOpcode::RedOn),
            0x07 => Some(DeviceOpcode::RedOff),
            0x08 => Some(DeviceOpcode::YellowOn),
            0x09 => Some(DeviceOpcode::YellowOff),
            _ => None,
        }
    }
}

impl TryFrom<u8> for DeviceOpcode {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::for_encode(value)
    }
}

impl From<DeviceOpcode> for u8 {
    fn from(op: DeviceOpcode) -> u8 {
        op.as_u8()
    }
}

impl fmt::Display for DeviceOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceOpcode::CloseConnection => "CLOSE_CONNECTION",
            DeviceOpcode::GreenOn => "GREEN_ON",
            DeviceOpcode::GreenOff => "GREEN_OFF",
            DeviceOpcode::RedOn => "RED_ON",
            DeviceOpcode::RedOff => "RED_OFF",
            DeviceOpcode::YellowOn => "YELLOW_ON",
            DeviceOpcode::YellowOff => "YELLOW_OFF",
        };
        write!(f, "{} (0x{:02x})", name, self.as_u8())
    }
}
