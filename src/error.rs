//! Error types for opwire-client.

use thiserror::Error;

/// Invalid input handed to an encoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Opcode is not part of the profile's opcode set.
    #[error("opcode 0x{opcode:02x} is not supported by the {profile} protocol")]
    UnsupportedOpcode { profile: &'static str, opcode: u8 },

    /// Message does not fit the length field or the configured limit.
    #[error("message of {size} bytes exceeds maximum {max}")]
    MessageTooLarge { size: usize, max: u32 },
}

/// Malformed or truncated wire bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    /// Fewer bytes than a full header.
    #[error("truncated header: need {needed} bytes, got {available}")]
    TruncatedHeader { needed: usize, available: usize },

    /// Declared payload length exceeds the bytes that follow the header.
    #[error("truncated payload: declared {declared} bytes, got {available}")]
    TruncatedPayload { declared: u32, available: usize },

    /// Padding bytes must be zero in strict mode.
    #[error("non-zero padding: {0:02x?}")]
    NonZeroPadding([u8; 3]),

    /// Bytes left over after a complete packet.
    #[error("{0} trailing bytes after packet")]
    TrailingBytes(usize),

    /// Declared payload length exceeds the configured maximum.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge { size: u32, max: u32 },

    /// Opcode byte is not part of the profile's opcode set.
    #[error("unknown {profile} opcode 0x{opcode:02x}")]
    UnknownOpcode { profile: &'static str, opcode: u8 },

    /// Fixed-size packet of the wrong length.
    #[error("expected exactly {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// Message payload is not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
}

/// Main error type for all opwire operations.
#[derive(Debug, Error)]
pub enum OpwireError {
    /// I/O error on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while loading configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Command could not be encoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Incoming bytes could not be decoded.
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// No handler registered under this command name.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Handler rejected its arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Peer closed the stream in the middle of a packet.
    #[error("Connection closed")]
    ConnectionClosed,
}

impl OpwireError {
    /// Returns the framing error, if this is one.
    pub fn as_framing(&self) -> Option<&FramingError> {
        match self {
            OpwireError::Framing(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the encoding error, if this is one.
    pub fn as_encoding(&self) -> Option<&EncodingError> {
        match self {
            OpwireError::Encoding(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias using OpwireError.
pub type Result<T> = std::result::Result<T, OpwireError>;
