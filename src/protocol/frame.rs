//! Frames and commands of the length-prefixed protocol.
//!
//! A [`Frame`] is what comes off the wire: a header plus raw payload bytes.
//! A [`Command`] is the validated form: a known [`MessageOpcode`] and a
//! UTF-8 message.
//!
//! # Example
//!
//! ```
//! use opwire_client::protocol::{decode_length_prefixed, encode_length_prefixed};
//!
//! let bytes = encode_length_prefixed(2, "Hello, Server!").unwrap();
//! assert_eq!(&bytes[..8], &[0x02, 0, 0, 0, 0, 0, 0, 0x0e]);
//!
//! let command = decode_length_prefixed(&bytes).unwrap();
//! assert_eq!(command.message(), "Hello, Server!");
//! ```

use bytes::Bytes;

use super::opcodes::MessageOpcode;
use super::wire_format::{FramingOptions, Header, HEADER_SIZE};
use crate::error::{EncodingError, FramingError};

/// A complete protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Decoded header.
    pub header: Header,
    /// Payload bytes (zero-copy via `bytes::Bytes`).
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame from header and payload.
    pub fn new(header: Header, payload: Bytes) -> Self {
        Self { header, payload }
    }

    /// Create a frame from header and raw bytes (copies data).
    pub fn from_parts(header: Header, payload: &[u8]) -> Self {
        Self {
            header,
            payload: Bytes::copy_from_slice(payload),
        }
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Get the raw opcode byte.
    #[inline]
    pub fn opcode(&self) -> u8 {
        self.header.opcode
    }
}

/// A validated message-protocol command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    opcode: MessageOpcode,
    message: String,
}

impl Command {
    /// Create a command with an arbitrary opcode and message.
    pub fn new(opcode: MessageOpcode, message: impl Into<String>) -> Self {
        Self {
            opcode,
            message: message.into(),
        }
    }

    /// `MESSAGE` command carrying `text`.
    pub fn message_text(text: impl Into<String>) -> Self {
        Self::new(MessageOpcode::Message, text)
    }

    /// Header-only `CLOSE_CONNECTION` command.
    pub fn close_connection() -> Self {
        Self::new(MessageOpcode::CloseConnection, String::new())
    }

    /// Header-only `SHUTDOWN` command.
    pub fn shutdown() -> Self {
        Self::new(MessageOpcode::Shutdown, String::new())
    }

    #[inline]
    pub fn opcode(&self) -> MessageOpcode {
        self.opcode
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consume the command, returning its message.
    pub fn into_message(self) -> String {
        self.message
    }

    /// Encode with default (strict) options.
    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        self.encode_with(&FramingOptions::default())
    }

    /// Encode, enforcing `options.max_payload_size`.
    pub fn encode_with(&self, options: &FramingOptions) -> Result<Vec<u8>, EncodingError> {
        let payload = self.message.as_bytes();
        if payload.len() > options.max_payload_size as usize {
            return Err(EncodingError::MessageTooLarge {
                size: payload.len(),
                max: options.max_payload_size,
            });
        }
        let header = Header::new(self.opcode.as_u8(), payload.len() as u32);
        Ok(build_frame(&header, payload))
    }
}

impl TryFrom<Frame> for Command {
    type Error = FramingError;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        let opcode = MessageOpcode::for_decode(frame.header.opcode)?;
        let message = String::from_utf8(frame.payload.to_vec())
            .map_err(|_| FramingError::InvalidUtf8)?;
        Ok(Self { opcode, message })
    }
}

/// Build a complete frame as a single byte vector.
///
/// The caller is responsible for `header.payload_length == payload.len()`.
pub fn build_frame(header: &Header, payload: &[u8]) -> Vec<u8> {
    debug_assert_eq!(header.payload_length as usize, payload.len());
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(payload);
    buf
}

/// Encode `(opcode, message)` as a length-prefixed packet.
///
/// # Errors
///
/// [`EncodingError::UnsupportedOpcode`] if `opcode` is not a message-protocol
/// opcode, [`EncodingError::MessageTooLarge`] if the message does not fit
/// the 32-bit length field.
///
/// # Example
///
/// ```
/// use opwire_client::protocol::encode_length_prefixed;
///
/// let bytes = encode_length_prefixed(3, "").unwrap();
/// assert_eq!(bytes, vec![0x03, 0, 0, 0, 0, 0, 0, 0]);
/// ```
pub fn encode_length_prefixed(opcode: u8, message: &str) -> Result<Vec<u8>, EncodingError> {
    encode_length_prefixed_with(opcode, message, &FramingOptions::default())
}

/// Encode `(opcode, message)` with explicit options.
pub fn encode_length_prefixed_with(
    opcode: u8,
    message: &str,
    options: &FramingOptions,
) -> Result<Vec<u8>, EncodingError> {
    let opcode = MessageOpcode::for_encode(opcode)?;
    Command::new(opcode, message).encode_with(options)
}

/// Decode exactly one length-prefixed packet with default (strict) options.
///
/// # Example
///
/// ```
/// use opwire_client::protocol::decode_length_prefixed;
/// use opwire_client::FramingError;
///
/// let err = decode_length_prefixed(b"\x02\x00\x00\x00\x00\x00\x00\x05Hi").unwrap_err();
/// assert_eq!(err, FramingError::TruncatedPayload { declared: 5, available: 2 });
/// ```
pub fn decode_length_prefixed(buf: &[u8]) -> Result<Command, FramingError> {
    decode_length_prefixed_with(buf, &FramingOptions::default())
}

/// Decode one length-prefixed packet with explicit options.
///
/// With `reject_trailing` off, bytes after the packet are ignored.
pub fn decode_length_prefixed_with(
    buf: &[u8],
    options: &FramingOptions,
) -> Result<Command, FramingError> {
    let frame = decode_frame_with(buf, options)?;
    Command::try_from(frame)
}

/// Decode one raw frame without interpreting the opcode or payload.
pub fn decode_frame_with(buf: &[u8], options: &FramingOptions) -> Result<Frame, FramingError> {
    let header = Header::decode(buf)?;
    header.validate(options)?;

    let available = buf.len() - HEADER_SIZE;
    let declared = header.payload_length as usize;
    if available < declared {
        return Err(FramingError::TruncatedPayload {
            declared: header.payload_length,
            available,
        });
    }
    if options.reject_trailing && available > declared {
        return Err(FramingError::TrailingBytes(available - declared));
    }

    Ok(Frame::from_parts(
        header,
        &buf[HEADER_SIZE..HEADER_SIZE + declared],
    ))
}
