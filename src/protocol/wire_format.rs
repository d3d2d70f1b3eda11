//! Wire format encoding and decoding for the length-prefixed protocol.
//!
//! Implements the 8-byte header format:
//! ```text
//! ┌────────┬──────────┬──────────┐
//! │ Opcode │ Padding  │ Length   │
//! │ 1 byte │ 3 bytes  │ 4 bytes  │
//! │ uint8  │ 00 00 00 │ uint32 BE│
//! └────────┴──────────┴──────────┘
//! ```
//!
//! The header is followed by exactly `Length` bytes of UTF-8 payload.

use crate::error::FramingError;

/// Header size in bytes (fixed, exactly 8).
pub const HEADER_SIZE: usize = 8;

/// Number of padding bytes after the opcode.
pub const PADDING_SIZE: usize = 3;

/// Largest payload the 32-bit length field can describe.
pub const ABSOLUTE_MAX_PAYLOAD_SIZE: u32 = u32::MAX;

/// Message limit enforced by the counterpart server (1 KB).
pub const DEFAULT_MAX_MESSAGE_SIZE: u32 = 1024;

/// Default server port.
pub const DEFAULT_PORT: u16 = 17337;

/// Decoder and encoder strictness knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramingOptions {
    /// Reject packets whose padding bytes are not all zero.
    pub strict_padding: bool,
    /// Reject bytes left after a complete packet (one packet per call).
    pub reject_trailing: bool,
    /// Largest payload accepted in either direction.
    pub max_payload_size: u32,
}

impl FramingOptions {
    /// Strict padding, no trailing bytes, limited only by the length field.
    pub const fn strict() -> Self {
        Self {
            strict_padding: true,
            reject_trailing: true,
            max_payload_size: ABSOLUTE_MAX_PAYLOAD_SIZE,
        }
    }

    /// Ignore padding values and tolerate trailing bytes.
    pub const fn lenient() -> Self {
        Self {
            strict_padding: false,
            reject_trailing: false,
            max_payload_size: ABSOLUTE_MAX_PAYLOAD_SIZE,
        }
    }

    /// Same options with a different payload limit.
    pub const fn with_max_payload(mut self, max_payload_size: u32) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }
}

impl Default for FramingOptions {
    fn default() -> Self {
        Self::strict()
    }
}

/// Decoded header from wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Raw opcode byte.
    pub opcode: u8,
    /// Padding bytes as read (always zero when encoded by us).
    pub padding: [u8; PADDING_SIZE],
    /// Payload length in bytes.
    pub payload_length: u32,
}

impl Header {
    /// Create a new header with zero padding.
    pub fn new(opcode: u8, payload_length: u32) -> Self {
        Self {
            opcode,
            padding: [0; PADDING_SIZE],
            payload_length,
        }
    }

    /// Encode header to bytes (Big Endian).
    ///
    /// Padding is always written as zero, whatever `self.padding` holds.
    ///
    /// # Example
    ///
    /// ```
    /// use opwire_client::protocol::Header;
    ///
    /// let bytes = Header::new(2, 14).encode();
    /// assert_eq!(bytes, [0x02, 0, 0, 0, 0, 0, 0, 0x0e]);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.encode_into(&mut buf);
        buf
    }

    /// Encode header into an existing buffer.
    ///
    /// # Panics
    ///
    /// Panics if buffer is smaller than `HEADER_SIZE` (8 bytes).
    pub fn encode_into(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= HEADER_SIZE);
        buf[0] = self.opcode;
        buf[1..4].fill(0);
        buf[4..8].copy_from_slice(&self.payload_length.to_be_bytes());
    }

    /// Decode header from the first 8 bytes of `buf` (Big Endian).
    ///
    /// Extra bytes after the header are not inspected.
    ///
    /// # Example
    ///
    /// ```
    /// use opwire_client::protocol::Header;
    ///
    /// let header = Header::decode(&[0x02, 0, 0, 0, 0, 0, 0, 0x05]).unwrap();
    /// assert_eq!(header.opcode, 2);
    /// assert_eq!(header.payload_length, 5);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self, FramingError> {
        if buf.len() < HEADER_SIZE {
            return Err(FramingError::TruncatedHeader {
                needed: HEADER_SIZE,
                available: buf.len(),
            });
        }
        Ok(Self {
            opcode: buf[0],
            padding: [buf[1], buf[2], buf[3]],
            payload_length: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }

    /// Validate the header against the given options.
    ///
    /// Checks:
    /// - Padding bytes are zero (strict mode only)
    /// - Payload length doesn't exceed max
    pub fn validate(&self, options: &FramingOptions) -> Result<(), FramingError> {
        if options.strict_padding && self.padding != [0; PADDING_SIZE] {
            return Err(FramingError::NonZeroPadding(self.padding));
        }

        if self.payload_length > options.max_payload_size {
            return Err(FramingError::PayloadTooLarge {
                size: self.payload_length,
                max: options.max_payload_size,
            });
        }

        Ok(())
    }

    /// Total packet size (header + payload).
    #[inline]
    pub fn packet_len(&self) -> usize {
        HEADER_SIZE + self.payload_length as usize
    }

    /// Check if this is a header-only packet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload_length == 0
    }
}
