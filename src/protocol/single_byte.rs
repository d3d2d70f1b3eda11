//! Single-byte framing for the device-toggle protocol.
//!
//! Every packet is exactly one opcode byte. There is no length field and no
//! payload.
//!
//! ```
//! use opwire_client::protocol::{decode_single, encode_single, DeviceOpcode};
//!
//! assert_eq!(encode_single(0x04).unwrap(), [0x04]);
//! assert_eq!(decode_single(&[0x06]).unwrap(), DeviceOpcode::RedOn);
//! assert!(decode_single(&[0x04, 0x05]).is_err());
//! ```

use super::opcodes::DeviceOpcode;
use crate::error::{EncodingError, FramingError};

/// Size of a device-toggle packet.
pub const SINGLE_BYTE_PACKET_SIZE: usize = 1;

/// Encode a device opcode byte.
///
/// # Errors
///
/// [`EncodingError::UnsupportedOpcode`] for bytes outside the device set.
pub fn encode_single(opcode: u8) -> Result<[u8; SINGLE_BYTE_PACKET_SIZE], EncodingError> {
    let opcode = DeviceOpcode::for_encode(opcode)?;
    Ok(opcode.encode())
}

/// Decode exactly one device packet.
///
/// # Errors
///
/// [`FramingError::WrongLength`] unless `buf` has exactly one byte,
/// [`FramingError::UnknownOpcode`] for a byte outside the device set.
pub fn decode_single(buf: &[u8]) -> Result<DeviceOpcode, FramingError> {
    match buf {
        [byte] => DeviceOpcode::for_decode(*byte),
        _ => Err(FramingError::WrongLength {
            expected: SINGLE_BYTE_PACKET_SIZE,
            actual: buf.len(),
        }),
    }
}

impl DeviceOpcode {
    /// Wire representation of this opcode.
    #[inline]
    pub fn encode(self) -> [u8; SINGLE_BYTE_PACKET_SIZE] {
        [self.as_u8()]
    }
}
