//! Protocol module - wire format, framing, opcodes and profiles.
//!
//! This module implements both command protocols:
//! - Length-prefixed: 8-byte header (`opcode`, 3 zero bytes, `u32` BE length) + UTF-8 payload
//! - Single-byte: one opcode byte per command
//!
//! Every function here is pure. No I/O happens below [`crate::transport`].

mod frame;
mod frame_buffer;
mod opcodes;
mod profile;
mod single_byte;
mod wire_format;

pub use frame::{
    build_frame, decode_frame_with, decode_length_prefixed, decode_length_prefixed_with,
    encode_length_prefixed, encode_length_prefixed_with, Command, Frame,
};
pub use frame_buffer::FrameBuffer;
pub use opcodes::{DeviceOpcode, MessageOpcode, DEVICE_PROFILE, MESSAGE_PROFILE};
pub use profile::{
    CommandBuffer, Decoder, DeviceToggleProtocol, MessageProtocol, OpcodeBuffer, Profile,
};
pub use single_byte::{decode_single, encode_single, SINGLE_BYTE_PACKET_SIZE};
pub use wire_format::{
    FramingOptions, Header, ABSOLUTE_MAX_PAYLOAD_SIZE, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_PORT,
    HEADER_SIZE, PADDING_SIZE,
};
