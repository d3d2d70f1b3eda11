//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for zero-copy buffer management.
//! Implements a state machine for handling fragmented frames:
//! - `WaitingForHeader`: Need at least 8 bytes
//! - `WaitingForPayload`: Header parsed, need N more payload bytes
//!
//! # Example
//!
//! ```
//! use opwire_client::protocol::{encode_length_prefixed, FrameBuffer};
//!
//! let bytes = encode_length_prefixed(2, "hello").unwrap();
//! let mut buffer = FrameBuffer::new();
//!
//! // Data arrives in chunks from the socket
//! assert!(buffer.push(&bytes[..3]).unwrap().is_empty());
//! let frames = buffer.push(&bytes[3..]).unwrap();
//! assert_eq!(frames[0].payload(), b"hello");
//! ```

use bytes::{Bytes, BytesMut};

use super::wire_format::{FramingOptions, Header, HEADER_SIZE};
use super::Frame;
use crate::error::FramingError;

/// State machine for frame parsing.
#[derive(Debug, Clone)]
enum State {
    /// Waiting for complete header (need 8 bytes).
    WaitingForHeader,
    /// Header parsed, waiting for payload bytes.
    WaitingForPayload { header: Header },
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
///
/// Header rules (padding, max payload) from [`FramingOptions`] are checked as
/// soon as a header is complete. `reject_trailing` does not apply: a stream
/// carries packets back to back.
///
/// When a bad header follows complete frames in the same push, those frames
/// are returned and the error is held until [`FrameBuffer::take_error`] or
/// the next push. The bad header stays buffered, so every later push fails
/// the same way; call [`FrameBuffer::clear`] or drop the connection.
pub struct FrameBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Header validation rules.
    options: FramingOptions,
    /// Error found after frames were already extracted.
    pending_error: Option<FramingError>,
}

impl FrameBuffer {
    /// Create a new frame buffer with default (strict) options.
    pub fn new() -> Self {
        Self::with_options(FramingOptions::default())
    }

    /// Create a new frame buffer with custom options.
    pub fn with_options(options: FramingOptions) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4 * 1024),
            state: State::WaitingForHeader,
            options,
            pending_error: None,
        }
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// Partial data is buffered internally for the next push. Returns an
    /// empty vector if still waiting for data.
    ///
    /// # Errors
    ///
    /// Returns error if a header violates the configured options and no
    /// frame came before it, or if an earlier push held one back.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>, FramingError> {
        self.buffer.extend_from_slice(data);
        if let Some(err) = self.pending_error.take() {
            return Err(err);
        }

        let mut frames = Vec::new();
        loop {
            match self.try_extract_one() {
                Ok(Some(frame)) => frames.push(frame),
                Ok(None) => break,
                Err(err) if frames.is_empty() => return Err(err),
                Err(err) => {
                    self.pending_error = Some(err);
                    break;
                }
            }
        }

        Ok(frames)
    }

    /// Take the error held back by the last push, if any.
    pub fn take_error(&mut self) -> Option<FramingError> {
        self.pending_error.take()
    }

    /// Try to extract a single frame from the buffer.
    fn try_extract_one(&mut self) -> Result<Option<Frame>, FramingError> {
        match &self.state {
            State::WaitingForHeader => {
                if self.buffer.len() < HEADER_SIZE {
                    return Ok(None);
                }

                let header = Header::decode(&self.buffer[..HEADER_SIZE])?;
                header.validate(&self.options)?;

                let _ = self.buffer.split_to(HEADER_SIZE);

                if header.is_empty() {
                    return Ok(Some(Frame::new(header, Bytes::new())));
                }

                self.state = State::WaitingForPayload { header };

                self.try_extract_one()
            }

            State::WaitingForPayload { header } => {
                let remaining = header.payload_length as usize;

                if self.buffer.len() < remaining {
                    return Ok(None);
                }

                let payload = self.buffer.split_to(remaining).freeze();
                let header = *header;

                self.state = State::WaitingForHeader;

                Ok(Some(Frame::new(header, payload)))
            }
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer holds no partial frame.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && matches!(self.state, State::WaitingForHeader)
    }

    /// Clear the buffer and reset state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::WaitingForHeader;
        self.pending_error = None;
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match &self.state {
            State::WaitingForHeader => "WaitingForHeader",
            State::WaitingForPayload { .. } => "WaitingForPayload",
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
