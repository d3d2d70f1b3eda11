//! # opwire-client
//!
//! Client SDK for two opcode-tagged TCP command protocols.
//!
//! ## Protocols
//!
//! - **Message** (length-prefixed): `[opcode][00 00 00][u32 BE length][UTF-8 payload]`
//! - **Device toggle** (single byte): `[opcode]`
//!
//! Each protocol is a separate [`protocol::Profile`] with its own closed
//! opcode set. The framing functions in [`protocol`] are pure; sockets live
//! in [`Connection`].
//!
//! ## Example
//!
//! ```
//! use opwire_client::protocol::{decode_length_prefixed, encode_length_prefixed, encode_single};
//!
//! let packet = encode_length_prefixed(2, "Hello, Server!").unwrap();
//! assert_eq!(&packet[..8], b"\x02\x00\x00\x00\x00\x00\x00\x0e");
//! assert_eq!(decode_length_prefixed(&packet).unwrap().message(), "Hello, Server!");
//!
//! assert_eq!(encode_single(0x06).unwrap(), [0x06]);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod shell;
pub mod transport;

pub use config::ClientConfig;
pub use error::{EncodingError, FramingError, OpwireError, Result};
pub use transport::Connection;
