//! Transport module - the connection handle that owns the socket.
//!
//! Provides [`Connection`], generic over:
//! - the byte stream (`TcpStream` in production, anything `AsyncRead + AsyncWrite`)
//! - the protocol profile

mod connection;

pub use connection::Connection;
