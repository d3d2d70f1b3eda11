//! Explicit connection handle.
//!
//! A [`Connection`] owns one byte stream and one protocol profile. Every
//! send goes through `&mut Connection`; there is no shared socket.
//!
//! # Example
//!
//! ```ignore
//! use opwire_client::protocol::{Command, MessageProtocol};
//! use opwire_client::{ClientConfig, Connection};
//!
//! let config = ClientConfig::from_env()?;
//! let mut conn = Connection::connect(&config, MessageProtocol::new(config.framing_options())).await?;
//! conn.send(&Command::message_text("Hello, Server!")).await?;
//! ```

use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::ClientConfig;
use crate::error::{OpwireError, Result};
use crate::protocol::{Decoder, Profile};

/// Read buffer size per `read` call.
const READ_BUFFER_SIZE: usize = 4 * 1024;

/// A stream speaking one protocol profile.
pub struct Connection<S, P: Profile> {
    stream: S,
    profile: P,
    decoder: P::Decoder,
    /// Decoded commands not yet returned by `recv`.
    pending: VecDeque<P::Command>,
    read_buf: Vec<u8>,
}

impl<P: Profile> Connection<TcpStream, P> {
    /// Open a TCP connection to `config.addr()`.
    ///
    /// Fails with `ErrorKind::TimedOut` after `config.connect_timeout()`.
    /// Connect errors are returned as-is; nothing is retried.
    pub async fn connect(config: &ClientConfig, profile: P) -> Result<Self> {
        let addr = config.addr();
        let stream = tokio::time::timeout(config.connect_timeout(), TcpStream::connect(&addr))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connect to {} timed out", addr),
                )
            })??;
        stream.set_nodelay(true)?;

        tracing::info!(profile = P::NAME, %addr, "Connected to server");
        Ok(Self::new(stream, profile))
    }

    /// Remote address of the TCP stream.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }
}

impl<S, P> Connection<S, P>
where
    S: AsyncRead + AsyncWrite + Unpin,
    P: Profile,
{
    /// Wrap an already connected stream.
    pub fn new(stream: S, profile: P) -> Self {
        let decoder = profile.decoder();
        Self {
            stream,
            profile,
            decoder,
            pending: VecDeque::new(),
            read_buf: vec![0u8; READ_BUFFER_SIZE],
        }
    }

    /// Encode and write one command, then flush.
    pub async fn send(&mut self, command: &P::Command) -> Result<()> {
        let packet = self.profile.encode(command)?;
        self.stream.write_all(&packet).await?;
        self.stream.flush().await?;

        tracing::debug!(
            profile = P::NAME,
            ?command,
            bytes = packet.len(),
            "Sent packet"
        );
        Ok(())
    }

    /// Read the next command.
    ///
    /// Returns `Ok(None)` when the peer closes the stream on a packet
    /// boundary and [`OpwireError::ConnectionClosed`] when it closes in the
    /// middle of one. Commands that arrived intact ahead of a bad packet
    /// are returned first; the framing error follows on the next call.
    pub async fn recv(&mut self) -> Result<Option<P::Command>> {
        loop {
            if let Some(command) = self.pending.pop_front() {
                tracing::debug!(profile = P::NAME, ?command, "Received packet");
                return Ok(Some(command));
            }

            if let Some(err) = self.decoder.take_error() {
                tracing::warn!(profile = P::NAME, error = %err, "Bad packet");
                return Err(err.into());
            }

            let n = self.stream.read(&mut self.read_buf).await?;
            if n == 0 {
                if self.decoder.is_empty() {
                    return Ok(None);
                }
                tracing::warn!(profile = P::NAME, "Peer closed stream mid-packet");
                return Err(OpwireError::ConnectionClosed);
            }

            let commands = self.decoder.push(&self.read_buf[..n])?;
            self.pending.extend(commands);
        }
    }

    /// Shut down the write half of the stream.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown().await?;
        tracing::debug!(profile = P::NAME, "Connection shut down");
        Ok(())
    }

    pub fn profile(&self) -> &P {
        &self.profile
    }

    /// Unwrap the underlying stream, dropping buffered input.
    pub fn into_inner(self) -> S {
        self.stream
    }
}
