//! Shell module - interactive command loop over a [`Connection`].
//!
//! Provides:
//! - [`CommandTable`] - maps command names to handlers
//! - [`Shell`] - reads lines, dispatches them, sends the resulting commands
//! - [`message_commands`] / [`device_commands`] - stock tables per profile
//!
//! # Example
//!
//! ```ignore
//! use opwire_client::protocol::DeviceToggleProtocol;
//! use opwire_client::shell::{device_commands, Shell};
//! use opwire_client::{ClientConfig, Connection};
//! use tokio::io::BufReader;
//!
//! let config = ClientConfig::from_env()?;
//! let mut conn = Connection::connect(&config, DeviceToggleProtocol).await?;
//! Shell::new(device_commands())
//!     .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), &mut conn)
//!     .await?;
//! ```

mod registry;
mod tables;

use std::fmt;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::{OpwireError, Result};
use crate::protocol::Profile;
use crate::transport::Connection;

pub use registry::{Action, CommandHandler, CommandTable};
pub use tables::{device_commands, message_commands};

/// Prompt written before each line is read.
pub const DEFAULT_PROMPT: &str = "(client) ";

/// Line-oriented command loop.
pub struct Shell<C> {
    table: CommandTable<C>,
    prompt: String,
    intro: Option<String>,
}

impl<C: fmt::Debug + Send> Shell<C> {
    pub fn new(table: CommandTable<C>) -> Self {
        Self {
            table,
            prompt: DEFAULT_PROMPT.to_string(),
            intro: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Text written once before the first prompt.
    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    /// Run until a quitting command, end of input, or the first fatal error.
    ///
    /// Unknown commands and bad arguments are reported on `output` and the
    /// loop continues. Encoding and transport errors end the loop and are
    /// returned unchanged.
    pub async fn run<R, W, S, P>(
        &self,
        input: R,
        mut output: W,
        conn: &mut Connection<S, P>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: AsyncRead + AsyncWrite + Unpin,
        P: Profile<Command = C>,
    {
        if let Some(intro) = &self.intro {
            output.write_all(intro.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }

        let mut lines = input.lines();
        loop {
            output.write_all(self.prompt.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                tracing::debug!("Input closed, leaving shell");
                return Ok(());
            };

            let action = match self.table.dispatch(&line) {
                Ok(Some(action)) => action,
                Ok(None) => continue,
                Err(e @ (OpwireError::UnknownCommand(_) | OpwireError::InvalidArguments(_))) => {
                    tracing::debug!(line = %line, error = %e, "Rejected input line");
                    output.write_all(format!("*** {}\n", e).as_bytes()).await?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match action {
                Action::Send(command) => conn.send(&command).await?,
                Action::SendAndQuit(command) => {
                    conn.send(&command).await?;
                    conn.shutdown().await?;
                    return Ok(());
                }
                Action::Print(text) => {
                    output.write_all(text.as_bytes()).await?;
                    if !text.ends_with('\n') {
                        output.write_all(b"\n").await?;
                    }
                }
                Action::Quit => return Ok(()),
            }
        }
    }
}
