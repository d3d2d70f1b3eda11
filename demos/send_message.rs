//! Send one length-prefixed message and exit.
//!
//! ```text
//! cargo run --example send_message                     # opcode 2, "Hello, Server!"
//! cargo run --example send_message -- 2 "some text"
//! cargo run --example send_message -- 6                # SHUTDOWN, header only
//! OPWIRE_HOST=192.168.86.150 cargo run --example send_message
//! ```

use opwire_client::logging::{init_logging, DEFAULT_LOG_DIRECTIVE};
use opwire_client::protocol::{Command, MessageOpcode, MessageProtocol};
use opwire_client::{ClientConfig, Connection};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(DEFAULT_LOG_DIRECTIVE);

    let mut args = std::env::args().skip(1);
    let opcode = match args.next() {
        Some(raw) => MessageOpcode::try_from(raw.parse::<u8>()?)?,
        None => MessageOpcode::Message,
    };
    let rest: Vec<String> = args.collect();
    let message = if rest.is_empty() && opcode == MessageOpcode::Message {
        "Hello, Server!".to_string()
    } else {
        rest.join(" ")
    };

    let config = ClientConfig::from_env()?;
    let profile = MessageProtocol::new(config.framing_options());
    let mut conn = Connection::connect(&config, profile).await?;

    let command = Command::new(opcode, message);
    conn.send(&command).await?;
    conn.shutdown().await?;

    tracing::info!(opcode = %command.opcode(), message = command.message(), "Sent");
    Ok(())
}
