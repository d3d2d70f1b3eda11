//! Interactive LED control shell over the single-byte protocol.
//!
//! ```text
//! cargo run --example led_shell
//! (client) green_on
//! (client) red_off
//! (client) exit
//! ```

use opwire_client::logging::{init_logging, DEFAULT_LOG_DIRECTIVE};
use opwire_client::protocol::DeviceToggleProtocol;
use opwire_client::shell::{device_commands, Shell};
use opwire_client::{ClientConfig, Connection};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(DEFAULT_LOG_DIRECTIVE);

    let config = ClientConfig::from_env()?;
    let mut conn = match Connection::connect(&config, DeviceToggleProtocol).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(addr = %config.addr(), error = %e, "Unable to connect to server");
            std::process::exit(1);
        }
    };

    Shell::new(device_commands())
        .with_intro("Welcome to the LED control client. Type help or ? to list commands.")
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), &mut conn)
        .await?;

    Ok(())
}
