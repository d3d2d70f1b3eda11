//! Client configuration.
//!
//! Defaults match the counterpart server: `127.0.0.1:17337`, 1 KB messages,
//! strict padding. Values can come from a JSON file and be overridden from
//! the environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `OPWIRE_HOST` | `host` |
//! | `OPWIRE_PORT` | `port` |
//! | `OPWIRE_CONNECT_TIMEOUT_MS` | `connect_timeout_ms` |
//! | `OPWIRE_MAX_MESSAGE_SIZE` | `max_message_size` |
//! | `OPWIRE_STRICT_PADDING` | `strict_padding` |
//!
//! ```
//! use opwire_client::ClientConfig;
//!
//! let config = ClientConfig::from_json_str(r#"{ "port": 9000 }"#).unwrap();
//! assert_eq!(config.addr(), "127.0.0.1:9000");
//! assert_eq!(config.max_message_size, 1024);
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{OpwireError, Result};
use crate::protocol::{FramingOptions, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_PORT};

/// Default server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server host name or address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Give up connecting after this many milliseconds.
    pub connect_timeout_ms: u64,
    /// Largest message payload sent or accepted, in bytes.
    pub max_message_size: u32,
    /// Reject incoming packets with non-zero padding.
    pub strict_padding: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            strict_padding: true,
        }
    }
}

impl ClientConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Defaults overridden from `OPWIRE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Apply `OPWIRE_*` environment overrides to this config.
    pub fn with_env(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("OPWIRE_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("OPWIRE_PORT") {
            self.port = parse_var("OPWIRE_PORT", &port)?;
        }
        if let Some(timeout) = lookup("OPWIRE_CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = parse_var("OPWIRE_CONNECT_TIMEOUT_MS", &timeout)?;
        }
        if let Some(max) = lookup("OPWIRE_MAX_MESSAGE_SIZE") {
            self.max_message_size = parse_var("OPWIRE_MAX_MESSAGE_SIZE", &max)?;
        }
        if let Some(strict) = lookup("OPWIRE_STRICT_PADDING") {
            self.strict_padding = parse_var("OPWIRE_STRICT_PADDING", &strict)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values no connection could use.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(OpwireError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(OpwireError::Config("port must be non-zero".to_string()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(OpwireError::Config(
                "connect_timeout_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` string for connecting.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Framing options derived from this config.
    pub fn framing_options(&self) -> FramingOptions {
        FramingOptions {
            strict_padding: self.strict_padding,
            reject_trailing: true,
            max_payload_size: self.max_message_size,
        }
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| OpwireError::Config(format!("invalid {} '{}': {}", key, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:17337");
        assert_eq!(config.max_message_size, 1024);
        assert!(config.strict_padding);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_json_partial_document() {
        let config =
            ClientConfig::from_json_str(r#"{ "host": "10.0.0.2", "strict_padding": false }"#)
                .unwrap();
        assert_eq!(config.host, "10.0.0.2");
        assert_eq!(config.port, 17337);
        assert!(!config.strict_padding);
    }

    #[test]
    fn test_json_invalid() {
        let err = ClientConfig::from_json_str(r#"{ "port": "nope" }"#).unwrap_err();
        assert!(matches!(err, OpwireError::Json(_)));
    }

    #[test]
    fn test_json_file() {
        let path = std::env::temp_dir().join(format!("opwire-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "port": 4000, "max_message_size": 64 }"#).unwrap();

        let config = ClientConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.max_message_size, 64);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::default()
            .with_overrides(lookup(&[
                ("OPWIRE_HOST", "192.168.86.150"),
                ("OPWIRE_PORT", "2012"),
                ("OPWIRE_MAX_MESSAGE_SIZE", "4096"),
                ("OPWIRE_STRICT_PADDING", "false"),
            ]))
            .unwrap();

        assert_eq!(config.addr(), "192.168.86.150:2012");
        assert_eq!(config.max_message_size, 4096);
        assert!(!config.strict_padding);
    }

    #[test]
    fn test_override_invalid_port() {
        let err = ClientConfig::default()
            .with_overrides(lookup(&[("OPWIRE_PORT", "99999")]))
            .unwrap_err();
        assert!(err.to_string().contains("OPWIRE_PORT"));

        let err = ClientConfig::default()
            .with_overrides(lookup(&[("OPWIRE_PORT", "0")]))
            .unwrap_err();
        assert!(matches!(err, OpwireError::Config(_)));
    }

    #[test]
    fn test_zero_connect_timeout_rejected() {
        let err = ClientConfig::default()
            .with_overrides(lookup(&[("OPWIRE_CONNECT_TIMEOUT_MS", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("connect_timeout_ms"));

        let config = ClientConfig {
            connect_timeout_ms: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(OpwireError::Config(_))));
    }

    #[test]
    fn test_framing_options() {
        let config = ClientConfig {
            max_message_size: 10,
            strict_padding: false,
            ..ClientConfig::default()
        };
        let options = config.framing_options();
        assert_eq!(options.max_payload_size, 10);
        assert!(!options.strict_padding);
        assert!(options.reject_trailing);
    }
}
