//! Logging setup for programs built on this crate.
//!
//! The library itself only emits `tracing` events. Binaries call
//! [`init_logging`] once to print them on stderr, which keeps stdout free for
//! shell prompts.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_DIRECTIVE: &str = "opwire_client=info";

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `default_directive` when `RUST_LOG` is unset or invalid.
/// Returns `false` if a global subscriber was already installed; later
/// calls are ignored.
pub fn init_logging(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
