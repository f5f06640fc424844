//! Logging setup.
//!
//! Records from the library's `log` macros are forwarded into the same
//! subscriber, so one filter controls both.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Commands slower than this are reported at warn level
const SLOW_COMMAND_MS: u64 = 500;

/// Initialize logging to stderr
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Logging initialized");
}

/// Log how long a command took
pub fn log_command(command: &str, duration_ms: u64) {
    if duration_ms > SLOW_COMMAND_MS {
        tracing::warn!(command = command, duration_ms = duration_ms, "Slow command");
    } else {
        tracing::debug!(command = command, duration_ms = duration_ms, "Command finished");
    }
}
