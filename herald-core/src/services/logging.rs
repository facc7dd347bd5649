//! Logging service

use crate::models::LogLevel;
use tracing_subscriber::EnvFilter;

/// Filter directive for the herald crates at the given level
pub fn filter_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "herald=error,herald_core=error",
        LogLevel::Warn => "herald=warn,herald_core=warn",
        LogLevel::Info => "herald=info,herald_core=info",
        LogLevel::Debug => "herald=debug,herald_core=debug",
        LogLevel::Trace => "herald=trace,herald_core=trace",
    }
}

/// Initialize logging with the specified level; `RUST_LOG` takes precedence
pub fn init_logging(level: LogLevel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(level)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

/// Log the outcome of a send through a named channel
pub fn log_delivery(channel: &str, transport: &str, message_id: Option<&str>) {
    tracing::info!(
        channel = channel,
        transport = transport,
        message_id = message_id.unwrap_or(""),
        "Notification delivered"
    );
}

/// Log a failed send through a named channel
pub fn log_error(channel: &str, error: &str) {
    tracing::error!(channel = channel, error = error, "Notification delivery failed");
}
