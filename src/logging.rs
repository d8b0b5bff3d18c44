//! Tracing setup shared by the CLI and the server.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Initialize console logging on stderr (stdout is reserved for output).
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is used as the
/// filter directive (e.g. `"info"` or `"doctor_directory=debug"`).
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).try_init()?;

    tracing::debug!(default_level, "Tracing initialized");
    Ok(())
}
