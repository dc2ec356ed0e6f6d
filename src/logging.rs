//! Logging initialization.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and either a
//! human-readable or a JSON `fmt` layer, matching `LOG_FORMAT`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when it parses.
///
/// # Formats
///
/// * `"json"` - One JSON object per line
/// * `"text"` - Human-readable output with ANSI colors
///
/// # Errors
///
/// Returns an error for an unknown format or if a subscriber is already set.
pub fn init_tracing(level: &str, format: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "text" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_target(true))
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize text tracing subscriber: {}", e)
                })?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'text' or 'json'",
                format
            ));
        }
    }

    Ok(())
}
