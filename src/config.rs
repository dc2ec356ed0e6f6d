//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `BASE_URL` - Public origin used to build short URLs (default: `http://localhost:3000`)
//! - `DATA_FILE` - JSON file holding the link registry (default: `quicklink-links.json`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//!
//! ## Telemetry
//!
//! ```bash
//! export TELEMETRY_URL="http://collector.local/evaluation-service"
//! export TELEMETRY_TOKEN="eyJhbGciOi..."
//! export TELEMETRY_RETRY_ATTEMPTS="3"
//! export TELEMETRY_RETRY_DELAY_MS="1000"
//! export TELEMETRY_TIMEOUT_SECS="10"
//! ```
//!
//! Without `TELEMETRY_URL` events are only written to the local log.

use anyhow::{Context, Result};
use std::env;

use crate::infrastructure::telemetry::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Origin prepended to short codes, without a trailing slash.
    pub base_url: String,
    pub data_file: String,
    pub log_level: String,
    pub log_format: String,
    pub telemetry: TelemetryConfig,
}

/// Settings for the remote telemetry collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Collector base URL; events are posted to `<collector_url>/logs`.
    pub collector_url: Option<String>,
    /// Initial bearer credential.
    pub token: Option<String>,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            collector_url: None,
            token: None,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            request_timeout_secs: 10,
        }
    }
}

impl TelemetryConfig {
    /// Loads the `TELEMETRY_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but not a number.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            collector_url: non_empty_var("TELEMETRY_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            token: non_empty_var("TELEMETRY_TOKEN"),
            retry_attempts: parse_var("TELEMETRY_RETRY_ATTEMPTS")?
                .unwrap_or(defaults.retry_attempts),
            retry_delay_ms: parse_var("TELEMETRY_RETRY_DELAY_MS")?
                .unwrap_or(defaults.retry_delay_ms),
            request_timeout_secs: parse_var("TELEMETRY_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.collector_url.is_some()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric telemetry variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();
        let data_file =
            env::var("DATA_FILE").unwrap_or_else(|_| "quicklink-links.json".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let telemetry =
            TelemetryConfig::from_env().context("Failed to load telemetry configuration")?;

        Ok(Self {
            listen_addr,
            base_url,
            data_file,
            log_level,
            log_format,
            telemetry,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `base_url` or the collector URL is not an absolute http(s) URL
    /// - retry attempts fall outside `1..=10`
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !is_http_url(&self.base_url) {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.base_url
            );
        }

        if self.data_file.trim().is_empty() {
            anyhow::bail!("DATA_FILE must not be empty");
        }

        if let Some(ref url) = self.telemetry.collector_url
            && !is_http_url(url)
        {
            anyhow::bail!(
                "TELEMETRY_URL must start with 'http://' or 'https://', got '{}'",
                url
            );
        }

        if !(1..=10).contains(&self.telemetry.retry_attempts) {
            anyhow::bail!(
                "TELEMETRY_RETRY_ATTEMPTS must be between 1 and 10, got {}",
                self.telemetry.retry_attempts
            );
        }

        if self.telemetry.retry_delay_ms == 0 {
            anyhow::bail!("TELEMETRY_RETRY_DELAY_MS must be greater than 0");
        }

        if self.telemetry.request_timeout_secs == 0 {
            anyhow::bail!("TELEMETRY_TIMEOUT_SECS must be greater than 0");
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);
        tracing::info!("  Data file: {}", self.data_file);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);

        match self.telemetry.collector_url {
            Some(ref url) => tracing::info!(
                "  Telemetry: {} (token: {}, attempts: {}, delay: {}ms)",
                url,
                self.telemetry
                    .token
                    .as_deref()
                    .map_or_else(|| "none".to_string(), mask_token),
                self.telemetry.retry_attempts,
                self.telemetry.retry_delay_ms
            ),
            None => tracing::info!("  Telemetry: local only"),
        }
    }
}

/// Masks a credential for logging, keeping only its first four characters.
fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if token.chars().count() <= 4 {
        "***".to_string()
    } else {
        format!("{visible}***")
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    non_empty_var(key)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a number, got '{v}'"))
        })
        .transpose()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable cannot be parsed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const TELEMETRY_VARS: [&str; 5] = [
        "TELEMETRY_URL",
        "TELEMETRY_TOKEN",
        "TELEMETRY_RETRY_ATTEMPTS",
        "TELEMETRY_RETRY_DELAY_MS",
        "TELEMETRY_TIMEOUT_SECS",
    ];

    fn clear_telemetry_vars() {
        // SAFETY: Callers are #[serial], so no concurrent access
        unsafe {
            for key in TELEMETRY_VARS {
                env::remove_var(key);
            }
        }
    }

    fn valid_config() -> Config {
        Config {
            listen_addr: "0.0.0.0:3000".to_string(),
            base_url: "http://localhost:3000".to_string(),
            data_file: "links.json".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            telemetry: TelemetryConfig::default(),
        }
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9"), "eyJh***");
        assert_eq!(mask_token("abc"), "***");
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());

        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());

        config.listen_addr = "0.0.0.0:3000".to_string();

        config.base_url = "localhost:3000".to_string();
        assert!(config.validate().is_err());

        config.base_url = "https://qk.example".to_string();
        config.telemetry.collector_url = Some("ftp://collector".to_string());
        assert!(config.validate().is_err());

        config.telemetry.collector_url = Some("http://collector".to_string());
        config.telemetry.retry_attempts = 0;
        assert!(config.validate().is_err());

        config.telemetry.retry_attempts = 11;
        assert!(config.validate().is_err());

        config.telemetry.retry_attempts = 3;
        assert!(config.validate().is_ok());

        config.telemetry.retry_delay_ms = 0;
        assert!(config.validate().is_err());

        config.telemetry.retry_delay_ms = 1000;
        config.telemetry.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.telemetry.request_timeout_secs = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_telemetry_defaults() {
        let telemetry = TelemetryConfig::default();

        assert!(!telemetry.is_enabled());
        assert_eq!(telemetry.retry_attempts, 3);
        assert_eq!(telemetry.retry_delay_ms, 1000);
    }

    #[test]
    #[serial]
    fn test_telemetry_from_env() {
        clear_telemetry_vars();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("TELEMETRY_URL", "http://collector.local/evaluation/");
            env::set_var("TELEMETRY_TOKEN", "token-123");
            env::set_var("TELEMETRY_RETRY_ATTEMPTS", "5");
            env::set_var("TELEMETRY_RETRY_DELAY_MS", "250");
        }

        let telemetry = TelemetryConfig::from_env().unwrap();

        assert_eq!(
            telemetry.collector_url.as_deref(),
            Some("http://collector.local/evaluation")
        );
        assert_eq!(telemetry.token.as_deref(), Some("token-123"));
        assert_eq!(telemetry.retry_attempts, 5);
        assert_eq!(telemetry.retry_delay_ms, 250);
        assert_eq!(telemetry.request_timeout_secs, 10);

        clear_telemetry_vars();
    }

    #[test]
    #[serial]
    fn test_telemetry_rejects_non_numeric_attempts() {
        clear_telemetry_vars();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("TELEMETRY_RETRY_ATTEMPTS", "three");
        }

        assert!(TelemetryConfig::from_env().is_err());

        clear_telemetry_vars();
    }

    #[test]
    #[serial]
    fn test_blank_telemetry_url_disables_delivery() {
        clear_telemetry_vars();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("TELEMETRY_URL", "  ");
        }

        let telemetry = TelemetryConfig::from_env().unwrap();
        assert!(!telemetry.is_enabled());

        clear_telemetry_vars();
    }
}
