//! Telemetry event model and its JSON wire format.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::utils::validation::{is_known_level, is_known_stack};

/// Part of the system an event originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stack {
    Frontend,
    Backend,
}

impl Stack {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stack {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_known_stack(s) {
            return Err(TaxonomyError::UnknownStack(s.to_string()));
        }
        if s.eq_ignore_ascii_case("frontend") {
            Ok(Self::Frontend)
        } else {
            Ok(Self::Backend)
        }
    }
}

/// Severity of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_known_level(s) {
            return Err(TaxonomyError::UnknownLevel(s.to_string()));
        }
        let level = match s.to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Fatal,
        };
        Ok(level)
    }
}

/// A value outside the fixed telemetry taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    #[error("Invalid stack: {0}. Must be \"frontend\" or \"backend\"")]
    UnknownStack(String),

    #[error("Invalid level: {0}. Must be one of: debug, info, warn, error, fatal")]
    UnknownLevel(String),

    #[error("Invalid package \"{package}\" for stack \"{stack}\"")]
    UnknownPackage { stack: Stack, package: String },
}

/// A structured diagnostic sent to the remote collector.
///
/// Serializes to the collector's body: `{"stack", "level", "package", "message"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryEvent {
    pub stack: Stack,
    pub level: LogLevel,
    /// Category within the stack, always lower-case.
    pub package: String,
    pub message: String,
}

impl TelemetryEvent {
    pub fn new(
        stack: Stack,
        level: LogLevel,
        package: impl AsRef<str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stack,
            level,
            package: package.as_ref().to_ascii_lowercase(),
            message: message.into(),
        }
    }
}
