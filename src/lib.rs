//! # quicklink
//!
//! A short-link service: mint short codes for long URLs, redirect visitors
//! while a link is valid, count every click, and report what happens to a
//! remote log collector.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Link and click entities, error taxonomy, store trait
//! - **Application Layer** ([`application`]) - The link registry
//! - **Infrastructure Layer** ([`infrastructure`]) - JSON file storage and the telemetry client
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Batch creation of up to five links, all-or-nothing
//! - Custom or generated six-character codes
//! - Per-link validity window (default 30 minutes)
//! - Click history with source tags
//! - Best-effort telemetry with bounded retry
//!
//! ## Quick Start
//!
//! ```bash
//! export BASE_URL="http://localhost:3000"
//! export TELEMETRY_URL="http://collector.local/evaluation-service"  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod logging;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::LinkService;
    pub use crate::domain::entities::{Click, ClickSource, Link, LinkRequest, LinkStats};
    pub use crate::domain::errors::{CreationError, NotFoundError, ResolutionError};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::{JsonFileStore, MemoryStore};
    pub use crate::infrastructure::telemetry::{Stack, TelemetryClient};
    pub use crate::state::AppState;
}
