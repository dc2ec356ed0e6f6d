//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`persistence`] - Storage adapters implementing [`crate::domain::repositories::LinkStore`]
//! - [`telemetry`] - Remote log collector client

pub mod persistence;
pub mod telemetry;
