//! Application layer services implementing business logic.
//!
//! This layer enforces the registry rules on top of the domain types. It
//! consumes the [`crate::domain::repositories::LinkStore`] trait and reports
//! through the telemetry client, so HTTP handlers and the admin CLI share
//! one implementation.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, resolution and click accounting

pub mod services;
