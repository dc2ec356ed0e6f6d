//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Records currently in the registry.
    pub links: usize,
    /// `enabled` when a telemetry collector is configured.
    pub telemetry: &'static str,
}
