//! Utility functions for validation and code generation.
//!
//! - [`validation`] - URL and telemetry taxonomy predicates
//! - [`code_generator`] - Short code generation

pub mod code_generator;
pub mod validation;
