//! Domain layer containing business entities, errors and the storage contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`errors`] - Creation, resolution and storage error taxonomy
//! - [`repositories`] - Persistence trait implemented by the infrastructure layer
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business rules live in [`crate::application::services`].

pub mod entities;
pub mod errors;
pub mod repositories;
