//! Repository trait definitions for the domain layer.
//!
//! - [`LinkStore`] - load/save pair backing the link registry
//!
//! Implementations live in `crate::infrastructure::persistence`; a mock is
//! generated via `mockall` for unit tests.

pub mod link_store;

pub use link_store::LinkStore;

#[cfg(test)]
pub use link_store::MockLinkStore;
