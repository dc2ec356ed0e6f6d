//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL with its validity window and click history
//! - [`Click`] - A single successful resolution of a short code
//!
//! Creation input is kept separate from the stored record: a [`LinkRequest`]
//! becomes a [`Link`] only after the registry has validated the whole batch.

pub mod click;
pub mod link;

pub use click::{Click, ClickSource};
pub use link::{
    DEFAULT_VALIDITY_MINUTES, Link, LinkRequest, LinkStats, LinkStatus, MAX_VALIDITY_MINUTES,
    find_duplicate_code, validity_window,
};
