//! Persistence adapter contract for the link registry.

use crate::domain::entities::Link;
use crate::domain::errors::StoreError;

/// Durable storage for the full set of links.
///
/// The registry calls [`LinkStore::load`] once at startup and writes the whole
/// collection back after every successful mutation. Calls are synchronous
/// from the registry's point of view.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::JsonFileStore`] - JSON file on disk
/// - [`crate::infrastructure::persistence::MemoryStore`] - process-local, for tests and ephemeral runs
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait LinkStore: Send + Sync {
    /// Returns the previously saved links, or `None` if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the data cannot be read or parsed.
    fn load(&self) -> Result<Option<Vec<Link>>, StoreError>;

    /// Replaces the stored collection with `links`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the data cannot be written.
    fn save(&self, links: &[Link]) -> Result<(), StoreError>;

    /// Removes the stored collection entirely.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if existing data cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}
