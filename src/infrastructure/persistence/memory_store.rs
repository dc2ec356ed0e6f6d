//! In-process link store.

use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::Link;
use crate::domain::errors::StoreError;
use crate::domain::repositories::LinkStore;

/// A store that keeps the saved collection in memory.
///
/// # Use Cases
///
/// - Tests that need a real (non-mock) store
/// - Ephemeral runs where nothing should touch the disk
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Option<Vec<Link>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `links`.
    pub fn with_links(links: Vec<Link>) -> Self {
        Self {
            saved: Mutex::new(Some(links)),
        }
    }

    /// The collection most recently saved, if any.
    pub fn snapshot(&self) -> Option<Vec<Link>> {
        self.saved().clone()
    }

    fn saved(&self) -> MutexGuard<'_, Option<Vec<Link>>> {
        // The guarded value is replaced wholesale, so a poisoned lock still
        // holds a consistent collection.
        self.saved.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LinkStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Link>>, StoreError> {
        Ok(self.saved().clone())
    }

    fn save(&self, links: &[Link]) -> Result<(), StoreError> {
        *self.saved() = Some(links.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.saved() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let links = vec![Link::new(
            Uuid::new_v4(),
            "https://example.com".to_string(),
            "abc123".to_string(),
            Utc::now(),
            None,
        )];

        store.save(&links).unwrap();
        assert_eq!(store.load().unwrap(), Some(links));

        store.clear().unwrap();
        assert!(store.snapshot().is_none());
    }
}
