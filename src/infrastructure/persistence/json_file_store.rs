//! JSON file implementation of the link store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::entities::{Link, find_duplicate_code};
use crate::domain::errors::StoreError;
use crate::domain::repositories::LinkStore;

/// Stores the whole registry as a JSON array in a single file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write leaves the previous contents intact. A file
/// that fails to load is renamed to `<name>.corrupt` so the next save cannot
/// overwrite it.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path(".tmp")
    }

    /// Where an unreadable data file is moved to.
    pub fn corrupt_path(&self) -> PathBuf {
        self.sibling_path(".corrupt")
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn quarantine(&self, error: StoreError) -> StoreError {
        let target = self.corrupt_path();
        match fs::rename(&self.path, &target) {
            Ok(()) => warn!(
                path = %self.path.display(),
                moved_to = %target.display(),
                error = %error,
                "Moved unreadable data file aside"
            ),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to move unreadable data file aside"
            ),
        }
        error
    }
}

impl LinkStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Link>>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let links: Vec<Link> = match serde_json::from_str(&contents) {
            Ok(links) => links,
            Err(e) => return Err(self.quarantine(e.into())),
        };

        if let Some(code) = find_duplicate_code(&links) {
            let error = StoreError::DuplicateCode(code.to_string());
            return Err(self.quarantine(error));
        }

        debug!(path = %self.path.display(), count = links.len(), "Loaded links");
        Ok(Some(links))
    }

    fn save(&self, links: &[Link]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(links)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), count = links.len(), "Saved links");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
