//! Session-scoped listing state
//!
//! The course listing remembers its last filter selection and sort key in a
//! small JSON file so a later run can pick up where it left off. Resetting
//! deletes the file.

use crate::core::filter::FilterSelection;
use crate::core::sort::CourseSort;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Last-used listing state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    /// Filter selection including the search text
    pub filters: FilterSelection,
    /// Sort key
    pub sort: CourseSort,
}

impl SessionState {
    /// Read saved state.
    ///
    /// A missing file is `None`. An unreadable or corrupt file is also
    /// `None` (with a warning) so a bad state file never blocks a listing.
    #[must_use]
    pub fn load(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                crate::warn!("Could not read session state {}: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                crate::warn!("Ignoring corrupt session state {}: {e}", path.display());
                None
            }
        }
    }

    /// Write state, creating parent directories as needed
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Delete saved state. Succeeds when there is nothing to delete.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
