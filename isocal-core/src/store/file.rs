//! JSON file storage.
//!
//! The whole event list is one JSON array. A file that cannot be read back as
//! valid events is moved aside to `<name>.corrupt-<timestamp>` and the store
//! starts empty, so one corrupt record neither locks the user out of the
//! calendar nor gets overwritten by the next save.

use std::path::PathBuf;

use chrono::Utc;
use tracing::warn;

use crate::error::{IsocalError, IsocalResult};
use crate::event::Event;

use super::StorageBackend;

#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileBackend { path: path.into() }
    }

    fn quarantine_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3f")));
        PathBuf::from(name)
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> IsocalResult<Vec<Event>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Event>>(&content) {
            Ok(events) => Ok(events),
            Err(e) => {
                let moved_to = self.quarantine_path();
                std::fs::rename(&self.path, &moved_to)?;
                warn!(
                    path = %self.path.display(),
                    moved_to = %moved_to.display(),
                    error = %e,
                    "Stored events are invalid, moved aside"
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, events: &[Event]) -> IsocalResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(events)
            .map_err(|e| IsocalError::Serialization(e.to_string()))?;

        // Write to a sibling file first so a crash never leaves half a list behind
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}
