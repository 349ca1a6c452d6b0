//! In-process storage that lives as long as the store.

use std::sync::{PoisonError, RwLock};

use crate::error::IsocalResult;
use crate::event::Event;

use super::StorageBackend;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    events: RwLock<Vec<Event>>,
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> IsocalResult<Vec<Event>> {
        Ok(self
            .events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, events: &[Event]) -> IsocalResult<()> {
        *self.events.write().unwrap_or_else(PoisonError::into_inner) = events.to_vec();
        Ok(())
    }
}
