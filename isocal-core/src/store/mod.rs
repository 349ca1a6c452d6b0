//! Event storage.
//!
//! [`EventStore`] implements every store operation once, on top of a
//! [`StorageBackend`] that only knows how to load and save the whole list.
//! The backend is chosen by the caller and handed to the store.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::csv_io;
use crate::error::{IsocalError, IsocalResult};
use crate::event::{Event, RawEvent};

/// Where events are kept between store operations.
pub trait StorageBackend: Send + Sync {
    fn load(&self) -> IsocalResult<Vec<Event>>;

    fn save(&self, events: &[Event]) -> IsocalResult<()>;
}

/// Whether an upsert inserted a new event or replaced one with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Summary of a CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    /// Rows that created a new event
    pub success: usize,
    /// Rows whose id already existed and replaced that event
    pub updated: usize,
    pub errors: Vec<String>,
}

pub struct EventStore {
    backend: Box<dyn StorageBackend>,
    // Serializes load-modify-save sequences
    write_lock: Mutex<()>,
}

impl EventStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        EventStore {
            backend: Box::new(backend),
            write_lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    /// All events in insertion order.
    pub fn list(&self) -> IsocalResult<Vec<Event>> {
        self.backend.load()
    }

    pub fn get(&self, id: Uuid) -> IsocalResult<Option<Event>> {
        Ok(self.backend.load()?.into_iter().find(|e| e.id() == id))
    }

    /// Validate `raw` under a freshly generated id and store it.
    pub fn create(&self, raw: RawEvent) -> IsocalResult<Event> {
        let event = Event::from_raw(&raw.with_id(Uuid::new_v4()))?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut events = self.backend.load()?;
        events.push(event.clone());
        self.backend.save(&events)?;

        debug!(id = %event.id(), title = event.title(), "Created event");
        Ok(event)
    }

    /// Replace the event `id` with `raw`; the id in `raw` is ignored.
    pub fn update(&self, id: Uuid, raw: RawEvent) -> IsocalResult<Event> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut events = self.backend.load()?;

        let slot = events
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(IsocalError::NotFound(id))?;

        let event = Event::from_raw(&raw.with_id(id))?;
        *slot = event.clone();
        self.backend.save(&events)?;

        debug!(id = %id, "Updated event");
        Ok(event)
    }

    pub fn delete(&self, id: Uuid) -> IsocalResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut events = self.backend.load()?;

        let before = events.len();
        events.retain(|e| e.id() != id);
        if events.len() == before {
            return Err(IsocalError::NotFound(id));
        }

        self.backend.save(&events)?;
        debug!(id = %id, "Deleted event");
        Ok(())
    }

    pub fn delete_all(&self) -> IsocalResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.backend.save(&[])?;
        debug!("Deleted all events");
        Ok(())
    }

    /// Insert `event`, replacing any stored event with the same id in place.
    pub fn upsert(&self, event: Event) -> IsocalResult<UpsertOutcome> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut events = self.backend.load()?;
        let outcome = upsert_into(&mut events, event);
        self.backend.save(&events)?;
        Ok(outcome)
    }

    /// Import CSV content, upserting every valid row.
    ///
    /// Invalid rows are reported in [`ImportResult::errors`] and do not stop
    /// the import. The store is saved once at the end.
    pub fn import_csv(&self, content: &str) -> IsocalResult<ImportResult> {
        let rows = csv_io::parse_events(content)?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut events = self.backend.load()?;
        let mut result = ImportResult::default();

        for row in rows {
            match row {
                Ok(event) => match upsert_into(&mut events, event) {
                    UpsertOutcome::Created => result.success += 1,
                    UpsertOutcome::Updated => result.updated += 1,
                },
                Err(message) => {
                    warn!(%message, "Skipping CSV row");
                    result.errors.push(message);
                }
            }
        }

        self.backend.save(&events)?;
        debug!(
            created = result.success,
            updated = result.updated,
            failed = result.errors.len(),
            "Imported CSV"
        );
        Ok(result)
    }

    pub fn export_csv(&self) -> IsocalResult<String> {
        csv_io::write_events(&self.list()?)
    }
}

fn upsert_into(events: &mut Vec<Event>, event: Event) -> UpsertOutcome {
    match events.iter_mut().find(|e| e.id() == event.id()) {
        Some(slot) => {
            *slot = event;
            UpsertOutcome::Updated
        }
        None => {
            events.push(event);
            UpsertOutcome::Created
        }
    }
}
