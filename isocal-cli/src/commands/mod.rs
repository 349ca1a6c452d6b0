pub mod add;
pub mod calendar;
pub mod events;
pub mod transfer;

use anyhow::Result;
use isocal_core::{Event, EventStore};

/// Find the one event whose id equals or starts with `id`.
pub fn resolve_event(store: &EventStore, id: &str) -> Result<Event> {
    let id = id.trim().to_lowercase();
    let mut matches: Vec<Event> = store
        .list()?
        .into_iter()
        .filter(|e| e.id().to_string().starts_with(&id))
        .collect();

    match matches.len() {
        0 => anyhow::bail!("No event with id '{}'", id),
        1 => Ok(matches.remove(0)),
        n => anyhow::bail!("Id '{}' is ambiguous ({} events match); use more characters", id, n),
    }
}
