use anyhow::Result;
use isocal_core::constants::DEFAULT_COLOR;
use isocal_core::{EventDate, EventStore, IsoDate, NormalDate, RawEvent, RecurrencePattern};
use owo_colors::OwoColorize;
use serde_json::Number;

use crate::render::Render;

/// Which calendar the new event is anchored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    Iso(IsoDate),
    Normal(NormalDate),
}

impl When {
    pub fn from_args(iso: Option<IsoDate>, date: Option<NormalDate>) -> Result<Self> {
        match (iso, date) {
            (Some(iso), None) => Ok(When::Iso(iso)),
            (None, Some(date)) => Ok(When::Normal(date)),
            (Some(_), Some(_)) => anyhow::bail!("Use either --iso or --date, not both"),
            (None, None) => anyhow::bail!("An event needs a date: pass --iso YYYY-Www-d or --date YYYY-MM-DD"),
        }
    }
}

impl From<When> for EventDate {
    fn from(when: When) -> Self {
        match when {
            When::Iso(date) => EventDate::Iso(date),
            When::Normal(date) => EventDate::Normal(date),
        }
    }
}

pub struct Draft {
    pub title: String,
    pub when: When,
    pub recurrence: RecurrencePattern,
    pub cost: f64,
    pub color: Option<String>,
    pub description: String,
}

impl Draft {
    /// Structural record for the store, which assigns the id and validates.
    pub fn to_raw(&self) -> RawEvent {
        RawEvent {
            id: None,
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            financial_cost: Number::from_f64(self.cost),
            color: Some(self.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string())),
            recurrence: Some(self.recurrence.as_str().to_string()),
            date: Some(EventDate::from(self.when).to_raw()),
        }
    }
}

pub fn run(store: &EventStore, draft: Draft) -> Result<()> {
    let event = store.create(draft.to_raw())?;

    println!("{}", format!("  Created: {}", event.title()).green());
    println!("  {}", event.render());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use isocal_core::IsocalError;

    fn draft(when: When) -> Draft {
        Draft {
            title: "Planning".to_string(),
            when,
            recurrence: RecurrencePattern::EveryQuarter,
            cost: 40.0,
            color: None,
            description: String::new(),
        }
    }

    #[test]
    fn test_when_requires_exactly_one_date() {
        let iso: IsoDate = "2025-W10-2".parse().unwrap();
        let date: NormalDate = "2025-03-05".parse().unwrap();

        assert_eq!(When::from_args(Some(iso), None).unwrap(), When::Iso(iso));
        assert_eq!(When::from_args(None, Some(date)).unwrap(), When::Normal(date));
        assert!(When::from_args(Some(iso), Some(date)).is_err());
        assert!(When::from_args(None, None).is_err());
    }

    #[test]
    fn test_draft_fills_default_color() {
        let raw = draft(When::Normal("2025-03-05".parse().unwrap())).to_raw();
        assert_eq!(raw.color.as_deref(), Some(DEFAULT_COLOR));
        assert_eq!(raw.recurrence.as_deref(), Some("EveryQuarter"));
        assert!(raw.id.is_none());
    }

    #[test]
    fn test_run_stores_event() {
        let store = EventStore::in_memory();
        run(&store, draft(When::Iso("2025-W10-2".parse().unwrap()))).unwrap();

        let events = store.list().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].financial_cost(), 40.0);
        assert_eq!(events[0].date().kind(), "iso");
    }

    #[test]
    fn test_run_rejects_bad_color() {
        let store = EventStore::in_memory();
        let mut bad = draft(When::Iso("2025-W10-2".parse().unwrap()));
        bad.color = Some("red".to_string());

        let err = run(&store, bad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IsocalError>(),
            Some(IsocalError::Validation(e)) if e.has_field("color")
        ));
        assert!(store.list().unwrap().is_empty());
    }
}
