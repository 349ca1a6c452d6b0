//! The event entity.
//!
//! An [`Event`] is an immutable, validated record anchored on exactly one date,
//! either an [`IsoDate`] or a [`NormalDate`]. Its structural form is
//! [`RawEvent`], which is what JSON bodies, stored files and CSV rows become
//! before validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;
use uuid::Uuid;

use crate::date::{IsoDate, NormalDate, RawIsoDate, RawNormalDate};
use crate::error::{Issues, ValidationError};
use crate::recurrence::RecurrencePattern;

/// Anchor date of an event, tagged by coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventDate {
    Iso(IsoDate),
    Normal(NormalDate),
}

impl EventDate {
    /// The tag used on the wire: `"iso"` or `"normal"`.
    pub fn kind(&self) -> &'static str {
        match self {
            EventDate::Iso(_) => "iso",
            EventDate::Normal(_) => "normal",
        }
    }

    pub fn to_raw(&self) -> RawEventDate {
        match self {
            EventDate::Iso(date) => RawEventDate::Iso(date.to_raw()),
            EventDate::Normal(date) => RawEventDate::Normal(date.to_raw()),
        }
    }

    pub fn from_raw(raw: &RawEventDate) -> Result<Self, ValidationError> {
        match raw {
            RawEventDate::Iso(value) => IsoDate::from_raw(value).map(EventDate::Iso),
            RawEventDate::Normal(value) => NormalDate::from_raw(value).map(EventDate::Normal),
        }
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventDate::Iso(date) => date.fmt(f),
            EventDate::Normal(date) => date.fmt(f),
        }
    }
}

impl From<IsoDate> for EventDate {
    fn from(date: IsoDate) -> Self {
        EventDate::Iso(date)
    }
}

impl From<NormalDate> for EventDate {
    fn from(date: NormalDate) -> Self {
        EventDate::Normal(date)
    }
}

/// Structural form of an [`EventDate`]: `{"type": "iso" | "normal", "value": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum RawEventDate {
    Iso(RawIsoDate),
    Normal(RawNormalDate),
}

/// Structural form of an [`Event`]; nothing here has been checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_cost: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<RawEventDate>,
}

impl RawEvent {
    /// Replace whatever id the record carries.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub struct Event {
    id: Uuid,
    title: String,
    description: String,
    financial_cost: f64,
    color: String,
    recurrence: RecurrencePattern,
    date: EventDate,
}

/// Field overrides for [`Event::with_updates`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub financial_cost: Option<f64>,
    pub color: Option<String>,
    pub recurrence: Option<RecurrencePattern>,
    pub date: Option<EventDate>,
}

impl Event {
    /// Validate a structural record, reporting every violated field.
    pub fn from_raw(raw: &RawEvent) -> Result<Self, ValidationError> {
        let mut issues = Issues::default();

        let id = match raw.id.as_deref() {
            None => {
                issues.push("id", "is required");
                None
            }
            Some(s) => match Uuid::parse_str(s) {
                Ok(id) => Some(id),
                Err(_) => {
                    issues.push("id", "must be a UUID");
                    None
                }
            },
        };

        let title = match raw.title.as_deref() {
            None => {
                issues.push("title", "is required");
                None
            }
            Some("") => {
                issues.push("title", "must not be empty");
                None
            }
            Some(title) => Some(title.to_string()),
        };

        if raw.description.is_none() {
            issues.push("description", "is required");
        }

        let financial_cost = match raw.financial_cost.as_ref().and_then(Number::as_f64) {
            None => {
                issues.push("financialCost", "is required");
                None
            }
            Some(cost) if cost < 0.0 => {
                issues.push("financialCost", "must not be negative");
                None
            }
            Some(cost) => Some(cost),
        };

        let color = match raw.color.as_deref() {
            None => {
                issues.push("color", "is required");
                None
            }
            Some(color) if !is_hex_color(color) => {
                issues.push("color", format!("'{}' must match #RRGGBB", color));
                None
            }
            Some(color) => Some(color.to_string()),
        };

        let recurrence = match raw.recurrence.as_deref() {
            None => {
                issues.push("recurrence", "is required");
                None
            }
            Some(tag) => tag
                .parse::<RecurrencePattern>()
                .map_err(|e| issues.extend(e))
                .ok(),
        };

        let date = match &raw.date {
            None => {
                issues.push("date", "is required");
                None
            }
            Some(date) => EventDate::from_raw(date)
                .map_err(|e| issues.extend(e.prefixed("date.value")))
                .ok(),
        };

        issues.finish()?;

        match (id, title, financial_cost, color, recurrence, date) {
            (Some(id), Some(title), Some(financial_cost), Some(color), Some(recurrence), Some(date)) => {
                Ok(Event {
                    id,
                    title,
                    description: raw.description.clone().unwrap_or_default(),
                    financial_cost,
                    color,
                    recurrence,
                    date,
                })
            }
            _ => Err(ValidationError::single("event", "incomplete")),
        }
    }

    /// Validate untyped JSON such as a request body.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        let raw: RawEvent = serde_json::from_value(value)
            .map_err(|e| ValidationError::single("event", e.to_string()))?;
        Self::from_raw(&raw)
    }

    pub fn to_raw(&self) -> RawEvent {
        RawEvent {
            id: Some(self.id.to_string()),
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            financial_cost: Number::from_f64(self.financial_cost),
            color: Some(self.color.clone()),
            recurrence: Some(self.recurrence.as_str().to_string()),
            date: Some(self.date.to_raw()),
        }
    }

    /// A copy with the same id and the given fields replaced.
    ///
    /// The result is validated again, so an override such as an empty title
    /// is rejected rather than producing an invalid event.
    pub fn with_updates(&self, update: EventUpdate) -> Result<Self, ValidationError> {
        let mut raw = self.to_raw();

        if let Some(title) = update.title {
            raw.title = Some(title);
        }
        if let Some(description) = update.description {
            raw.description = Some(description);
        }
        if let Some(cost) = update.financial_cost {
            raw.financial_cost = Number::from_f64(cost);
        }
        if let Some(color) = update.color {
            raw.color = Some(color);
        }
        if let Some(recurrence) = update.recurrence {
            raw.recurrence = Some(recurrence.as_str().to_string());
        }
        if let Some(date) = update.date {
            raw.date = Some(date.to_raw());
        }

        Self::from_raw(&raw)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn financial_cost(&self) -> f64 {
        self.financial_cost
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn recurrence(&self) -> RecurrencePattern {
        self.recurrence
    }

    pub fn date(&self) -> &EventDate {
        &self.date
    }
}

impl TryFrom<RawEvent> for Event {
    type Error = ValidationError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Event::from_raw(&raw)
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        event.to_raw()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// `#RRGGBB` with hexadecimal digits of either case.
fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn iso_raw() -> RawEvent {
        RawEvent {
            id: Some("6f1c2a9e-0d43-4b8e-9a55-2c7f0e3b1d64".to_string()),
            title: Some("Quarterly review".to_string()),
            description: Some("Bring the numbers".to_string()),
            financial_cost: Some(120.into()),
            color: Some("#3498DB".to_string()),
            recurrence: Some("Every2Years".to_string()),
            date: Some(RawEventDate::Iso(RawIsoDate::new(2024, 1, 0))),
        }
    }

    #[test]
    fn test_from_raw_builds_iso_event() {
        let event = Event::from_raw(&iso_raw()).unwrap();
        assert_eq!(event.title(), "Quarterly review");
        assert_eq!(event.recurrence(), RecurrencePattern::Every2Years);
        assert_eq!(event.date(), &EventDate::Iso(IsoDate::new(2024, 1, 0).unwrap()));
        assert_eq!(event.financial_cost(), 120.0);
    }

    #[test]
    fn test_rejects_named_color() {
        let mut raw = iso_raw();
        raw.color = Some("blue".to_string());
        let err = Event::from_raw(&raw).unwrap_err();
        assert!(err.has_field("color"));
        assert_eq!(err.issues.len(), 1);
    }

    #[test]
    fn test_reports_every_violation_at_once() {
        let raw = RawEvent {
            id: Some("not-a-uuid".to_string()),
            title: Some(String::new()),
            description: None,
            financial_cost: Number::from_f64(-3.5),
            color: Some("#12345".to_string()),
            recurrence: Some("Sometimes".to_string()),
            date: Some(RawEventDate::Normal(RawNormalDate::new(2024, 13, 1))),
        };
        let err = Event::from_raw(&raw).unwrap_err();

        for field in [
            "id",
            "title",
            "description",
            "financialCost",
            "color",
            "recurrence",
            "date.value.month",
        ] {
            assert!(err.has_field(field), "missing issue for {}", field);
        }
    }

    #[test]
    fn test_missing_date_is_required() {
        let mut raw = iso_raw();
        raw.date = None;
        assert!(Event::from_raw(&raw).unwrap_err().has_field("date"));
    }

    #[test]
    fn test_json_shape() {
        let event = Event::from_raw(&iso_raw()).unwrap();
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["financialCost"], json!(120.0));
        assert_eq!(value["date"], json!({"type": "iso", "value": {"year": 2024, "isoWeek": 1, "dayOffset": 0}}));
        assert_eq!(value["recurrence"], json!("Every2Years"));
    }

    #[test]
    fn test_from_json_rejects_unknown_date_type() {
        let mut value = serde_json::to_value(Event::from_raw(&iso_raw()).unwrap()).unwrap();
        value["date"]["type"] = json!("lunar");
        assert!(Event::from_json(value).is_err());
    }

    #[test]
    fn test_structural_roundtrip_is_idempotent() {
        let event = Event::from_raw(&iso_raw()).unwrap();
        let again = Event::from_raw(&event.to_raw()).unwrap();
        assert_eq!(again, event);

        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_with_updates_keeps_id_and_untouched_fields() {
        let event = Event::from_raw(&iso_raw()).unwrap();
        let normal = NormalDate::new(2025, 6, 15).unwrap();

        let updated = event
            .with_updates(EventUpdate {
                title: Some("Moved review".to_string()),
                date: Some(normal.into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.id(), event.id());
        assert_eq!(updated.title(), "Moved review");
        assert_eq!(updated.description(), event.description());
        assert_eq!(updated.color(), event.color());
        assert_eq!(updated.date(), &EventDate::Normal(normal));
        assert_eq!(updated.date().kind(), "normal");
    }

    #[test]
    fn test_with_updates_revalidates() {
        let event = Event::from_raw(&iso_raw()).unwrap();
        let err = event
            .with_updates(EventUpdate {
                financial_cost: Some(-1.0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.has_field("financialCost"));
    }
}
