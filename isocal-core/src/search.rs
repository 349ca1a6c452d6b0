//! Day-level queries across many events.

use chrono::{Months, NaiveDate};

use crate::constants::NEXT_OCCURRENCE_HORIZON_YEARS;
use crate::event::Event;
use crate::occurrence::{occurs_on, occurs_on_iso_date_any, occurs_on_normal_date_any};

/// First day on or after `from` on which `event` occurs.
///
/// Scans day by day and gives up after ten years.
pub fn next_occurrence(event: &Event, from: NaiveDate) -> Option<NaiveDate> {
    let horizon = from
        .checked_add_months(Months::new(NEXT_OCCURRENCE_HORIZON_YEARS * 12))
        .unwrap_or(NaiveDate::MAX);

    from.iter_days()
        .take_while(|day| *day <= horizon)
        .find(|day| occurs_on(event, *day))
}

/// The next occurrence of each event from `from`, soonest first.
///
/// Events without an occurrence inside the search horizon are left out.
pub fn upcoming(events: &[Event], from: NaiveDate, limit: usize) -> Vec<(NaiveDate, &Event)> {
    let mut found: Vec<(NaiveDate, &Event)> = events
        .iter()
        .filter_map(|event| next_occurrence(event, from).map(|date| (date, event)))
        .collect();

    found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.title().cmp(b.1.title())));
    found.truncate(limit);
    found
}

pub fn events_on_normal_date(events: &[Event], year: i32, month: u32, day: u32) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| occurs_on_normal_date_any(e, year, month, day))
        .collect()
}

pub fn events_on_iso_date(events: &[Event], year: i32, iso_week: u32, day_offset: u32) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| occurs_on_iso_date_any(e, year, iso_week, day_offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RawEvent;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(title: &str, recurrence: &str, value: serde_json::Value) -> Event {
        let raw: RawEvent = serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4().to_string(),
            "title": title,
            "description": "",
            "financialCost": 0,
            "color": "#336699",
            "recurrence": recurrence,
            "date": value,
        }))
        .unwrap();
        Event::from_raw(&raw).unwrap()
    }

    #[test]
    fn test_next_occurrence_of_yearly_normal_event() {
        let e = event("Birthday", "EveryYear", json!({"type": "normal", "value": {"year": 1990, "month": 5, "day": 17}}));
        assert_eq!(next_occurrence(&e, date(2025, 5, 17)), Some(date(2025, 5, 17)));
        assert_eq!(next_occurrence(&e, date(2025, 5, 18)), Some(date(2026, 5, 17)));
    }

    #[test]
    fn test_next_occurrence_of_iso_event_crosses_gregorian_year() {
        let e = event("Kickoff", "EveryYear", json!({"type": "iso", "value": {"year": 2024, "isoWeek": 1, "dayOffset": 0}}));
        assert_eq!(next_occurrence(&e, date(2024, 6, 1)), Some(date(2024, 12, 30)));
    }

    #[test]
    fn test_next_occurrence_of_past_one_off_is_none() {
        let e = event("Done", "None", json!({"type": "normal", "value": {"year": 2020, "month": 1, "day": 1}}));
        assert_eq!(next_occurrence(&e, date(2020, 1, 2)), None);
    }

    #[test]
    fn test_next_occurrence_gives_up_after_horizon() {
        let e = event("Decade", "None", json!({"type": "normal", "value": {"year": 2040, "month": 1, "day": 2}}));
        assert_eq!(next_occurrence(&e, date(2030, 1, 1)), None);
        assert_eq!(next_occurrence(&e, date(2030, 1, 3)), Some(date(2040, 1, 2)));
    }

    #[test]
    fn test_upcoming_sorts_and_limits() {
        let events = vec![
            event("Later", "None", json!({"type": "normal", "value": {"year": 2025, "month": 9, "day": 1}})),
            event("Sooner", "EveryWeek", json!({"type": "normal", "value": {"year": 2025, "month": 1, "day": 6}})),
            event("Past", "None", json!({"type": "normal", "value": {"year": 2024, "month": 9, "day": 1}})),
        ];

        let found = upcoming(&events, date(2025, 3, 1), 10);
        let titles: Vec<&str> = found.iter().map(|(_, e)| e.title()).collect();
        assert_eq!(titles, vec!["Sooner", "Later"]);
        assert_eq!(found[0].0, date(2025, 3, 3));

        assert_eq!(upcoming(&events, date(2025, 3, 1), 1).len(), 1);
    }

    #[test]
    fn test_upcoming_breaks_same_day_ties_by_title() {
        // 2025-W11-0 is Monday 2025-03-10
        let events = vec![
            event("Beta", "None", json!({"type": "normal", "value": {"year": 2025, "month": 3, "day": 10}})),
            event("Alpha", "None", json!({"type": "iso", "value": {"year": 2025, "isoWeek": 11, "dayOffset": 0}})),
        ];

        let found = upcoming(&events, date(2025, 3, 1), 10);
        let titles: Vec<&str> = found.iter().map(|(_, e)| e.title()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta"]);
        assert!(found.iter().all(|(day, _)| *day == date(2025, 3, 10)));

        let first = upcoming(&events, date(2025, 3, 1), 1);
        assert_eq!(first[0].1.title(), "Alpha");
    }

    #[test]
    fn test_events_on_day_in_either_system() {
        let events = vec![
            event("Iso", "None", json!({"type": "iso", "value": {"year": 2025, "isoWeek": 1, "dayOffset": 2}})),
            event("Normal", "None", json!({"type": "normal", "value": {"year": 2025, "month": 1, "day": 1}})),
            event("Other", "None", json!({"type": "normal", "value": {"year": 2025, "month": 1, "day": 2}})),
        ];

        let by_normal: Vec<&str> = events_on_normal_date(&events, 2025, 1, 1).iter().map(|e| e.title()).collect();
        let by_iso: Vec<&str> = events_on_iso_date(&events, 2025, 1, 2).iter().map(|e| e.title()).collect();
        assert_eq!(by_normal, vec!["Iso", "Normal"]);
        assert_eq!(by_iso, by_normal);
    }
}
