//! Month views for calendar rendering.
//!
//! [`IsoMonthView`] lays out an ISO month as rows of ISO weeks (Monday first).
//! [`NormalMonthView`] lays out a Gregorian month as Sunday-first rows with
//! empty padding cells. Both fill every day with the events occurring on it.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::date::IsoDate;
use crate::event::Event;
use crate::iso_week;
use crate::occurrence::{occurs_on_iso_date_any, occurs_on_normal_date_any};

/// One day of a month view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    pub iso_date: IsoDate,
    pub is_today: bool,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRow {
    pub iso_week: u32,
    pub is_current_week: bool,
    pub days: Vec<DayCell>,
}

/// ISO month `month` of `year`: 4, 4 or 5 week rows, plus week 53 in December
/// of leap-week years.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsoMonthView {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<WeekRow>,
}

impl IsoMonthView {
    pub fn build(year: i32, month: u32, events: &[Event], today: NaiveDate) -> Option<Self> {
        let today_iso = iso_week::iso_coordinates(today);
        let mut weeks = Vec::new();

        for week in iso_week::weeks_of_iso_month(year, month)? {
            let monday = iso_week::monday_of_iso_week(year, week)?;
            let mut days = Vec::with_capacity(7);

            for offset in 0..7 {
                let date = monday.checked_add_days(Days::new(u64::from(offset)))?;
                days.push(DayCell {
                    date,
                    iso_date: IsoDate::new(year, week, offset).ok()?,
                    is_today: date == today,
                    events: events
                        .iter()
                        .filter(|e| occurs_on_iso_date_any(e, year, week, offset))
                        .cloned()
                        .collect(),
                });
            }

            weeks.push(WeekRow {
                iso_week: week,
                is_current_week: today_iso.0 == year && today_iso.1 == week,
                days,
            });
        }

        Some(IsoMonthView { year, month, weeks })
    }
}

/// One cell of a Gregorian month grid; `None` pads before the 1st and after
/// the last day.
pub type NormalCell = Option<DayCell>;

/// Gregorian month `month` of `year` in Sunday-first rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalMonthView {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<NormalCell>>,
}

impl NormalMonthView {
    pub fn build(year: i32, month: u32, events: &[Event], today: NaiveDate) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let leading = first.weekday().num_days_from_sunday() as usize;

        let mut cells: Vec<NormalCell> = vec![None; leading];
        let mut day = first;
        while day.month() == month {
            cells.push(Some(DayCell {
                date: day,
                iso_date: IsoDate::try_from(day).ok()?,
                is_today: day == today,
                events: events
                    .iter()
                    .filter(|e| occurs_on_normal_date_any(e, year, month, day.day()))
                    .cloned()
                    .collect(),
            }));

            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        let weeks = cells.chunks(7).map(<[NormalCell]>::to_vec).collect();
        Some(NormalMonthView { year, month, weeks })
    }
}

pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 { (year - 1, 12) } else { (year, month - 1) }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 { (year + 1, 1) } else { (year, month + 1) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RawEvent;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(value: serde_json::Value) -> Event {
        let mut raw: RawEvent = serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4().to_string(),
            "title": "Grid event",
            "description": "",
            "financialCost": 0,
            "color": "#336699",
            "recurrence": "EveryYear",
        }))
        .unwrap();
        raw.date = serde_json::from_value(value).unwrap();
        Event::from_raw(&raw).unwrap()
    }

    #[test]
    fn test_iso_month_rows_follow_partition() {
        let view = IsoMonthView::build(2024, 3, &[], date(2024, 1, 1)).unwrap();
        let weeks: Vec<u32> = view.weeks.iter().map(|w| w.iso_week).collect();
        assert_eq!(weeks, vec![9, 10, 11, 12, 13]);
        assert!(view.weeks.iter().all(|w| w.days.len() == 7));
        assert_eq!(view.weeks[0].days[0].date, date(2024, 2, 26));
    }

    #[test]
    fn test_iso_december_includes_leap_week() {
        let view = IsoMonthView::build(2020, 12, &[], date(2020, 1, 1)).unwrap();
        assert_eq!(view.weeks.last().unwrap().iso_week, 53);
        assert_eq!(view.weeks.last().unwrap().days[6].date, date(2021, 1, 3));

        let view = IsoMonthView::build(2021, 12, &[], date(2021, 1, 1)).unwrap();
        assert_eq!(view.weeks.last().unwrap().iso_week, 52);
    }

    #[test]
    fn test_iso_month_places_both_event_kinds() {
        let iso_event = event(json!({"type": "iso", "value": {"year": 2023, "isoWeek": 2, "dayOffset": 3}}));
        let normal_event = event(json!({"type": "normal", "value": {"year": 2020, "month": 1, "day": 1}}));

        let view = IsoMonthView::build(2025, 1, &[iso_event.clone(), normal_event.clone()], date(2025, 1, 8)).unwrap();

        // 2025-W01 starts Monday Dec 30 2024, so Jan 1 is offset 2 of week 1
        assert_eq!(view.weeks[0].days[2].events, vec![normal_event]);
        assert_eq!(view.weeks[1].days[3].events, vec![iso_event]);
        assert!(view.weeks[1].is_current_week);
        assert!(view.weeks[1].days[2].is_today);
        assert!(!view.weeks[0].is_current_week);
    }

    #[test]
    fn test_iso_month_rejects_bad_month() {
        assert!(IsoMonthView::build(2025, 13, &[], date(2025, 1, 1)).is_none());
        assert!(IsoMonthView::build(2025, 0, &[], date(2025, 1, 1)).is_none());
    }

    #[test]
    fn test_normal_month_padding() {
        // September 2024 starts on a Sunday and has 30 days
        let view = NormalMonthView::build(2024, 9, &[], date(2024, 9, 10)).unwrap();
        assert_eq!(view.weeks.len(), 5);
        assert_eq!(view.weeks[0][0].as_ref().unwrap().date, date(2024, 9, 1));
        assert_eq!(view.weeks[4][1].as_ref().unwrap().date, date(2024, 9, 30));
        assert!(view.weeks[4][2].is_none());

        // February 2025 starts on a Saturday
        let view = NormalMonthView::build(2025, 2, &[], date(2025, 2, 1)).unwrap();
        assert!(view.weeks[0][..6].iter().all(Option::is_none));
        assert!(view.weeks[0][6].as_ref().unwrap().is_today);
        assert!(view.weeks.iter().all(|w| w.len() == 7));
    }

    #[test]
    fn test_normal_month_places_iso_event() {
        // 2024-W01-0 recurring yearly lands on Dec 30 2024 (2025-W01-0)
        let iso_event = event(json!({"type": "iso", "value": {"year": 2024, "isoWeek": 1, "dayOffset": 0}}));
        let view = NormalMonthView::build(2024, 12, &[iso_event.clone()], date(2024, 12, 1)).unwrap();

        let hits: Vec<NaiveDate> = view
            .weeks
            .iter()
            .flatten()
            .flatten()
            .filter(|cell| !cell.events.is_empty())
            .map(|cell| cell.date)
            .collect();
        assert_eq!(hits, vec![date(2024, 12, 30)]);
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        assert_eq!(previous_month(2025, 1), (2024, 12));
        assert_eq!(previous_month(2025, 6), (2025, 5));
        assert_eq!(next_month(2025, 12), (2026, 1));
        assert_eq!(next_month(2025, 6), (2025, 7));
    }
}
