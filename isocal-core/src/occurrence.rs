//! Decides whether an event occurs on a given day.
//!
//! Each coordinate system has a native evaluator that only understands events
//! anchored in that same system. The `_any` wrappers accept events of either
//! kind and convert the queried day into the anchor's coordinates first, so a
//! calendar grid can ask about any event regardless of how it was stored.
//!
//! ISO-anchored events only repeat on the same week and day offset in later
//! years. Daily, weekly, monthly and quarterly patterns never match an ISO
//! anchor.

use chrono::{Datelike, NaiveDate};

use crate::event::{Event, EventDate};
use crate::iso_week;
use crate::recurrence::RecurrencePattern;

/// Does an ISO-anchored event occur on (`year`, `iso_week`, `day_offset`)?
///
/// Always false for events anchored on a [`crate::NormalDate`].
pub fn occurs_on_iso_date(event: &Event, year: i32, iso_week: u32, day_offset: u32) -> bool {
    let EventDate::Iso(anchor) = event.date() else {
        return false;
    };

    if anchor.iso_week() != iso_week || anchor.day_offset() != day_offset {
        return false;
    }

    let year_delta = i64::from(year) - i64::from(anchor.year());

    match event.recurrence() {
        RecurrencePattern::None => year_delta == 0,
        pattern => pattern.matches_year_delta(year_delta),
    }
}

/// Does a month/day-anchored event occur on (`year`, `month`, `day`)?
///
/// Always false for events anchored on a [`crate::IsoDate`], and for days that
/// do not exist on the calendar (Feb 29 outside leap years).
pub fn occurs_on_normal_date(event: &Event, year: i32, month: u32, day: u32) -> bool {
    let EventDate::Normal(anchor) = event.date() else {
        return false;
    };

    let Some(target) = NaiveDate::from_ymd_opt(year, month, day) else {
        return false;
    };

    // The anchor itself may be Feb 30; it rolls forward for day arithmetic.
    let Some(start) = iso_week::lenient_date(anchor.year(), anchor.month(), anchor.day()) else {
        return false;
    };
    let days_since_start = (target - start).num_days();

    let same_month_day = month == anchor.month() && day == anchor.day();
    let year_delta = i64::from(year) - i64::from(anchor.year());

    match event.recurrence() {
        RecurrencePattern::None => year_delta == 0 && same_month_day,
        RecurrencePattern::EveryDay => days_since_start >= 0,
        RecurrencePattern::EveryWeek => days_since_start >= 0 && days_since_start % 7 == 0,
        RecurrencePattern::EveryMonth => day == anchor.day() && days_since_start >= 0,
        RecurrencePattern::EveryQuarter => {
            day == anchor.day() && month % 3 == anchor.month() % 3 && days_since_start >= 0
        }
        pattern => same_month_day && pattern.matches_year_delta(year_delta),
    }
}

/// [`occurs_on_normal_date`] for events of either kind.
///
/// ISO-anchored events are asked about the ISO coordinates of the day, whose
/// week-year can differ from `year` between Dec 29 and Jan 3.
pub fn occurs_on_normal_date_any(event: &Event, year: i32, month: u32, day: u32) -> bool {
    match event.date() {
        EventDate::Normal(_) => occurs_on_normal_date(event, year, month, day),
        EventDate::Iso(_) => {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                return false;
            };
            let (iso_year, week, offset) = iso_week::iso_coordinates(date);
            occurs_on_iso_date(event, iso_year, week, offset)
        }
    }
}

/// [`occurs_on_iso_date`] for events of either kind.
pub fn occurs_on_iso_date_any(event: &Event, year: i32, iso_week: u32, day_offset: u32) -> bool {
    match event.date() {
        EventDate::Iso(_) => occurs_on_iso_date(event, year, iso_week, day_offset),
        EventDate::Normal(_) => {
            if !(1..=53).contains(&iso_week) || day_offset > 6 {
                return false;
            }
            let Some(date) = iso_week::from_iso_coordinates(year, iso_week, day_offset) else {
                return false;
            };
            occurs_on_normal_date(event, date.year(), date.month(), date.day())
        }
    }
}

/// Does the event occur on this calendar day, whatever its anchor?
pub fn occurs_on(event: &Event, date: NaiveDate) -> bool {
    occurs_on_normal_date_any(event, date.year(), date.month(), date.day())
}
