//! Conversion between ISO week coordinates and Gregorian month/day coordinates.
//!
//! Weeks run Monday to Sunday and week 1 is the week holding the year's first
//! Thursday (ISO-8601). Day offsets count from Monday = 0 to Sunday = 6.

use std::ops::RangeInclusive;

use chrono::{Datelike, Days, Duration, NaiveDate};

use crate::constants::{DAYS_PER_WEEK, ISO_MONTHS, LEAP_WEEK, WEEKS_PER_QUARTER};

/// Position of `date` within its ISO week (Monday = 0 .. Sunday = 6).
pub fn day_offset(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// ISO week-year, week number and day offset of a Gregorian date.
///
/// The week-year differs from the Gregorian year for dates between
/// Dec 29 and Jan 3 whose week belongs to the neighbouring year.
pub fn iso_coordinates(date: NaiveDate) -> (i32, u32, u32) {
    let offset = day_offset(date);

    // The Thursday of the date's week fixes both week-year and week number.
    match date.checked_add_signed(Duration::days(3 - i64::from(offset))) {
        Some(thursday) => (thursday.year(), thursday.ordinal0() / DAYS_PER_WEEK + 1, offset),
        None => {
            let iso = date.iso_week();
            (iso.year(), iso.week(), offset)
        }
    }
}

/// ISO week number (1..=53) of a Gregorian date.
pub fn iso_week_of(date: NaiveDate) -> u32 {
    iso_coordinates(date).1
}

/// The Monday that begins ISO week `week` of `year`.
///
/// Week 53 of a year without a leap week yields the Monday of week 1 of the
/// following year; callers should not ask for it.
pub fn monday_of_iso_week(year: i32, week: u32) -> Option<NaiveDate> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let simple = jan_first.checked_add_days(Days::new(
        u64::from(week.saturating_sub(1)) * u64::from(DAYS_PER_WEEK),
    ))?;

    // Sunday = 0 here; Sunday..Thursday fall back (or forward, for Sunday) to
    // that week's Monday, Friday and Saturday move on to the next Monday.
    let dow = i64::from(simple.weekday().num_days_from_sunday());
    let shift = if dow <= 4 { 1 - dow } else { 8 - dow };

    simple.checked_add_signed(Duration::days(shift))
}

/// Gregorian date of an ISO (year, week, day offset) triple.
pub fn from_iso_coordinates(year: i32, week: u32, day_offset: u32) -> Option<NaiveDate> {
    monday_of_iso_week(year, week)?.checked_add_days(Days::new(u64::from(day_offset)))
}

/// True when Dec 31 of `year` falls in ISO week 53.
pub fn has_leap_week(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 12, 31).is_some_and(|dec_31| iso_week_of(dec_31) == LEAP_WEEK)
}

pub fn weeks_in_year(year: i32) -> u32 {
    if has_leap_week(year) { LEAP_WEEK } else { LEAP_WEEK - 1 }
}

/// ISO month (1..=12) that displays `iso_week`.
///
/// Each quarter spans 13 weeks split 4/4/5; week 53 belongs to month 12.
pub fn iso_month_of_week(iso_week: u32) -> u32 {
    if iso_week >= LEAP_WEEK {
        return ISO_MONTHS;
    }

    let index = iso_week.saturating_sub(1);
    let quarter = index / WEEKS_PER_QUARTER;
    let month_in_quarter = match index % WEEKS_PER_QUARTER {
        0..=3 => 0,
        4..=7 => 1,
        _ => 2,
    };

    quarter * 3 + month_in_quarter + 1
}

/// ISO weeks belonging to ISO month `month` of `year`; `None` unless
/// `month` is 1..=12.
pub fn weeks_of_iso_month(year: i32, month: u32) -> Option<RangeInclusive<u32>> {
    if !(1..=ISO_MONTHS).contains(&month) {
        return None;
    }

    let quarter = (month - 1) / 3;
    let month_in_quarter = (month - 1) % 3;

    let first = quarter * WEEKS_PER_QUARTER + month_in_quarter * 4 + 1;
    let last = match month_in_quarter {
        2 if month == ISO_MONTHS && has_leap_week(year) => LEAP_WEEK,
        2 => first + 4,
        _ => first + 3,
    };

    Some(first..=last)
}

/// Build a date the way a lenient calendar would: days past the end of the
/// month roll into the next one (Feb 30 becomes Mar 1 or Mar 2).
pub fn lenient_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_days(Days::new(u64::from(day.checked_sub(1)?)))
}
