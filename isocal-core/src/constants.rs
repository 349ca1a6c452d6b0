//! Shared constants.

pub const DAYS_PER_WEEK: u32 = 7;

/// Week number of the leap week, present only in some years.
pub const LEAP_WEEK: u32 = 53;

pub const WEEKS_PER_QUARTER: u32 = 13;

pub const ISO_MONTHS: u32 = 12;

/// Colour given to imported events that do not carry one.
pub const DEFAULT_COLOR: &str = "#3498db";

/// How far ahead the next-occurrence search looks.
pub const NEXT_OCCURRENCE_HORIZON_YEARS: u32 = 10;

/// Column order used when exporting events to CSV.
pub const CSV_HEADERS: [&str; 12] = [
    "id",
    "title",
    "description",
    "financialCost",
    "color",
    "recurrence",
    "dateType",
    "year",
    "isoWeek",
    "dayOffset",
    "month",
    "day",
];
