//! The two date value types events are anchored on.
//!
//! [`IsoDate`] addresses a day by ISO week, [`NormalDate`] by month and day.
//! Both validate their field ranges on construction and are immutable after.
//! The `Raw*` records are their untyped structural form, used for JSON and CSV.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::{Issues, ValidationError};
use crate::iso_week;

const MIN_YEAR: i64 = 1;
const MAX_YEAR: i64 = i32::MAX as i64;

/// Structural form of an [`IsoDate`]; fields are unchecked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIsoDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_week: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_offset: Option<Number>,
}

impl RawIsoDate {
    pub fn new(year: i64, iso_week: i64, day_offset: i64) -> Self {
        RawIsoDate {
            year: Some(year.into()),
            iso_week: Some(iso_week.into()),
            day_offset: Some(day_offset.into()),
        }
    }
}

/// Structural form of a [`NormalDate`]; fields are unchecked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNormalDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Number>,
}

impl RawNormalDate {
    pub fn new(year: i64, month: i64, day: i64) -> Self {
        RawNormalDate {
            year: Some(year.into()),
            month: Some(month.into()),
            day: Some(day.into()),
        }
    }
}

/// A day addressed as (year, ISO week 1..=53, day offset 0..=6 from Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIsoDate", into = "RawIsoDate")]
pub struct IsoDate {
    year: i32,
    iso_week: u32,
    day_offset: u32,
}

impl IsoDate {
    pub fn new(year: i32, iso_week: u32, day_offset: u32) -> Result<Self, ValidationError> {
        Self::from_raw(&RawIsoDate::new(
            i64::from(year),
            i64::from(iso_week),
            i64::from(day_offset),
        ))
    }

    pub fn from_raw(raw: &RawIsoDate) -> Result<Self, ValidationError> {
        let mut issues = Issues::default();
        let year = issues.integer_in("year", raw.year.as_ref(), MIN_YEAR, MAX_YEAR);
        let iso_week = issues.integer_in("isoWeek", raw.iso_week.as_ref(), 1, 53);
        let day_offset = issues.integer_in("dayOffset", raw.day_offset.as_ref(), 0, 6);
        issues.finish()?;

        // finish() succeeded, so every field passed its range check
        match (year, iso_week, day_offset) {
            (Some(year), Some(iso_week), Some(day_offset)) => Ok(IsoDate {
                year: year as i32,
                iso_week: iso_week as u32,
                day_offset: day_offset as u32,
            }),
            _ => Err(ValidationError::single("isoDate", "incomplete")),
        }
    }

    pub fn to_raw(&self) -> RawIsoDate {
        RawIsoDate::new(
            i64::from(self.year),
            i64::from(self.iso_week),
            i64::from(self.day_offset),
        )
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn iso_week(&self) -> u32 {
        self.iso_week
    }

    pub fn day_offset(&self) -> u32 {
        self.day_offset
    }

    /// The Gregorian day this ISO date names, if it exists.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        iso_week::from_iso_coordinates(self.year, self.iso_week, self.day_offset)
    }
}

impl TryFrom<NaiveDate> for IsoDate {
    type Error = ValidationError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        let (year, week, offset) = iso_week::iso_coordinates(date);
        IsoDate::new(year, week, offset)
    }
}

impl TryFrom<RawIsoDate> for IsoDate {
    type Error = ValidationError;

    fn try_from(raw: RawIsoDate) -> Result<Self, Self::Error> {
        IsoDate::from_raw(&raw)
    }
}

impl From<IsoDate> for RawIsoDate {
    fn from(date: IsoDate) -> Self {
        date.to_raw()
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}-{}", self.year, self.iso_week, self.day_offset)
    }
}

impl FromStr for IsoDate {
    type Err = ValidationError;

    /// Parse the display form, e.g. `2024-W01-0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed =
            || ValidationError::single("isoDate", format!("'{}' is not in YYYY-Www-d form", s));

        let mut parts = s.trim().split('-');
        let (Some(year), Some(week), Some(offset), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let week = week
            .strip_prefix('W')
            .or_else(|| week.strip_prefix('w'))
            .ok_or_else(malformed)?;

        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let week = week.parse::<u32>().map_err(|_| malformed())?;
        let offset = offset.parse::<u32>().map_err(|_| malformed())?;

        IsoDate::new(year, week, offset)
    }
}

/// A day addressed as (year, month 1..=12, day 1..=31).
///
/// The day is not checked against the length of the month, so Feb 30 is
/// accepted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawNormalDate", into = "RawNormalDate")]
pub struct NormalDate {
    year: i32,
    month: u32,
    day: u32,
}

impl NormalDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ValidationError> {
        Self::from_raw(&RawNormalDate::new(
            i64::from(year),
            i64::from(month),
            i64::from(day),
        ))
    }

    pub fn from_raw(raw: &RawNormalDate) -> Result<Self, ValidationError> {
        let mut issues = Issues::default();
        let year = issues.integer_in("year", raw.year.as_ref(), MIN_YEAR, MAX_YEAR);
        let month = issues.integer_in("month", raw.month.as_ref(), 1, 12);
        let day = issues.integer_in("day", raw.day.as_ref(), 1, 31);
        issues.finish()?;

        match (year, month, day) {
            (Some(year), Some(month), Some(day)) => Ok(NormalDate {
                year: year as i32,
                month: month as u32,
                day: day as u32,
            }),
            _ => Err(ValidationError::single("normalDate", "incomplete")),
        }
    }

    pub fn to_raw(&self) -> RawNormalDate {
        RawNormalDate::new(
            i64::from(self.year),
            i64::from(self.month),
            i64::from(self.day),
        )
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The calendar day, or `None` for days the month does not have.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl TryFrom<NaiveDate> for NormalDate {
    type Error = ValidationError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        NormalDate::new(date.year(), date.month(), date.day())
    }
}

impl TryFrom<RawNormalDate> for NormalDate {
    type Error = ValidationError;

    fn try_from(raw: RawNormalDate) -> Result<Self, Self::Error> {
        NormalDate::from_raw(&raw)
    }
}

impl From<NormalDate> for RawNormalDate {
    fn from(date: NormalDate) -> Self {
        date.to_raw()
    }
}

impl fmt::Display for NormalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for NormalDate {
    type Err = ValidationError;

    /// Parse the display form, e.g. `2024-02-29`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed =
            || ValidationError::single("normalDate", format!("'{}' is not in YYYY-MM-DD form", s));

        let mut parts = s.trim().split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;
        let day = day.parse::<u32>().map_err(|_| malformed())?;

        NormalDate::new(year, month, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_rejects_out_of_range_week() {
        let err = IsoDate::new(2024, 54, 0).unwrap_err();
        assert!(err.has_field("isoWeek"));
        assert_eq!(err.issues.len(), 1);
    }

    #[test]
    fn test_iso_date_reports_every_bad_field() {
        let err = IsoDate::from_raw(&RawIsoDate::new(0, 0, 7)).unwrap_err();
        assert!(err.has_field("year"));
        assert!(err.has_field("isoWeek"));
        assert!(err.has_field("dayOffset"));
    }

    #[test]
    fn test_iso_date_missing_field_is_required() {
        let raw = RawIsoDate {
            year: Some(2024.into()),
            iso_week: None,
            day_offset: Some(3.into()),
        };
        let err = IsoDate::from_raw(&raw).unwrap_err();
        assert_eq!(err.issues[0].field, "isoWeek");
        assert_eq!(err.issues[0].reason, "is required");
    }

    #[test]
    fn test_iso_date_display_is_zero_padded() {
        assert_eq!(IsoDate::new(2024, 1, 0).unwrap().to_string(), "2024-W01-0");
        assert_eq!(IsoDate::new(987, 33, 6).unwrap().to_string(), "0987-W33-6");
    }

    #[test]
    fn test_iso_date_parses_display_form() {
        let date: IsoDate = "2020-W53-4".parse().unwrap();
        assert_eq!(date, IsoDate::new(2020, 53, 4).unwrap());
        assert!("2020-53-4".parse::<IsoDate>().is_err());
        assert!("2020-W54-4".parse::<IsoDate>().unwrap_err().has_field("isoWeek"));
    }

    #[test]
    fn test_iso_date_json_uses_camel_case() {
        let date = IsoDate::new(2024, 10, 2).unwrap();
        let json = serde_json::to_value(date).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"year": 2024, "isoWeek": 10, "dayOffset": 2})
        );
        let back: IsoDate = serde_json::from_value(json).unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn test_iso_date_json_validates() {
        let json = serde_json::json!({"year": 2024, "isoWeek": 54, "dayOffset": 2});
        assert!(serde_json::from_value::<IsoDate>(json).is_err());
    }

    #[test]
    fn test_iso_date_to_naive() {
        let date = IsoDate::new(2025, 1, 2).unwrap();
        assert_eq!(date.to_naive(), NaiveDate::from_ymd_opt(2025, 1, 1));
        let back = IsoDate::try_from(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn test_normal_date_accepts_feb_30() {
        let date = NormalDate::new(2024, 2, 30).unwrap();
        assert_eq!(date.to_string(), "2024-02-30");
        assert_eq!(date.to_naive(), None);
    }

    #[test]
    fn test_normal_date_rejects_out_of_range_fields() {
        let err = NormalDate::new(2024, 13, 32).unwrap_err();
        assert!(err.has_field("month"));
        assert!(err.has_field("day"));
        assert!(NormalDate::new(0, 1, 1).unwrap_err().has_field("year"));
    }

    #[test]
    fn test_normal_date_rejects_fractional_day() {
        let raw = RawNormalDate {
            year: Some(2024.into()),
            month: Some(5.into()),
            day: Number::from_f64(3.5),
        };
        let err = NormalDate::from_raw(&raw).unwrap_err();
        assert_eq!(err.issues[0].reason, "must be an integer");
    }

    #[test]
    fn test_normal_date_parses_display_form() {
        let date: NormalDate = "2024-02-29".parse().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 29));
        assert!("2024/02/29".parse::<NormalDate>().is_err());
    }

    #[test]
    fn test_raw_roundtrip_preserves_fields() {
        let date = NormalDate::new(1999, 12, 31).unwrap();
        assert_eq!(NormalDate::from_raw(&date.to_raw()).unwrap(), date);
    }
}
