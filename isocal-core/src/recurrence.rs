//! Recurrence patterns an event can repeat on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecurrencePattern {
    #[default]
    None,
    EveryDay,
    EveryWeek,
    EveryMonth,
    EveryQuarter,
    EveryYear,
    Every2Years,
    Every3Years,
    Every5Years,
    Every10Years,
}

impl RecurrencePattern {
    pub const ALL: [RecurrencePattern; 10] = [
        RecurrencePattern::None,
        RecurrencePattern::EveryDay,
        RecurrencePattern::EveryWeek,
        RecurrencePattern::EveryMonth,
        RecurrencePattern::EveryQuarter,
        RecurrencePattern::EveryYear,
        RecurrencePattern::Every2Years,
        RecurrencePattern::Every3Years,
        RecurrencePattern::Every5Years,
        RecurrencePattern::Every10Years,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrencePattern::None => "None",
            RecurrencePattern::EveryDay => "EveryDay",
            RecurrencePattern::EveryWeek => "EveryWeek",
            RecurrencePattern::EveryMonth => "EveryMonth",
            RecurrencePattern::EveryQuarter => "EveryQuarter",
            RecurrencePattern::EveryYear => "EveryYear",
            RecurrencePattern::Every2Years => "Every2Years",
            RecurrencePattern::Every3Years => "Every3Years",
            RecurrencePattern::Every5Years => "Every5Years",
            RecurrencePattern::Every10Years => "Every10Years",
        }
    }

    /// Human-readable label, e.g. "Every 2 years".
    pub fn label(&self) -> &'static str {
        match self {
            RecurrencePattern::None => "Does not repeat",
            RecurrencePattern::EveryDay => "Every day",
            RecurrencePattern::EveryWeek => "Every week",
            RecurrencePattern::EveryMonth => "Every month",
            RecurrencePattern::EveryQuarter => "Every quarter",
            RecurrencePattern::EveryYear => "Every year",
            RecurrencePattern::Every2Years => "Every 2 years",
            RecurrencePattern::Every3Years => "Every 3 years",
            RecurrencePattern::Every5Years => "Every 5 years",
            RecurrencePattern::Every10Years => "Every 10 years",
        }
    }

    /// Cycle length in years for the yearly patterns, `None` for the rest.
    pub fn year_interval(&self) -> Option<i64> {
        match self {
            RecurrencePattern::EveryYear => Some(1),
            RecurrencePattern::Every2Years => Some(2),
            RecurrencePattern::Every3Years => Some(3),
            RecurrencePattern::Every5Years => Some(5),
            RecurrencePattern::Every10Years => Some(10),
            _ => None,
        }
    }

    /// Whether `year_delta` years after the anchor lands on the cycle.
    pub(crate) fn matches_year_delta(&self, year_delta: i64) -> bool {
        self.year_interval()
            .is_some_and(|interval| year_delta >= 0 && year_delta % interval == 0)
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrencePattern {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecurrencePattern::ALL
            .into_iter()
            .find(|pattern| pattern.as_str() == s)
            .ok_or_else(|| {
                ValidationError::single("recurrence", format!("unknown recurrence '{}'", s))
            })
    }
}
