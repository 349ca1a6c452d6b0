//! CSV import and export.
//!
//! Columns are matched by header name, so files may order or omit them
//! freely. An event uses either the ISO columns (`year`, `isoWeek`,
//! `dayOffset`) or the month/day columns (`year`, `month`, `day`), picked by
//! `dateType`.

mod generate;
mod parse;

pub use generate::write_events;
pub use parse::parse_events;

use serde::{Deserialize, Serialize};

/// One CSV line; every cell is optional text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    financial_cost: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    recurrence: Option<String>,
    #[serde(default)]
    date_type: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    iso_week: Option<String>,
    #[serde(default)]
    day_offset: Option<String>,
    #[serde(default)]
    month: Option<String>,
    #[serde(default)]
    day: Option<String>,
}
