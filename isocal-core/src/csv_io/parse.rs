//! CSV parsing into validated events.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::Number;
use uuid::Uuid;

use super::CsvRow;
use crate::constants::DEFAULT_COLOR;
use crate::date::{RawIsoDate, RawNormalDate};
use crate::error::{IsocalError, IsocalResult};
use crate::event::{Event, RawEvent, RawEventDate};
use crate::recurrence::RecurrencePattern;

/// Parse CSV content into one result per non-blank data row.
///
/// Row errors read `Row N: <reason>`, where N counts non-blank lines from
/// the header (the first data row is row 2). Only a file without a header
/// fails as a whole.
pub fn parse_events(content: &str) -> IsocalResult<Vec<Result<Event, String>>> {
    if content.trim().is_empty() {
        return Err(IsocalError::EmptyCsv);
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IsocalError::Csv(e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    let mut row_number = 1;

    for record in reader.records() {
        let record = match record {
            Ok(record) if is_blank(&record) => continue,
            Ok(record) => record,
            Err(e) => {
                row_number += 1;
                rows.push(Err(format!("Row {}: {}", row_number, e)));
                continue;
            }
        };
        row_number += 1;

        let parsed = record
            .deserialize::<CsvRow>(Some(&headers))
            .map_err(|e| e.to_string())
            .and_then(|row| Event::from_raw(&row_to_raw(row)).map_err(|e| e.to_string()))
            .map_err(|reason| format!("Row {}: {}", row_number, reason));

        rows.push(parsed);
    }

    Ok(rows)
}

/// A whitespace-only line. Lines of bare separators (`,,,`) are rows with
/// empty cells and still go through validation.
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record[0].trim().is_empty()
}

/// Fill in the import defaults and build the structural record.
fn row_to_raw(row: CsvRow) -> RawEvent {
    let id = row.id.unwrap_or_else(|| Uuid::new_v4().to_string());

    let date = if row.date_type.as_deref() == Some("normal") {
        RawEventDate::Normal(RawNormalDate {
            year: parse_integer(row.year.as_deref()),
            month: parse_integer(row.month.as_deref()),
            day: parse_integer(row.day.as_deref()),
        })
    } else {
        RawEventDate::Iso(RawIsoDate {
            year: parse_integer(row.year.as_deref()),
            iso_week: parse_integer(row.iso_week.as_deref()),
            day_offset: parse_integer(row.day_offset.as_deref()),
        })
    };

    RawEvent {
        id: Some(id),
        title: row.title,
        description: Some(row.description.unwrap_or_default()),
        financial_cost: Number::from_f64(parse_cost(row.financial_cost.as_deref())),
        color: Some(row.color.unwrap_or_else(|| DEFAULT_COLOR.to_string())),
        recurrence: Some(
            row.recurrence
                .unwrap_or_else(|| RecurrencePattern::None.as_str().to_string()),
        ),
        date: Some(date),
    }
}

/// Numeric cell; fractional values are kept so validation can reject them.
fn parse_integer(cell: Option<&str>) -> Option<Number> {
    let cell = cell?;
    match cell.parse::<i64>() {
        Ok(n) => Some(Number::from(n)),
        Err(_) => cell.parse::<f64>().ok().and_then(Number::from_f64),
    }
}

/// Unreadable or missing costs import as zero.
fn parse_cost(cell: Option<&str>) -> f64 {
    cell.and_then(|c| c.parse::<f64>().ok())
        .filter(|c| c.is_finite())
        .unwrap_or(0.0)
}
