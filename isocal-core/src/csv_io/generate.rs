//! CSV generation.

use csv::WriterBuilder;

use super::CsvRow;
use crate::constants::CSV_HEADERS;
use crate::error::{IsocalError, IsocalResult};
use crate::event::{Event, EventDate};

/// Write events as CSV with a header row.
///
/// The columns of the coordinate system an event does not use stay empty, so
/// the output imports back to the same events.
pub fn write_events(events: &[Event]) -> IsocalResult<String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| IsocalError::Csv(e.to_string()))?;

    for event in events {
        writer
            .serialize(to_row(event))
            .map_err(|e| IsocalError::Csv(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| IsocalError::Csv(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| IsocalError::Csv(e.to_string()))
}

fn to_row(event: &Event) -> CsvRow {
    let mut row = CsvRow {
        id: Some(event.id().to_string()),
        title: Some(event.title().to_string()),
        description: Some(event.description().to_string()),
        financial_cost: Some(event.financial_cost().to_string()),
        color: Some(event.color().to_string()),
        recurrence: Some(event.recurrence().as_str().to_string()),
        date_type: Some(event.date().kind().to_string()),
        ..Default::default()
    };

    match event.date() {
        EventDate::Iso(date) => {
            row.year = Some(date.year().to_string());
            row.iso_week = Some(date.iso_week().to_string());
            row.day_offset = Some(date.day_offset().to_string());
        }
        EventDate::Normal(date) => {
            row.year = Some(date.year().to_string());
            row.month = Some(date.month().to_string());
            row.day = Some(date.day().to_string());
        }
    }

    row
}
