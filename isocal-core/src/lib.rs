//! Core types for isocal.
//!
//! This crate is shared by isocal-server and isocal-cli:
//! - `IsoDate`/`NormalDate` and the conversion between ISO week and Gregorian coordinates
//! - `Event` validation and the recurrence evaluator in [`occurrence`]
//! - `EventStore` with memory and JSON file backends, plus CSV import/export
//! - month views and next-occurrence search for front-ends

pub mod config;
pub mod constants;
pub mod csv_io;
pub mod date;
pub mod error;
pub mod event;
pub mod grid;
pub mod iso_week;
pub mod occurrence;
pub mod recurrence;
pub mod search;
pub mod store;

pub use date::{IsoDate, NormalDate, RawIsoDate, RawNormalDate};
pub use error::{FieldIssue, IsocalError, IsocalResult, ValidationError};
pub use event::{Event, EventDate, EventUpdate, RawEvent, RawEventDate};
pub use occurrence::{
    occurs_on, occurs_on_iso_date, occurs_on_iso_date_any, occurs_on_normal_date,
    occurs_on_normal_date_any,
};
pub use recurrence::RecurrencePattern;
pub use store::{EventStore, ImportResult, UpsertOutcome};
