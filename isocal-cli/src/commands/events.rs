use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use isocal_core::iso_week::iso_coordinates;
use isocal_core::search::{events_on_normal_date, next_occurrence, upcoming as upcoming_events};
use isocal_core::EventStore;
use owo_colors::OwoColorize;

use crate::commands::resolve_event;
use crate::render::{Render, render_details};

pub fn list(store: &EventStore) -> Result<()> {
    let events = store.list()?;

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
    }

    Ok(())
}

pub fn show(store: &EventStore, id: &str) -> Result<()> {
    let event = resolve_event(store, id)?;
    println!("{}", render_details(&event));
    Ok(())
}

pub fn delete(store: &EventStore, id: &str) -> Result<()> {
    let event = resolve_event(store, id)?;
    store.delete(event.id())?;
    println!("{}", format!("  Deleted: {}", event.title()).red());
    Ok(())
}

pub fn clear(store: &EventStore) -> Result<()> {
    let count = store.list()?.len();
    store.delete_all()?;
    println!("{}", format!("  Deleted {} events", count).red());
    Ok(())
}

/// Events occurring on `date`, whichever calendar they were recorded in.
pub fn day(store: &EventStore, date: NaiveDate) -> Result<()> {
    let (iso_year, week, offset) = iso_coordinates(date);
    println!(
        "{} {}",
        date.format("%A %B %-d %Y").to_string().bold(),
        format!("({}-W{:02}-{})", iso_year, week, offset).cyan()
    );

    let events = store.list()?;
    let found = events_on_normal_date(&events, date.year(), date.month(), date.day());

    if found.is_empty() {
        println!("{}", "  No events".dimmed());
    }
    for event in found {
        println!("  {}", event.render());
    }

    Ok(())
}

pub fn next(store: &EventStore, id: &str, from: Option<NaiveDate>) -> Result<()> {
    let event = resolve_event(store, id)?;
    let from = from.unwrap_or_else(|| Local::now().date_naive());

    match next_occurrence(&event, from) {
        Some(date) => println!("{} {}", event.title().bold(), format_occurrence(date, from)),
        None => println!(
            "{} {}",
            event.title().bold(),
            "does not occur again within 10 years".dimmed()
        ),
    }

    Ok(())
}

pub fn upcoming(store: &EventStore, limit: usize, from: Option<NaiveDate>) -> Result<()> {
    let from = from.unwrap_or_else(|| Local::now().date_naive());
    let events = store.list()?;
    let found = upcoming_events(&events, from, limit);

    if found.is_empty() {
        println!("{}", "No upcoming events".dimmed());
        return Ok(());
    }

    for (date, event) in found {
        println!("{:<24} {}", format_occurrence(date, from), event.render());
    }

    Ok(())
}

/// "Today", "Tomorrow", or the date with its ISO week date.
fn format_occurrence(date: NaiveDate, from: NaiveDate) -> String {
    let (year, week, offset) = iso_coordinates(date);
    let label = match (date - from).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %Y-%m-%d").to_string(),
    };
    format!("{} {}", label, format!("{}-W{:02}-{}", year, week, offset).cyan())
}
