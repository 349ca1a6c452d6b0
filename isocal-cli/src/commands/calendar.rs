use anyhow::Result;
use chrono::Local;
use isocal_core::grid::{IsoMonthView, NormalMonthView};
use isocal_core::EventStore;

use crate::render::Render;

pub fn iso(store: &EventStore, year: i32, month: u32) -> Result<()> {
    let events = store.list()?;
    let today = Local::now().date_naive();

    let view = IsoMonthView::build(year, month, &events, today)
        .ok_or_else(|| anyhow::anyhow!("ISO month must be between 1 and 12, got {}", month))?;

    println!("{}", view.render());
    Ok(())
}

pub fn month(store: &EventStore, year: i32, month: u32) -> Result<()> {
    let events = store.list()?;
    let today = Local::now().date_naive();

    let view = NormalMonthView::build(year, month, &events, today)
        .ok_or_else(|| anyhow::anyhow!("Month must be between 1 and 12, got {}", month))?;

    println!("{}", view.render());
    Ok(())
}
