//! Terminal rendering for isocal types.
//!
//! Extension traits that add colored output to isocal-core types using owo_colors.

use chrono::{Datelike, NaiveDate};
use isocal_core::grid::{DayCell, IsoMonthView, NormalMonthView};
use isocal_core::{Event, RecurrencePattern};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

/// First 8 hex digits; enough to pick an event on the command line.
pub fn short_id(event: &Event) -> String {
    event.id().to_string().chars().take(8).collect()
}

impl Render for RecurrencePattern {
    fn render(&self) -> String {
        match self {
            RecurrencePattern::None => self.label().dimmed().to_string(),
            _ => self.label().magenta().to_string(),
        }
    }
}

/// One line: `id  title  date  recurrence  cost`
impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {} {}",
            short_id(self).dimmed(),
            self.title().bold(),
            self.date().to_string().cyan(),
            self.recurrence().render()
        );

        if self.financial_cost() > 0.0 {
            line.push_str(&format!(" {}", format!("{:.2}", self.financial_cost()).yellow()));
        }

        line
    }
}

/// Multi-line detail view used by `isocal show`.
pub fn render_details(event: &Event) -> String {
    let mut lines = vec![
        event.title().bold().to_string(),
        format!("  {:<12}{}", "id", event.id()),
        format!("  {:<12}{} ({})", "date", event.date().to_string().cyan(), event.date().kind()),
        format!("  {:<12}{}", "repeats", event.recurrence().render()),
        format!("  {:<12}{:.2}", "cost", event.financial_cost()),
        format!("  {:<12}{}", "color", event.color()),
    ];

    if !event.description().is_empty() {
        lines.push(format!("  {:<12}{}", "description", event.description()));
    }

    lines.join("\n")
}

const WEEKDAYS_MONDAY_FIRST: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const WEEKDAYS_SUNDAY_FIRST: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A 4-character grid cell: the day of month, `*` when something happens.
fn render_cell(cell: &DayCell) -> String {
    let marker = if cell.events.is_empty() { ' ' } else { '*' };
    let text = format!("{:>3}{}", cell.date.day(), marker);

    if cell.is_today {
        text.reversed().to_string()
    } else if !cell.events.is_empty() {
        text.green().to_string()
    } else {
        text
    }
}

/// Events below a grid, one line per (day, event).
fn render_agenda<'a>(cells: impl Iterator<Item = &'a DayCell>) -> Vec<String> {
    cells
        .flat_map(|cell| {
            cell.events.iter().map(move |event| {
                format!(
                    "  {} {} {}",
                    cell.iso_date.to_string().cyan(),
                    format_day(cell.date).dimmed(),
                    event.title()
                )
            })
        })
        .collect()
}

fn format_day(date: NaiveDate) -> String {
    date.format("%a %b %-d").to_string()
}

impl Render for IsoMonthView {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("ISO {} month {}", self.year, self.month).bold().to_string(),
            format!("     {}", WEEKDAYS_MONDAY_FIRST.map(|d| format!("{:>4}", d)).concat())
                .dimmed()
                .to_string(),
        ];

        for week in &self.weeks {
            let label = format!("W{:02}  ", week.iso_week);
            let label = if week.is_current_week {
                label.green().bold().to_string()
            } else {
                label.dimmed().to_string()
            };

            let days: String = week.days.iter().map(render_cell).collect();
            lines.push(format!("{}{}", label, days));
        }

        let agenda = render_agenda(self.weeks.iter().flat_map(|w| w.days.iter()));
        if !agenda.is_empty() {
            lines.push(String::new());
            lines.extend(agenda);
        }

        lines.join("\n")
    }
}

impl Render for NormalMonthView {
    fn render(&self) -> String {
        let title = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|first| first.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{}-{:02}", self.year, self.month));

        let mut lines = vec![
            title.bold().to_string(),
            WEEKDAYS_SUNDAY_FIRST
                .map(|d| format!("{:>4}", d))
                .concat()
                .dimmed()
                .to_string(),
        ];

        for row in &self.weeks {
            let days: String = row
                .iter()
                .map(|cell| match cell {
                    Some(cell) => render_cell(cell),
                    None => "    ".to_string(),
                })
                .collect();
            lines.push(days);
        }

        let agenda = render_agenda(self.weeks.iter().flatten().flatten());
        if !agenda.is_empty() {
            lines.push(String::new());
            lines.extend(agenda);
        }

        lines.join("\n")
    }
}
