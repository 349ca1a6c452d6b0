mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use isocal_core::config::Settings;
use isocal_core::{IsoDate, NormalDate, RecurrencePattern};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "isocal")]
#[command(about = "Record events on ISO week dates or month/day dates and see when they recur")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every stored event
    List,
    /// Show one event in detail
    Show {
        /// Event id, or a unique prefix of it
        id: String,
    },
    /// Add an event
    Add {
        title: String,

        /// ISO week date, e.g. 2025-W10-2 (day 0 is Monday)
        #[arg(long, conflicts_with = "date", required_unless_present = "date")]
        iso: Option<IsoDate>,

        /// Month/day date, e.g. 2025-03-05
        #[arg(long)]
        date: Option<NormalDate>,

        #[arg(short, long, default_value = "None")]
        recurrence: RecurrencePattern,

        #[arg(long, default_value_t = 0.0)]
        cost: f64,

        #[arg(long)]
        color: Option<String>,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete one event
    Delete {
        /// Event id, or a unique prefix of it
        id: String,
    },
    /// Delete every event
    Clear,
    /// Import events from a CSV file
    Import { file: PathBuf },
    /// Export events as CSV to a file, or stdout when omitted
    Export { file: Option<PathBuf> },
    /// Show an ISO month (4/4/5 weeks) of a year
    Iso { year: i32, month: u32 },
    /// Show a Gregorian month
    Month { year: i32, month: u32 },
    /// List events occurring on a day (YYYY-MM-DD)
    Day { date: NaiveDate },
    /// Find the next day an event occurs on
    Next {
        /// Event id, or a unique prefix of it
        id: String,

        /// Search from this day instead of today (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
    },
    /// List the next occurrence of every event
    Upcoming {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Search from this day instead of today (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load()?;

    // Logs go to stderr so exported CSV on stdout stays clean
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = settings.open_store();
    tracing::debug!(backend = ?settings.storage.backend, path = %settings.storage.resolved_path().display(), "Opened event store");

    match cli.command {
        Commands::List => commands::events::list(&store),
        Commands::Show { id } => commands::events::show(&store, &id),
        Commands::Add {
            title,
            iso,
            date,
            recurrence,
            cost,
            color,
            description,
        } => {
            let when = commands::add::When::from_args(iso, date)?;
            let draft = commands::add::Draft {
                title,
                when,
                recurrence,
                cost,
                color,
                description,
            };
            commands::add::run(&store, draft)
        }
        Commands::Delete { id } => commands::events::delete(&store, &id),
        Commands::Clear => commands::events::clear(&store),
        Commands::Import { file } => commands::transfer::import(&store, &file),
        Commands::Export { file } => commands::transfer::export(&store, file.as_deref()),
        Commands::Iso { year, month } => commands::calendar::iso(&store, year, month),
        Commands::Month { year, month } => commands::calendar::month(&store, year, month),
        Commands::Day { date } => commands::events::day(&store, date),
        Commands::Next { id, from } => commands::events::next(&store, &id, from),
        Commands::Upcoming { limit, from } => commands::events::upcoming(&store, limit, from),
    }
}
