//! CSV import and export.

use std::path::Path;

use anyhow::{Context, Result};
use isocal_core::EventStore;
use owo_colors::OwoColorize;

pub fn import(store: &EventStore, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;

    let result = store.import_csv(&content)?;

    println!(
        "{} {}",
        format!("  {} created", result.success).green(),
        format!("{} updated", result.updated).yellow()
    );

    if !result.errors.is_empty() {
        println!("{}", format!("  {} rows skipped:", result.errors.len()).red());
        for error in &result.errors {
            println!("    {}", error.dimmed());
        }
    }

    Ok(())
}

pub fn export(store: &EventStore, file: Option<&Path>) -> Result<()> {
    let csv = store.export_csv()?;

    match file {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("Could not write {}", path.display()))?;
            eprintln!("{}", format!("  Exported to {}", path.display()).green());
        }
        None => print!("{}", csv),
    }

    Ok(())
}
