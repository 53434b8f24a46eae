//! Output formatting and persistence for result tables.
//!
//! Supports pretty-printing, JSON logging, and CSV export.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::scoring::SeasonReport;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
///
/// A header row is derived from the field names of `T`.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Logs the week table and the recommended week.
pub fn log_report(report: &SeasonReport) {
    for week in &report.weeks {
        info!(
            week_start = %week.week_start,
            week_end = %week.week_end,
            open_resorts = week.open_resorts,
            mean_week_score = %format!("{:.3}", week.mean_week_score),
            top_resort = week.top_resort.as_deref().unwrap_or("-"),
            "Week"
        );
    }

    if !report.excluded.is_empty() {
        info!(excluded = ?report.excluded, "Resorts left out of scoring");
    }

    match &report.best_week {
        Some(best) => info!(
            week_start = %best.week_start,
            week_end = %best.week_end,
            open_resorts = best.open_resorts,
            mean_week_score = %format!("{:.3}", best.mean_week_score),
            top_resort = best.top_resort.as_deref().unwrap_or("-"),
            "Suggested best week"
        ),
        None => info!("No suggested best week: no resort is open in the window"),
    }
}
