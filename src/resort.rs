//! Resort attributes, ticket prices and loading from tabular sources.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ResortError;
use crate::parser::parse_season;

/// One row of the resort table as it appears in a spreadsheet export.
///
/// Prices use `0` for "not offered".
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResortRecord {
    pub resort: String,
    pub rating_5: f64,
    pub difficulty_3: f64,
    pub lifts: u32,
    pub adult_price: f64,
    pub youth_price: f64,
    pub child_price: f64,
    #[serde(default)]
    pub accom_level: String,
    #[serde(default)]
    pub access: String,
    #[serde(default)]
    pub elevation: String,
    pub season_text: String,
}

/// Lift ticket prices; `None` means the ticket class is not offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TicketPrices {
    pub adult: Option<f64>,
    pub youth: Option<f64>,
    pub child: Option<f64>,
}

impl TicketPrices {
    /// Builds prices from raw spreadsheet values, where zero marks "not offered".
    pub fn from_raw(adult: f64, youth: f64, child: f64) -> Self {
        fn offered(p: f64) -> Option<f64> {
            (p > 0.0).then_some(p)
        }

        TicketPrices {
            adult: offered(adult),
            youth: offered(youth),
            child: offered(child),
        }
    }

    /// Blended ticket price: mean of the offered prices, `None` if none are offered.
    pub fn blended(&self) -> Option<f64> {
        let offered: Vec<f64> = [self.adult, self.youth, self.child]
            .into_iter()
            .flatten()
            .collect();

        if offered.is_empty() {
            None
        } else {
            Some(offered.iter().sum::<f64>() / offered.len() as f64)
        }
    }
}

/// A ski resort with parsed season dates. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resort {
    pub name: String,
    pub rating: f64,
    pub difficulty: f64,
    pub lift_count: u32,
    pub prices: TicketPrices,
    pub season_start: NaiveDate,
    pub season_end: NaiveDate,
    pub accommodation: String,
    pub access: String,
    pub elevation: String,
}

impl Resort {
    /// Validates a raw record and parses its season text for `year`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the resort when an attribute is out of range or
    /// its season text cannot be parsed.
    pub fn from_record(record: &ResortRecord, year: i32) -> Result<Self, ResortError> {
        let name = record.resort.trim();
        if name.is_empty() {
            return Err(ResortError::EmptyName);
        }

        check_range(name, "rating_5", record.rating_5, 0.0, 5.0)?;
        check_range(name, "difficulty_3", record.difficulty_3, 0.0, 3.0)?;
        check_price(name, "adult_price", record.adult_price)?;
        check_price(name, "youth_price", record.youth_price)?;
        check_price(name, "child_price", record.child_price)?;

        let (season_start, season_end) =
            parse_season(&record.season_text, year).map_err(|source| ResortError::Season {
                resort: name.to_string(),
                source,
            })?;

        Ok(Resort {
            name: name.to_string(),
            rating: record.rating_5,
            difficulty: record.difficulty_3,
            lift_count: record.lifts,
            prices: TicketPrices::from_raw(
                record.adult_price,
                record.youth_price,
                record.child_price,
            ),
            season_start,
            season_end,
            accommodation: record.accom_level.trim().to_string(),
            access: record.access.trim().to_string(),
            elevation: record.elevation.trim().to_string(),
        })
    }

    pub fn ticket_price(&self) -> Option<f64> {
        self.prices.blended()
    }

    /// Whether the season overlaps `[from, to]`, both ends inclusive.
    pub fn is_open_between(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.season_start <= to && self.season_end >= from
    }
}

fn check_price(resort: &str, field: &'static str, value: f64) -> Result<(), ResortError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ResortError::NegativePrice {
            resort: resort.to_string(),
            field,
            value,
        })
    }
}

fn check_range(resort: &str, field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ResortError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ResortError::OutOfRange {
            resort: resort.to_string(),
            field,
            value,
            min,
            max,
        })
    }
}

/// Builds resorts from records, rejecting duplicate names.
pub fn build_resorts(records: &[ResortRecord], year: i32) -> Result<Vec<Resort>, ResortError> {
    let mut seen = HashSet::new();
    let mut resorts = Vec::with_capacity(records.len());

    for record in records {
        let resort = Resort::from_record(record, year)?;
        if !seen.insert(resort.name.clone()) {
            return Err(ResortError::DuplicateName(resort.name));
        }
        resorts.push(resort);
    }

    Ok(resorts)
}

/// Reads resort records from any CSV source with a header row.
pub fn read_records<R: std::io::Read>(reader: R) -> Result<Vec<ResortRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let record: ResortRecord = result?;
        records.push(record);
    }

    Ok(records)
}

/// Loads and validates the resort table from a CSV file.
pub fn load_resorts(path: &Path, year: i32) -> Result<Vec<Resort>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open resort table {}", path.display()))?;
    let records = read_records(file)
        .with_context(|| format!("failed to read resort table {}", path.display()))?;
    debug!(path = %path.display(), rows = records.len(), "Resort records read");

    Ok(build_resorts(&records, year)?)
}

/// A resort row augmented with derived fields, ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct ResortRow {
    pub resort: String,
    pub rating_5: f64,
    pub difficulty_3: f64,
    pub lifts: u32,
    pub adult_price: Option<f64>,
    pub youth_price: Option<f64>,
    pub child_price: Option<f64>,
    pub ticket_price: Option<f64>,
    pub season_start: NaiveDate,
    pub season_end: NaiveDate,
    pub accom_level: String,
    pub access: String,
    pub elevation: String,
}

impl From<&Resort> for ResortRow {
    fn from(r: &Resort) -> Self {
        ResortRow {
            resort: r.name.clone(),
            rating_5: r.rating,
            difficulty_3: r.difficulty,
            lifts: r.lift_count,
            adult_price: r.prices.adult,
            youth_price: r.prices.youth,
            child_price: r.prices.child,
            ticket_price: r.ticket_price(),
            season_start: r.season_start,
            season_end: r.season_end,
            accom_level: r.accommodation.clone(),
            access: r.access.clone(),
            elevation: r.elevation.clone(),
        }
    }
}
