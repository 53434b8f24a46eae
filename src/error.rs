//! Structured error types for resort loading, season parsing and configuration.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a season description such as `"early june - late sep"` into dates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeasonParseError {
    /// The text is not of the form `<start> - <end>`.
    #[error("malformed season text {text:?}: expected \"<qualifier> <month> - <qualifier> <month>\"")]
    Malformed { text: String },

    /// One side of the range lacks a qualifier or month token.
    #[error("season part {part:?} needs a qualifier and a month")]
    MissingToken { part: String },

    /// The month token does not start with jun, jul, aug, sep or oct.
    #[error("unknown month {token:?} (expected jun, jul, aug, sep or oct)")]
    UnknownMonth { token: String },

    /// The computed dates run backwards.
    #[error("season ends on {end} before it starts on {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    /// The season year cannot hold the computed date.
    #[error("no calendar date for {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// Failure to build a [`crate::resort::Resort`] from a raw record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResortError {
    #[error("resort {resort:?}: {source}")]
    Season {
        resort: String,
        #[source]
        source: SeasonParseError,
    },

    #[error("resort {resort:?}: {field} = {value} is outside {min}..={max}")]
    OutOfRange {
        resort: String,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("resort {resort:?}: {field} = {value} must be a finite, non-negative price")]
    NegativePrice {
        resort: String,
        field: &'static str,
        value: f64,
    },

    #[error("resort name {0:?} appears more than once")]
    DuplicateName(String),

    #[error("resort name must not be empty")]
    EmptyName,
}

/// Failure to load or validate a [`crate::config::ScoringConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("weight {name} = {value} must be a finite, non-negative number")]
    InvalidWeight { name: &'static str, value: f64 },
}

/// Failure to interpret a row of the climate table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClimateError {
    #[error("row {row} (station {station}): no calendar date {year}-{month}-{day}")]
    InvalidDate {
        row: usize,
        station: u32,
        year: i32,
        month: u32,
        day: u32,
    },
}
