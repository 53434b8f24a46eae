//! Daily climate observations from weather stations near the resorts.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClimateError;
use crate::stats::Summary;

/// One row of the climate sheet as exported to CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct ClimateRecord {
    #[serde(rename = "Bureau of Meteorology station number", alias = "station")]
    pub station: u32,
    #[serde(rename = "Year", alias = "year")]
    pub year: i32,
    #[serde(rename = "Month", alias = "month")]
    pub month: u32,
    #[serde(rename = "Day", alias = "day")]
    pub day: u32,
    #[serde(rename = "Maximum temperature (Degree C)", alias = "max_temp")]
    pub max_temp: Option<f64>,
    #[serde(rename = "Minimum temperature (Degree C)", alias = "min_temp")]
    pub min_temp: Option<f64>,
    #[serde(rename = "Rainfall amount (millimetres)", alias = "rainfall")]
    pub rainfall: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Season label for a calendar month, as used by the climate summaries:
    /// Dec–Feb winter, Mar–May spring, Jun–Aug summer, otherwise autumn.
    pub fn for_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }
}

/// A climate observation with its calendar date resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub station: u32,
    pub date: NaiveDate,
    pub season: Season,
    pub iso_week: u32,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub rainfall: Option<f64>,
}

impl Observation {
    pub fn from_record(row: usize, r: &ClimateRecord) -> Result<Self, ClimateError> {
        let date = NaiveDate::from_ymd_opt(r.year, r.month, r.day).ok_or(ClimateError::InvalidDate {
            row,
            station: r.station,
            year: r.year,
            month: r.month,
            day: r.day,
        })?;

        Ok(Observation {
            station: r.station,
            date,
            season: Season::for_month(date.month()),
            iso_week: date.iso_week().week(),
            max_temp: finite(r.max_temp),
            min_temp: finite(r.min_temp),
            rainfall: finite(r.rainfall),
        })
    }
}

/// `NaN` and infinite readings count as missing.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Climate variables that can be summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    MaxTemp,
    MinTemp,
    Rainfall,
}

impl Variable {
    pub const ALL: [Variable; 3] = [Variable::MaxTemp, Variable::MinTemp, Variable::Rainfall];

    pub fn label(&self) -> &'static str {
        match self {
            Variable::MaxTemp => "Max Temp (°C)",
            Variable::MinTemp => "Min Temp (°C)",
            Variable::Rainfall => "Rainfall (mm)",
        }
    }

    fn value(&self, o: &Observation) -> Option<f64> {
        match self {
            Variable::MaxTemp => o.max_temp,
            Variable::MinTemp => o.min_temp,
            Variable::Rainfall => o.rainfall,
        }
    }
}

/// Summary of one variable, optionally restricted to a station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSummary {
    pub station: Option<u32>,
    pub variable: &'static str,
    pub missing: usize,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl VariableSummary {
    fn new(station: Option<u32>, variable: Variable, observations: &[&Observation]) -> Self {
        let values: Vec<Option<f64>> = observations.iter().map(|o| variable.value(o)).collect();
        let missing = values.iter().filter(|v| v.is_none()).count();
        let s = Summary::describe(values);

        VariableSummary {
            station,
            variable: variable.label(),
            missing,
            count: s.count,
            mean: s.mean,
            std: s.std,
            min: s.min,
            q1: s.q1,
            median: s.median,
            q3: s.q3,
            max: s.max,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClimateTable {
    pub observations: Vec<Observation>,
}

impl ClimateTable {
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut observations = Vec::new();

        for (i, result) in rdr.deserialize().enumerate() {
            let record: ClimateRecord = result?;
            observations.push(Observation::from_record(i + 2, &record)?);
        }

        debug!(rows = observations.len(), "Climate table read");
        Ok(ClimateTable { observations })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open climate table {}", path.display()))?;
        Self::from_reader(file)
    }

    /// Missing-value count per variable.
    pub fn missing_counts(&self) -> Vec<(&'static str, usize)> {
        Variable::ALL
            .iter()
            .map(|v| {
                let missing = self.observations.iter().filter(|o| v.value(o).is_none()).count();
                (v.label(), missing)
            })
            .collect()
    }

    /// Summary of every variable across all stations.
    pub fn summarize(&self) -> Vec<VariableSummary> {
        let all: Vec<&Observation> = self.observations.iter().collect();
        Variable::ALL
            .iter()
            .map(|v| VariableSummary::new(None, *v, &all))
            .collect()
    }

    /// Summary of every variable per station, stations in ascending order.
    pub fn summarize_by_station(&self) -> Vec<VariableSummary> {
        let mut by_station: BTreeMap<u32, Vec<&Observation>> = BTreeMap::new();
        for o in &self.observations {
            by_station.entry(o.station).or_default().push(o);
        }

        by_station
            .iter()
            .flat_map(|(station, obs)| {
                Variable::ALL
                    .iter()
                    .map(move |v| VariableSummary::new(Some(*station), *v, obs))
            })
            .collect()
    }
}
