//! Weekly resort visitation: summaries, yearly totals, outliers and correlation.
//!
//! The table has a `Year` and `Week` column followed by one visitor-count
//! column per resort. Empty cells are treated as missing.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::debug;

use crate::stats::{Summary, pearson, z_scores};

/// One week of visitor counts.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitationRow {
    pub year: i32,
    pub week: u32,
    /// Visitors per resort, aligned with [`VisitationTable::resorts`].
    pub visitors: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitationTable {
    pub resorts: Vec<String>,
    pub rows: Vec<VisitationRow>,
}

/// Describe-style summary of one resort column, flat for CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResortSummary {
    pub resort: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl ResortSummary {
    pub fn new(resort: &str, s: Summary) -> Self {
        ResortSummary {
            resort: resort.to_string(),
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

/// A year whose total visitation stands out for a resort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyOutlier {
    pub resort: String,
    pub year: i32,
    pub visitors: f64,
    pub z_score: f64,
}

/// Pairwise Pearson correlations between resorts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub resorts: Vec<String>,
    /// `values[i][j]` correlates `resorts[i]` with `resorts[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.resorts.iter().position(|r| r == a)?;
        let j = self.resorts.iter().position(|r| r == b)?;
        self.values[i][j]
    }
}

impl VisitationTable {
    /// Reads a visitation table from CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the header lacks `Year`/`Week` columns or a cell is
    /// neither empty nor a number.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();

        if headers.len() < 3 || !headers[0].eq_ignore_ascii_case("year") || !headers[1].eq_ignore_ascii_case("week") {
            bail!("visitation header must start with Year,Week followed by resort columns");
        }

        let resorts: Vec<String> = headers.iter().skip(2).map(str::to_string).collect();
        let mut rows = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            let record = result?;
            let line = i + 2;

            let year = record[0]
                .parse::<i32>()
                .with_context(|| format!("line {line}: invalid Year {:?}", &record[0]))?;
            let week = record[1]
                .parse::<u32>()
                .with_context(|| format!("line {line}: invalid Week {:?}", &record[1]))?;

            let mut visitors = Vec::with_capacity(resorts.len());
            for (resort, cell) in resorts.iter().zip(record.iter().skip(2)) {
                visitors.push(parse_cell(cell).with_context(|| format!("line {line}, column {resort}"))?);
            }
            visitors.resize(resorts.len(), None);

            rows.push(VisitationRow { year, week, visitors });
        }

        debug!(resorts = resorts.len(), rows = rows.len(), "Visitation table read");
        Ok(VisitationTable { resorts, rows })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open visitation table {}", path.display()))?;
        Self::from_reader(file)
    }

    /// All values of one resort column, in row order.
    pub fn column(&self, index: usize) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.visitors[index]).collect()
    }

    /// Summary statistics for every resort column.
    pub fn describe(&self) -> Vec<ResortSummary> {
        self.resorts
            .iter()
            .enumerate()
            .map(|(i, resort)| ResortSummary::new(resort, Summary::describe(self.column(i))))
            .collect()
    }

    /// Visitors per year per resort; missing weeks count as zero.
    ///
    /// Keys are years in ascending order, values align with `resorts`.
    pub fn yearly_totals(&self) -> BTreeMap<i32, Vec<f64>> {
        let mut totals: BTreeMap<i32, Vec<f64>> = BTreeMap::new();

        for row in &self.rows {
            let entry = totals
                .entry(row.year)
                .or_insert_with(|| vec![0.0; self.resorts.len()]);
            for (total, value) in entry.iter_mut().zip(&row.visitors) {
                *total += value.unwrap_or(0.0);
            }
        }

        totals
    }

    /// Total visitors across all resorts for each year.
    pub fn grand_totals(&self) -> BTreeMap<i32, f64> {
        self.yearly_totals()
            .into_iter()
            .map(|(year, totals)| (year, totals.iter().sum()))
            .collect()
    }

    /// Years whose total visitation lies more than `threshold` sample standard
    /// deviations from the resort's mean yearly total.
    pub fn yearly_outliers(&self, threshold: f64) -> Vec<YearlyOutlier> {
        let yearly = self.yearly_totals();
        let years: Vec<i32> = yearly.keys().copied().collect();
        let mut outliers = Vec::new();

        for (i, resort) in self.resorts.iter().enumerate() {
            let series: Vec<f64> = yearly.values().map(|totals| totals[i]).collect();
            let Some(z) = z_scores(&series) else {
                continue;
            };

            for ((year, visitors), z_score) in years.iter().zip(&series).zip(z) {
                if z_score.abs() > threshold {
                    outliers.push(YearlyOutlier {
                        resort: resort.clone(),
                        year: *year,
                        visitors: *visitors,
                        z_score,
                    });
                }
            }
        }

        outliers
    }

    /// Pearson correlation of weekly visitation between every pair of resorts.
    pub fn correlation_matrix(&self) -> CorrelationMatrix {
        let columns: Vec<Vec<Option<f64>>> = (0..self.resorts.len()).map(|i| self.column(i)).collect();

        let values = columns
            .iter()
            .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
            .collect();

        CorrelationMatrix {
            resorts: self.resorts.clone(),
            values,
        }
    }
}

/// Empty, `NaN` and infinite cells are missing.
fn parse_cell(cell: &str) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    let value: f64 = cell.parse().with_context(|| format!("invalid number {cell:?}"))?;
    Ok(Some(value).filter(|v| v.is_finite()))
}
