//! Data types produced and consumed by the week scorer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Weights applied to each normalized criterion in a resort's composite score.
///
/// They need not sum to 1; the reference configuration does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub rating: f64,
    pub difficulty_inv: f64,
    pub price_inv: f64,
    pub lifts: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            rating: 0.35,
            difficulty_inv: 0.25,
            price_inv: 0.25,
            lifts: 0.15,
        }
    }
}

impl ScoringWeights {
    pub fn new(rating: f64, difficulty_inv: f64, price_inv: f64, lifts: f64) -> Self {
        ScoringWeights {
            rating,
            difficulty_inv,
            price_inv,
            lifts,
        }
    }

    /// Upper bound of any composite or mean week score.
    pub fn total(&self) -> f64 {
        self.rating + self.difficulty_inv + self.price_inv + self.lifts
    }

    /// Rejects negative or non-finite weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("rating", self.rating),
            ("difficulty_inv", self.difficulty_inv),
            ("price_inv", self.price_inv),
            ("lifts", self.lifts),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Score for one calendar week of the analysis window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekScore {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub open_resorts: usize,
    pub mean_week_score: f64,
    pub top_resort: Option<String>,
}

/// Composite score of a single open resort within a week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResortScore {
    pub resort: String,
    /// Normalized criteria in the order rating, difficulty (inverted),
    /// ticket price (inverted), lifts.
    pub criteria: [f64; 4],
    pub composite: f64,
}

/// Full output of a scoring run.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonReport {
    pub weights: ScoringWeights,
    pub weeks: Vec<WeekScore>,
    pub best_week: Option<WeekScore>,
    /// Resorts left out of scoring because no ticket price is offered.
    pub excluded: Vec<String>,
}
