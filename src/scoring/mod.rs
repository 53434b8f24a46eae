//! Season week scoring.
//!
//! Splits the analysis window into 7-day weeks, min–max normalizes resort
//! attributes across the resorts open in each week, combines them with
//! configurable weights and picks the best week to visit.

pub mod aggregate;
pub mod normalize;
pub mod types;
pub mod weeks;

pub use aggregate::{best_week, score_season, score_week};
pub use types::{ResortScore, ScoringWeights, SeasonReport, WeekScore};
pub use weeks::{SeasonWindow, Week, Weeks};
