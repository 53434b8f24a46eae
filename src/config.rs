use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::scoring::{ScoringWeights, SeasonWindow};

/// Environment variable naming a default config file.
pub const CONFIG_ENV: &str = "SKI_RATER_CONFIG";

/// Settings for a scoring run.
///
/// Stored as JSON on disk; every field is optional:
/// ```json
/// {
///   "season_year": 2025,
///   "window_start": "2025-06-01",
///   "window_end": "2025-10-15",
///   "weights": { "rating": 0.35, "difficulty_inv": 0.25, "price_inv": 0.25, "lifts": 0.15 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Year used when turning season text into dates.
    pub season_year: i32,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub weights: ScoringWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            season_year: 2025,
            window_start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
            window_end: NaiveDate::from_ymd_opt(2025, 10, 15).unwrap_or_default(),
            weights: ScoringWeights::default(),
        }
    }
}

impl ScoringConfig {
    /// Parses and validates a config from JSON text.
    pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ScoringConfig = serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.weights.validate()?;
        Ok(config)
    }

    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content, path)?;
        debug!(path = %path.display(), ?config, "Scoring config loaded");
        Ok(config)
    }

    /// Loads from `path`, else from the file named by [`CONFIG_ENV`], else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);

        match path.map(Path::to_path_buf).or(from_env) {
            Some(p) => Self::load(&p),
            None => Ok(Self::default()),
        }
    }

    pub fn window(&self) -> SeasonWindow {
        SeasonWindow::new(self.window_start, self.window_end)
    }
}
