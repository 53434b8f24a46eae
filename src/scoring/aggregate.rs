use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::resort::Resort;
use crate::scoring::normalize::min_max;
use crate::scoring::types::{ResortScore, ScoringWeights, SeasonReport, WeekScore};
use crate::scoring::weeks::{SeasonWindow, Week};

/// A resort admitted to scoring, with its blended ticket price resolved.
#[derive(Debug, Clone, Copy)]
pub struct Scorable<'a> {
    pub resort: &'a Resort,
    pub ticket_price: f64,
}

/// Splits resorts into those that can be scored and the names of those that cannot.
///
/// A resort without any offered ticket price has no value for the price
/// criterion and is left out of every week.
pub fn scorable_resorts(resorts: &[Resort]) -> (Vec<Scorable<'_>>, Vec<String>) {
    let mut scorable = Vec::with_capacity(resorts.len());
    let mut excluded = Vec::new();

    for resort in resorts {
        match resort.ticket_price() {
            Some(ticket_price) => scorable.push(Scorable {
                resort,
                ticket_price,
            }),
            None => {
                warn!(resort = %resort.name, "No ticket price offered, excluding from scoring");
                excluded.push(resort.name.clone());
            }
        }
    }

    (scorable, excluded)
}

/// Normalizes every criterion across `open` and combines them with `weights`.
///
/// Scores are returned in the same order as `open`.
pub fn composite_scores(open: &[Scorable<'_>], weights: &ScoringWeights) -> Vec<ResortScore> {
    let rating = min_max(&column(open, |s| s.resort.rating), false);
    let difficulty = min_max(&column(open, |s| s.resort.difficulty), true);
    let price = min_max(&column(open, |s| s.ticket_price), true);
    let lifts = min_max(&column(open, |s| f64::from(s.resort.lift_count)), false);

    open.iter()
        .enumerate()
        .map(|(i, s)| {
            let criteria = [rating[i], difficulty[i], price[i], lifts[i]];
            let composite = weights.rating * criteria[0]
                + weights.difficulty_inv * criteria[1]
                + weights.price_inv * criteria[2]
                + weights.lifts * criteria[3];

            ResortScore {
                resort: s.resort.name.clone(),
                criteria,
                composite,
            }
        })
        .collect()
}

fn column(open: &[Scorable<'_>], value: impl Fn(&Scorable<'_>) -> f64) -> Vec<f64> {
    open.iter().map(value).collect()
}

/// First resort with the strictly highest composite; earlier entries win ties.
pub fn top_resort(scores: &[ResortScore]) -> Option<&ResortScore> {
    scores.iter().fold(None, |best, s| match best {
        Some(b) if s.composite <= b.composite => Some(b),
        _ => Some(s),
    })
}

/// Scores one week against the resorts eligible for scoring.
///
/// A week with no open resort scores exactly `0.0` and has no top resort.
pub fn score_week(week: Week, resorts: &[Scorable<'_>], weights: &ScoringWeights) -> WeekScore {
    let open: Vec<Scorable<'_>> = resorts
        .iter()
        .filter(|s| s.resort.is_open_between(week.start, week.end))
        .copied()
        .collect();

    if open.is_empty() {
        return WeekScore {
            week_start: week.start,
            week_end: week.end,
            open_resorts: 0,
            mean_week_score: 0.0,
            top_resort: None,
        };
    }

    let scores = composite_scores(&open, weights);
    let mean_week_score = scores.iter().map(|s| s.composite).sum::<f64>() / scores.len() as f64;

    WeekScore {
        week_start: week.start,
        week_end: week.end,
        open_resorts: open.len(),
        mean_week_score,
        top_resort: top_resort(&scores).map(|s| s.resort.clone()),
    }
}

/// Ordering used to pick the best week: most open resorts, then highest mean
/// score, then earliest start.
pub fn best_week_order(a: &WeekScore, b: &WeekScore) -> Ordering {
    b.open_resorts
        .cmp(&a.open_resorts)
        .then_with(|| b.mean_week_score.total_cmp(&a.mean_week_score))
        .then_with(|| a.week_start.cmp(&b.week_start))
}

/// Picks the best week, or `None` when no week has an open resort.
pub fn best_week(weeks: &[WeekScore]) -> Option<&WeekScore> {
    weeks
        .iter()
        .filter(|w| w.open_resorts > 0)
        .min_by(|a, b| best_week_order(a, b))
}

/// Scores every week of `window` and selects the best one.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidWeight`] when any weight is negative or not finite.
#[tracing::instrument(skip(resorts, weights), fields(resorts = resorts.len(), start = %window.start, end = %window.end))]
pub fn score_season(
    resorts: &[Resort],
    window: SeasonWindow,
    weights: &ScoringWeights,
) -> Result<SeasonReport, ConfigError> {
    weights.validate()?;
    let (scorable, excluded) = scorable_resorts(resorts);

    let weeks: Vec<WeekScore> = window
        .weeks()
        .map(|week| score_week(week, &scorable, weights))
        .collect();

    debug!(weeks = weeks.len(), scored = scorable.len(), "Weeks scored");

    let best_week = best_week(&weeks).cloned();
    match &best_week {
        Some(w) => info!(
            week_start = %w.week_start,
            open_resorts = w.open_resorts,
            mean_week_score = w.mean_week_score,
            "Best week selected"
        ),
        None => warn!("No week has an open resort, no best week"),
    }

    Ok(SeasonReport {
        weights: *weights,
        weeks,
        best_week,
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resort::TicketPrices;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn resort(name: &str, rating: f64, difficulty: f64, lifts: u32, price: f64) -> Resort {
        Resort {
            name: name.to_string(),
            rating,
            difficulty,
            lift_count: lifts,
            prices: TicketPrices::from_raw(price, 0.0, 0.0),
            season_start: date(6, 1),
            season_end: date(9, 30),
            accommodation: String::new(),
            access: String::new(),
            elevation: String::new(),
        }
    }

    fn week_of(start: NaiveDate) -> Week {
        Week::starting(start).unwrap()
    }

    fn week_score(start: NaiveDate, open: usize, score: f64) -> WeekScore {
        WeekScore {
            week_start: start,
            week_end: start + chrono::Duration::days(6),
            open_resorts: open,
            mean_week_score: score,
            top_resort: None,
        }
    }

    #[test]
    fn test_dominant_resort_scores_one() {
        let resorts = vec![resort("A", 4.0, 1.0, 10, 100.0), resort("B", 2.0, 2.0, 5, 200.0)];
        let (scorable, _) = scorable_resorts(&resorts);
        let scores = composite_scores(&scorable, &ScoringWeights::default());

        assert_eq!(scores[0].criteria, [1.0, 1.0, 1.0, 1.0]);
        assert!((scores[0].composite - 1.0).abs() < 1e-12);
        assert_eq!(scores[1].criteria, [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(scores[1].composite, 0.0);

        let week = score_week(week_of(date(7, 1)), &scorable, &ScoringWeights::default());
        assert_eq!(week.open_resorts, 2);
        assert!((week.mean_week_score - 0.5).abs() < 1e-12);
        assert_eq!(week.top_resort.as_deref(), Some("A"));
    }

    #[test]
    fn test_single_open_resort_scores_weight_total() {
        let resorts = vec![resort("A", 3.0, 1.5, 10, 150.0)];
        let (scorable, _) = scorable_resorts(&resorts);
        let weights = ScoringWeights::new(0.4, 0.3, 0.2, 0.3);
        let week = score_week(week_of(date(7, 1)), &scorable, &weights);

        assert_eq!(week.open_resorts, 1);
        assert!((week.mean_week_score - weights.total()).abs() < 1e-12);
        assert_eq!(week.top_resort.as_deref(), Some("A"));
    }

    #[test]
    fn test_closed_week_scores_zero() {
        let resorts = vec![resort("A", 3.0, 1.5, 10, 150.0)];
        let (scorable, _) = scorable_resorts(&resorts);
        let week = score_week(week_of(date(11, 1)), &scorable, &ScoringWeights::default());

        assert_eq!(week.open_resorts, 0);
        assert_eq!(week.mean_week_score, 0.0);
        assert_eq!(week.top_resort, None);
    }

    #[test]
    fn test_season_end_on_week_start_counts_as_open() {
        let mut r = resort("A", 3.0, 1.5, 10, 150.0);
        r.season_end = date(7, 6);
        let resorts = vec![r];
        let (scorable, _) = scorable_resorts(&resorts);

        let week = score_week(week_of(date(7, 6)), &scorable, &ScoringWeights::default());
        assert_eq!(week.open_resorts, 1);

        let week = score_week(week_of(date(7, 7)), &scorable, &ScoringWeights::default());
        assert_eq!(week.open_resorts, 0);
    }

    #[test]
    fn test_season_start_on_week_end_counts_as_open() {
        let mut r = resort("A", 3.0, 1.5, 10, 150.0);
        r.season_start = date(7, 12);
        let resorts = vec![r];
        let (scorable, _) = scorable_resorts(&resorts);

        let week = score_week(week_of(date(7, 6)), &scorable, &ScoringWeights::default());
        assert_eq!(week.open_resorts, 1);
    }

    #[test]
    fn test_top_resort_tie_goes_to_first() {
        let resorts = vec![resort("First", 3.0, 1.5, 10, 150.0), resort("Second", 3.0, 1.5, 10, 150.0)];
        let (scorable, _) = scorable_resorts(&resorts);
        let week = score_week(week_of(date(7, 1)), &scorable, &ScoringWeights::default());

        assert_eq!(week.top_resort.as_deref(), Some("First"));
    }

    #[test]
    fn test_resort_without_price_is_excluded() {
        let mut free = resort("NoPrice", 5.0, 0.5, 50, 0.0);
        free.prices = TicketPrices::from_raw(0.0, 0.0, 0.0);
        let resorts = vec![resort("A", 3.0, 1.5, 10, 150.0), free];

        let (scorable, excluded) = scorable_resorts(&resorts);
        assert_eq!(scorable.len(), 1);
        assert_eq!(excluded, vec!["NoPrice".to_string()]);

        let window = SeasonWindow::new(date(7, 1), date(7, 1));
        let report = score_season(&resorts, window, &ScoringWeights::default()).unwrap();
        assert_eq!(report.weeks[0].open_resorts, 1);
        assert_eq!(report.weeks[0].top_resort.as_deref(), Some("A"));
        assert_eq!(report.excluded, vec!["NoPrice".to_string()]);
    }

    #[test]
    fn test_best_week_prefers_more_open_resorts() {
        let weeks = vec![
            week_score(date(6, 1), 2, 0.9),
            week_score(date(6, 8), 3, 0.4),
            week_score(date(6, 15), 3, 0.6),
        ];
        assert_eq!(best_week(&weeks).unwrap().week_start, date(6, 15));
    }

    #[test]
    fn test_best_week_earliest_wins_full_tie() {
        let weeks = vec![
            week_score(date(6, 15), 3, 0.6),
            week_score(date(6, 8), 3, 0.6),
        ];
        assert_eq!(best_week(&weeks).unwrap().week_start, date(6, 8));
    }

    #[test]
    fn test_no_best_week_when_nothing_open() {
        let weeks = vec![week_score(date(6, 1), 0, 0.0), week_score(date(6, 8), 0, 0.0)];
        assert!(best_week(&weeks).is_none());
        assert!(best_week(&[]).is_none());
    }

    #[test]
    fn test_empty_resort_table() {
        let window = SeasonWindow::new(date(6, 1), date(10, 15));
        let report = score_season(&[], window, &ScoringWeights::default()).unwrap();

        assert_eq!(report.weeks.len(), 20);
        assert!(report.weeks.iter().all(|w| w.mean_week_score == 0.0 && w.top_resort.is_none()));
        assert!(report.best_week.is_none());
    }

    #[test]
    fn test_invalid_weights_are_rejected() {
        let resorts = vec![resort("A", 3.0, 1.5, 10, 150.0)];
        let window = SeasonWindow::new(date(6, 1), date(10, 15));

        let negative = ScoringWeights::new(0.35, -0.25, 0.25, 0.15);
        let err = score_season(&resorts, window, &negative).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight { name: "difficulty_inv", .. }));

        let nan = ScoringWeights::new(0.35, 0.25, f64::NAN, 0.15);
        let err = score_season(&resorts, window, &nan).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight { name: "price_inv", .. }));
    }

    #[test]
    fn test_inverted_window_has_no_weeks() {
        let resorts = vec![resort("A", 3.0, 1.5, 10, 150.0)];
        let window = SeasonWindow::new(date(10, 15), date(6, 1));
        let report = score_season(&resorts, window, &ScoringWeights::default()).unwrap();

        assert!(report.weeks.is_empty());
        assert!(report.best_week.is_none());
    }
}
