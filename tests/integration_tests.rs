use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ski_season_rater::climate::ClimateTable;
use ski_season_rater::config::ScoringConfig;
use ski_season_rater::data::reference_resorts;
use ski_season_rater::error::{ResortError, SeasonParseError};
use ski_season_rater::output::write_csv;
use ski_season_rater::resort::{ResortRow, load_resorts};
use ski_season_rater::scoring::aggregate::{composite_scores, scorable_resorts};
use ski_season_rater::scoring::{ScoringWeights, SeasonWindow, score_season};
use ski_season_rater::visitation::VisitationTable;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

#[test]
fn test_reference_season_best_week() {
    let config = ScoringConfig::default();
    let resorts = reference_resorts(config.season_year).unwrap();
    let report = score_season(&resorts, config.window(), &config.weights).unwrap();

    assert_eq!(report.weeks.len(), 20);
    assert!(report.excluded.is_empty());

    let best = report.best_week.as_ref().expect("a best week");
    assert_eq!(best.week_start, date(6, 15));
    assert_eq!(best.week_end, date(6, 21));
    assert_eq!(best.open_resorts, 8);
    assert_eq!(best.top_resort.as_deref(), Some("Perisher"));
}

#[test]
fn test_reference_season_week_table() {
    let config = ScoringConfig::default();
    let resorts = reference_resorts(config.season_year).unwrap();
    let report = score_season(&resorts, config.window(), &config.weights).unwrap();

    // early june resorts open on the 7th, the last day of the first week
    assert_eq!(report.weeks[0].open_resorts, 4);
    assert_eq!(report.weeks[0].top_resort.as_deref(), Some("Thredbo"));

    // Selwyn closes on 7 Sep, the first day of this week
    let sep_7 = report.weeks.iter().find(|w| w.week_start == date(9, 7)).unwrap();
    assert_eq!(sep_7.open_resorts, 8);

    // only Buller and Perisher stay open into October
    let sep_28 = report.weeks.iter().find(|w| w.week_start == date(9, 28)).unwrap();
    assert_eq!(sep_28.open_resorts, 2);
    assert!((sep_28.mean_week_score - 0.675).abs() < 1e-9);

    let last = report.weeks.last().unwrap();
    assert_eq!(last.week_start, date(10, 12));
    assert_eq!(last.open_resorts, 0);
    assert_eq!(last.mean_week_score, 0.0);
    assert_eq!(last.top_resort, None);
}

#[test]
fn test_week_invariants_hold() {
    let config = ScoringConfig::default();
    let resorts = reference_resorts(config.season_year).unwrap();
    let report = score_season(&resorts, config.window(), &config.weights).unwrap();
    let max_score = config.weights.total();
    let (scorable, _) = scorable_resorts(&resorts);

    for week in &report.weeks {
        assert_eq!(week.week_end - week.week_start, chrono::Duration::days(6));

        if week.open_resorts == 0 {
            assert_eq!(week.mean_week_score, 0.0);
            assert!(week.top_resort.is_none());
            continue;
        }

        assert!(week.mean_week_score >= 0.0);
        assert!(week.mean_week_score <= max_score + 1e-12);

        let open: Vec<_> = scorable
            .iter()
            .filter(|s| s.resort.is_open_between(week.week_start, week.week_end))
            .copied()
            .collect();
        assert_eq!(open.len(), week.open_resorts);

        for score in composite_scores(&open, &config.weights) {
            assert!(score.criteria.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}

#[test]
fn test_scoring_is_deterministic() {
    let config = ScoringConfig::default();
    let resorts = reference_resorts(config.season_year).unwrap();

    let first = score_season(&resorts, config.window(), &config.weights).unwrap();
    let second = score_season(&resorts, config.window(), &config.weights).unwrap();

    assert_eq!(first.best_week, second.best_week);
    assert_eq!(first.weeks, second.weeks);
}

#[test]
fn test_csv_table_matches_reference_table() {
    let from_csv = load_resorts(&fixture("resorts.csv"), 2025).unwrap();
    let built_in = reference_resorts(2025).unwrap();
    assert_eq!(from_csv, built_in);
}

#[test]
fn test_unpriced_resort_is_excluded() {
    let resorts = load_resorts(&fixture("resorts_unpriced.csv"), 2025).unwrap();
    assert_eq!(resorts[2].ticket_price(), None);

    let window = ScoringConfig::default().window();
    let report = score_season(&resorts, window, &ScoringWeights::default()).unwrap();
    assert_eq!(report.excluded, vec!["Gamma".to_string()]);

    let best = report.best_week.unwrap();
    assert_eq!(best.week_start, date(7, 6));
    assert_eq!(best.open_resorts, 2);
    assert!((best.mean_week_score - 0.5).abs() < 1e-12);
    assert_eq!(best.top_resort.as_deref(), Some("Alpha"));
}

#[test]
fn test_bad_month_names_resort() {
    let err = load_resorts(&fixture("resorts_bad_month.csv"), 2025).unwrap_err();
    let resort_err = err.downcast_ref::<ResortError>().expect("structured resort error");

    assert_eq!(
        resort_err,
        &ResortError::Season {
            resort: "Beta".to_string(),
            source: SeasonParseError::UnknownMonth {
                token: "may".to_string()
            },
        }
    );
}

#[test]
fn test_config_fixture_matches_defaults() {
    let config = ScoringConfig::load(&fixture("config.json")).unwrap();
    assert_eq!(config, ScoringConfig::default());
}

#[test]
fn test_empty_window_has_no_best_week() {
    let resorts = reference_resorts(2025).unwrap();
    let window = SeasonWindow::new(date(10, 15), date(6, 1));
    let report = score_season(&resorts, window, &ScoringWeights::default()).unwrap();

    assert!(report.weeks.is_empty());
    assert!(report.best_week.is_none());
}

#[test]
fn test_export_tables() {
    let dir = tempfile::tempdir().unwrap();
    let resorts = reference_resorts(2025).unwrap();
    let window = ScoringConfig::default().window();
    let report = score_season(&resorts, window, &ScoringWeights::default()).unwrap();

    let weeks_path = dir.path().join("weeks.csv");
    write_csv(&weeks_path, &report.weeks).unwrap();
    let weeks = std::fs::read_to_string(&weeks_path).unwrap();
    assert_eq!(weeks.lines().count(), 21);
    assert!(weeks.starts_with("week_start,week_end,open_resorts,mean_week_score,top_resort"));

    let rows: Vec<ResortRow> = resorts.iter().map(ResortRow::from).collect();
    let resorts_path = dir.path().join("resorts.csv");
    write_csv(&resorts_path, &rows).unwrap();
    let table = std::fs::read_to_string(&resorts_path).unwrap();
    assert_eq!(table.lines().count(), 9);
    assert!(table.lines().next().unwrap().contains("ticket_price"));
}

#[test]
fn test_visitation_pipeline() {
    let table = VisitationTable::load(&fixture("visitation_sample.csv")).unwrap();
    assert_eq!(table.resorts.len(), 4);

    let summaries = table.describe();
    let charlotte = summaries.iter().find(|s| s.resort == "Charlotte Pass").unwrap();
    assert_eq!(charlotte.count, 8);
    assert_eq!(charlotte.min, Some(0.0));

    let totals = table.yearly_totals();
    assert_eq!(totals[&2014], vec![2626.0, 37000.0, 46000.0, 1620.0]);
    assert_eq!(totals[&2015][3], 1130.0);

    let outliers = table.yearly_outliers(1.0);
    assert_eq!(outliers.len(), 4);
    assert!(outliers.iter().all(|o| o.year == 2016 && o.z_score < -1.0));
    assert!(table.yearly_outliers(2.0).is_empty());

    let corr = table.correlation_matrix();
    assert!(corr.get("Thredbo", "Perisher").unwrap() > 0.99);
}

#[test]
fn test_climate_pipeline() {
    let table = ClimateTable::load(&fixture("climate_sample.csv")).unwrap();
    assert_eq!(table.observations.len(), 5);

    let summary = table.summarize();
    assert_eq!(summary[0].count, 4);
    assert_eq!(summary[0].missing, 1);
    assert_eq!(summary[0].mean, Some(3.375));
    assert_eq!(summary[2].max, Some(12.4));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("climate_summary.csv");
    write_csv(&path, &table.summarize_by_station()).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 7);
}
