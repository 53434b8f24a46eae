//! CLI entry point for the ski season rater.
//!
//! Provides subcommands for scoring the weeks of a ski season, listing the
//! resort table, and summarizing visitation and climate spreadsheets.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ski_season_rater::{
    climate::ClimateTable,
    config::ScoringConfig,
    data::reference_resorts,
    output::{log_report, print_json, print_pretty, write_csv},
    resort::{Resort, ResortRow, load_resorts},
    scoring::score_season,
    visitation::VisitationTable,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ski_season_rater")]
#[command(about = "Scores ski resorts week by week and summarizes resort datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every week of the season and suggest the best one
    Score {
        /// Resort table CSV (defaults to the built-in reference table)
        #[arg(short, long)]
        resorts: Option<PathBuf>,

        /// Scoring config JSON (falls back to SKI_RATER_CONFIG, then defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// CSV file to write the week table to
        #[arg(short, long)]
        weeks_out: Option<PathBuf>,

        /// Log the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the resort table with blended ticket price and season dates
    Resorts {
        /// Resort table CSV (defaults to the built-in reference table)
        #[arg(short, long)]
        resorts: Option<PathBuf>,

        /// Scoring config JSON, used for the season year
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// CSV file to write the augmented table to
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Summarize a weekly visitation table
    Visitation {
        /// Visitation CSV (Year, Week, one column per resort)
        #[arg(short, long)]
        input: PathBuf,

        /// CSV file to write per-resort summary statistics to
        #[arg(short, long)]
        summary_out: Option<PathBuf>,

        /// Z-score magnitude above which a yearly total is an outlier
        #[arg(short, long, default_value_t = 2.0)]
        threshold: f64,
    },
    /// Summarize a daily climate table
    Climate {
        /// Climate CSV (station, year, month, day, temperatures, rainfall)
        #[arg(short, long)]
        input: PathBuf,

        /// CSV file to write per-station summary statistics to
        #[arg(short, long)]
        summary_out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ski_season_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ski_season_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            resorts,
            config,
            weeks_out,
            json,
        } => {
            let config = ScoringConfig::resolve(config.as_deref())?;
            let resorts = resort_table(resorts.as_deref(), config.season_year)?;

            let report = score_season(&resorts, config.window(), &config.weights)?;
            log_report(&report);

            if json {
                print_json(&report)?;
            }
            if let Some(path) = weeks_out {
                write_csv(&path, &report.weeks)?;
                info!(path = %path.display(), weeks = report.weeks.len(), "Week table written");
            }
        }
        Commands::Resorts {
            resorts,
            config,
            out,
        } => {
            let config = ScoringConfig::resolve(config.as_deref())?;
            let resorts = resort_table(resorts.as_deref(), config.season_year)?;
            let rows: Vec<ResortRow> = resorts.iter().map(ResortRow::from).collect();

            for row in &rows {
                info!(
                    resort = %row.resort,
                    rating = row.rating_5,
                    difficulty = row.difficulty_3,
                    lifts = row.lifts,
                    ticket_price = ?row.ticket_price,
                    season_start = %row.season_start,
                    season_end = %row.season_end,
                    "Resort"
                );
            }

            if let Some(path) = out {
                write_csv(&path, &rows)?;
                info!(path = %path.display(), resorts = rows.len(), "Resort table written");
            }
        }
        Commands::Visitation {
            input,
            summary_out,
            threshold,
        } => {
            let table = VisitationTable::load(&input)?;
            summarize_visitation(&table, summary_out.as_deref(), threshold)?;
        }
        Commands::Climate { input, summary_out } => {
            let table = ClimateTable::load(&input)?;
            summarize_climate(&table, summary_out.as_deref())?;
        }
    }

    Ok(())
}

/// Loads the resort table from `path`, or the built-in reference table.
#[tracing::instrument]
fn resort_table(path: Option<&Path>, year: i32) -> Result<Vec<Resort>> {
    let resorts = match path {
        Some(p) => load_resorts(p, year)?,
        None => reference_resorts(year).context("built-in resort table is invalid")?,
    };
    info!(resorts = resorts.len(), "Resort table loaded");
    Ok(resorts)
}

/// Logs visitation summaries, yearly totals, outliers and correlations.
#[tracing::instrument(skip(table), fields(resorts = table.resorts.len(), rows = table.rows.len()))]
fn summarize_visitation(table: &VisitationTable, summary_out: Option<&Path>, threshold: f64) -> Result<()> {
    let summaries = table.describe();
    for s in &summaries {
        print_pretty(s);
        info!(
            resort = %s.resort,
            count = s.count,
            mean = ?s.mean,
            median = ?s.median,
            max = ?s.max,
            "Visitation summary"
        );
    }

    for (year, total) in table.grand_totals() {
        info!(year, total, "Total visitors across all resorts");
    }

    let outliers = table.yearly_outliers(threshold);
    if outliers.is_empty() {
        info!(threshold, "No yearly visitation outliers");
    }
    for o in &outliers {
        info!(resort = %o.resort, year = o.year, visitors = o.visitors, z_score = o.z_score, "Yearly visitation outlier");
    }

    print_json(&table.correlation_matrix())?;

    if let Some(path) = summary_out {
        write_csv(path, &summaries)?;
        info!(path = %path.display(), "Visitation summary written");
    }

    Ok(())
}

/// Logs missing-value counts and per-variable climate summaries.
#[tracing::instrument(skip(table), fields(rows = table.observations.len()))]
fn summarize_climate(table: &ClimateTable, summary_out: Option<&Path>) -> Result<()> {
    for (variable, missing) in table.missing_counts() {
        info!(variable, missing, "Missing values");
    }

    for s in table.summarize() {
        info!(
            variable = s.variable,
            count = s.count,
            mean = ?s.mean,
            std = ?s.std,
            min = ?s.min,
            median = ?s.median,
            max = ?s.max,
            "Climate summary"
        );
    }

    if let Some(path) = summary_out {
        let by_station = table.summarize_by_station();
        write_csv(path, &by_station)?;
        info!(path = %path.display(), rows = by_station.len(), "Climate summary written");
    }

    Ok(())
}
