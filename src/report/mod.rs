//! Report assembly and rendering.
//!
//! A [`Report`] bundles the derived statistics with the roster views the
//! dashboard showed, ready to be rendered as Markdown or JSON.

pub mod generator;

use crate::analysis::{
    compute_statistics, countdown, find_athlete, group_by_sport, medalists, paginate,
    results_feed, top_rankers, AthleteProfile, FlatResult, Page, RosterGroup,
};
use crate::config::Config;
use crate::models::{AthleteRecord, AthletesData, DerivedStatistics};
use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Metadata about the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the dataset file.
    pub dataset: String,
    /// `last_updated` stamp carried by the dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Year used for age calculations.
    pub reference_year: i32,
    /// Opening day of the games.
    pub opening_date: NaiveDate,
    /// `D-n` / `D+n` label relative to the opening day.
    pub countdown: String,
}

/// The complete statistics report.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub metadata: ReportMetadata,
    pub statistics: DerivedStatistics,
    pub top_rankers: Vec<&'a AthleteRecord>,
    pub medalists: Vec<&'a AthleteRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<RosterGroup<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Page<FlatResult<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<AthleteProfile<'a>>,
}

/// Per-run choices that are not part of the configuration file.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    /// Results feed page (1-based).
    pub page: usize,
    /// Athlete whose profile should be included.
    pub athlete: Option<String>,
    /// Date used as today for the countdown.
    pub today: NaiveDate,
}

/// Run the aggregation and roster queries and assemble a report.
///
/// Fails only when a requested athlete is not in the dataset.
pub fn build_report<'a>(
    data: &'a AthletesData,
    config: &Config,
    request: &ReportRequest,
) -> Result<Report<'a>> {
    let athletes = data.athletes.as_slice();
    let reference_year = config.dataset.reference_year;

    let profile = match request.athlete.as_deref() {
        Some(key) => match find_athlete(athletes, key) {
            Some(athlete) => Some(AthleteProfile::build(athlete, reference_year)),
            None => bail!("Athlete not found: {}", key),
        },
        None => None,
    };

    let feed = config
        .report
        .include_feed
        .then(|| paginate(&results_feed(athletes), request.page, config.report.page_size));

    let metadata = ReportMetadata {
        dataset: config.dataset.path.display().to_string(),
        last_updated: data.last_updated().map(String::from),
        generated_at: Utc::now(),
        reference_year,
        opening_date: config.dataset.opening_date,
        countdown: countdown(config.dataset.opening_date, request.today),
    };

    Ok(Report {
        metadata,
        statistics: compute_statistics(athletes, reference_year),
        top_rankers: top_rankers(athletes, config.report.top_rankers),
        medalists: medalists(athletes),
        roster: config.report.include_roster.then(|| group_by_sport(athletes)),
        feed,
        profile,
    })
}
