//! Athlete statistics aggregation.
//!
//! This module turns the raw athlete list into the derived statistics
//! consumed by the dashboard report. Every facet is an independent pass
//! over the same input; records that lack the fields a facet needs are
//! skipped for that facet only.

use crate::analysis::classify::{classify_split, classify_team, sport_label, SplitBucket};
use crate::models::{
    AgeDistribution, AgeRankPoint, AthleteRecord, CountMap, DerivedStatistics, MonthlyRank,
    ResultEntry, SportCount, SportPoints, SportSplit,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Number of most recent months kept in the momentum series.
pub const MOMENTUM_MONTHS: usize = 6;

/// A result paired with the athlete who achieved it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FlatResult<'a> {
    pub athlete: &'a AthleteRecord,
    pub result: &'a ResultEntry,
}

/// Running sum and count for an arithmetic mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// The mean, or `None` if nothing was added.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Compute every statistics facet for `athletes`.
///
/// `reference_year` stands in for the current year in age calculations.
pub fn compute_statistics(athletes: &[AthleteRecord], reference_year: i32) -> DerivedStatistics {
    let results = flatten_results(athletes);
    let by_sport = count_by_sport(athletes);
    let team_composition = team_composition(&by_sport);

    let stats = DerivedStatistics {
        total_athletes: athletes.len(),
        by_team: count_by_team(athletes),
        sport_split: sport_split(athletes),
        age_distribution: age_distribution(athletes, reference_year),
        resource_allocation: resource_allocation(&results),
        success_momentum: success_momentum(&results),
        age_vs_rank: age_vs_rank(athletes),
        by_sport,
        team_composition,
    };

    debug!(
        "Computed statistics for {} athletes ({} results, {} sports)",
        stats.total_athletes,
        results.len(),
        stats.by_sport.len()
    );

    stats
}

/// Count athletes per sport label, in first-seen order.
pub fn count_by_sport(athletes: &[AthleteRecord]) -> CountMap {
    let mut counts = CountMap::new();
    for athlete in athletes {
        counts.increment(sport_label(athlete));
    }
    counts
}

/// Count athletes per coarse team bucket, in first-seen order.
pub fn count_by_team(athletes: &[AthleteRecord]) -> CountMap {
    let mut counts = CountMap::new();
    for athlete in athletes {
        counts.increment(classify_team(&athlete.sport).label());
    }
    counts
}

/// Partition athletes into ski, snowboard and other.
pub fn sport_split(athletes: &[AthleteRecord]) -> SportSplit {
    athletes
        .iter()
        .fold(SportSplit::default(), |mut split, athlete| {
            match classify_split(&athlete.sport) {
                SplitBucket::Ski => split.ski += 1,
                SplitBucket::Snowboard => split.snowboard += 1,
                SplitBucket::Other => split.other += 1,
            }
            split
        })
}

/// Bucket athletes with a parseable birth date by age at `reference_year`.
pub fn age_distribution(athletes: &[AthleteRecord], reference_year: i32) -> AgeDistribution {
    athletes
        .iter()
        .filter_map(AthleteRecord::birth_date_year)
        .fold(AgeDistribution::default(), |mut dist, birth_year| {
            match reference_year - birth_year {
                age if age < 20 => dist.teens += 1,
                age if age < 30 => dist.twenties += 1,
                _ => dist.thirties += 1,
            }
            dist
        })
}

/// Pair every result with its athlete, keeping athlete then result order.
pub fn flatten_results(athletes: &[AthleteRecord]) -> Vec<FlatResult<'_>> {
    athletes
        .iter()
        .flat_map(|athlete| {
            athlete
                .results()
                .iter()
                .map(move |result| FlatResult { athlete, result })
        })
        .collect()
}

/// Mean points per sport label, highest first.
///
/// Ties keep the order in which the sports were first seen.
pub fn resource_allocation(results: &[FlatResult<'_>]) -> Vec<SportPoints> {
    let mut order: Vec<&str> = Vec::new();
    let mut means: HashMap<&str, MeanAccumulator> = HashMap::new();

    for flat in results {
        let Some(points) = flat.result.valid_points() else {
            continue;
        };
        let sport = sport_label(flat.athlete);
        means
            .entry(sport)
            .or_insert_with(|| {
                order.push(sport);
                MeanAccumulator::default()
            })
            .add(points);
    }

    let mut allocation: Vec<SportPoints> = order
        .into_iter()
        .filter_map(|sport| {
            let mean = means.get(sport)?.mean()?;
            Some(SportPoints {
                sport: sport.to_string(),
                avg_fis_points: mean,
            })
        })
        .collect();

    allocation.sort_by(|a, b| {
        b.avg_fis_points
            .partial_cmp(&a.avg_fis_points)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    allocation
}

/// Mean placement per year-month for the most recent months.
pub fn success_momentum(results: &[FlatResult<'_>]) -> Vec<MonthlyRank> {
    let mut months: BTreeMap<&str, MeanAccumulator> = BTreeMap::new();

    for flat in results {
        let (Some(month), Some(rank)) = (flat.result.year_month(), flat.result.placement()) else {
            continue;
        };
        months.entry(month).or_default().add(f64::from(rank));
    }

    let series: Vec<MonthlyRank> = months
        .into_iter()
        .filter_map(|(label, acc)| {
            Some(MonthlyRank {
                label: label.to_string(),
                value: acc.mean()?,
            })
        })
        .collect();

    let skip = series.len().saturating_sub(MOMENTUM_MONTHS);
    series.into_iter().skip(skip).collect()
}

/// One point per athlete with both a known age and a current ranking.
pub fn age_vs_rank(athletes: &[AthleteRecord]) -> Vec<AgeRankPoint> {
    athletes
        .iter()
        .filter_map(|athlete| {
            let age = athlete.age.filter(|age| *age > 0)?;
            let rank = athlete.ranked_position()?;
            Some(AgeRankPoint {
                age: u32::try_from(age).ok()?,
                rank,
            })
        })
        .collect()
}

/// Sport counts as a list, largest first.
pub fn team_composition(by_sport: &CountMap) -> Vec<SportCount> {
    let mut composition: Vec<SportCount> = by_sport
        .iter()
        .map(|(sport, count)| SportCount {
            sport: sport.to_string(),
            count,
        })
        .collect();

    composition.sort_by_key(|entry| std::cmp::Reverse(entry.count));
    composition
}
