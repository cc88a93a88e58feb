//! Roster and results queries.
//!
//! Read-only views over the athlete list: medal holders, ranking leaders,
//! per-sport groups, the dated results feed with paging, and the profile
//! summary of a single athlete.

use crate::analysis::aggregator::{flatten_results, FlatResult};
use crate::analysis::classify::sport_label;
use crate::models::{AthleteRecord, Medals, ResultEntry};
use chrono::NaiveDate;
use serde::Serialize;

/// Number of results shown on an athlete profile.
pub const PROFILE_RESULTS: usize = 8;

/// Athletes that have won at least one medal, in dataset order.
pub fn medalists(athletes: &[AthleteRecord]) -> Vec<&AthleteRecord> {
    athletes
        .iter()
        .filter(|a| a.medals().total() > 0)
        .collect()
}

/// The `limit` best currently ranked athletes.
pub fn top_rankers(athletes: &[AthleteRecord], limit: usize) -> Vec<&AthleteRecord> {
    let mut ranked: Vec<(&AthleteRecord, u32)> = athletes
        .iter()
        .filter_map(|a| a.ranked_position().map(|rank| (a, rank)))
        .collect();

    ranked.sort_by_key(|(_, rank)| *rank);
    ranked.truncate(limit);

    ranked.into_iter().map(|(athlete, _)| athlete).collect()
}

/// Athletes sharing one sport label.
#[derive(Debug, Clone, Serialize)]
pub struct RosterGroup<'a> {
    pub sport: String,
    pub athletes: Vec<&'a AthleteRecord>,
}

/// Group athletes by sport label, largest group first.
///
/// Groups of equal size keep the order in which the sport first appeared.
pub fn group_by_sport(athletes: &[AthleteRecord]) -> Vec<RosterGroup<'_>> {
    let mut groups: Vec<RosterGroup<'_>> = Vec::new();

    for athlete in athletes {
        let sport = sport_label(athlete);
        match groups.iter_mut().find(|g| g.sport == sport) {
            Some(group) => group.athletes.push(athlete),
            None => groups.push(RosterGroup {
                sport: sport.to_string(),
                athletes: vec![athlete],
            }),
        }
    }

    groups.sort_by_key(|g| std::cmp::Reverse(g.athletes.len()));
    groups
}

/// All dated results, newest first.
pub fn results_feed(athletes: &[AthleteRecord]) -> Vec<FlatResult<'_>> {
    let mut feed: Vec<FlatResult<'_>> = flatten_results(athletes)
        .into_iter()
        .filter(|f| f.result.date.as_deref().is_some_and(|d| !d.is_empty()))
        .collect();

    feed.sort_by(|a, b| b.result.date.cmp(&a.result.date));
    feed
}

/// One page of a longer list.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<T>,
}

/// Slice out page `page` (1-based) of `items`.
///
/// There is always at least one page; a page past the end is empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);

    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    Page {
        page,
        page_size,
        total_pages,
        total_items: items.len(),
        items: items[start..end].to_vec(),
    }
}

/// Look an athlete up by `id`, or by FIS code when the record has no id.
pub fn find_athlete<'a>(athletes: &'a [AthleteRecord], key: &str) -> Option<&'a AthleteRecord> {
    athletes.iter().find(|a| a.key() == key)
}

/// Summary shown on an athlete's profile.
#[derive(Debug, Clone, Serialize)]
pub struct AthleteProfile<'a> {
    pub athlete: &'a AthleteRecord,
    pub sport: &'a str,
    pub age: Option<i64>,
    pub current_rank: Option<u32>,
    pub best_rank: Option<u32>,
    pub medals: Medals,
    pub recent_results: &'a [ResultEntry],
    /// Placements among `recent_results`, skipping DNS/DNF.
    pub trend_ranks: Vec<u32>,
    /// Points of the most recent listed result.
    pub latest_points: Option<f64>,
}

impl<'a> AthleteProfile<'a> {
    pub fn build(athlete: &'a AthleteRecord, reference_year: i32) -> Self {
        let results = athlete.results();
        let recent_results = &results[..results.len().min(PROFILE_RESULTS)];

        let age = athlete
            .age
            .filter(|age| *age > 0)
            .or_else(|| {
                athlete
                    .birth_year
                    .and_then(|y| i64::from(reference_year).checked_sub(y))
            });

        Self {
            athlete,
            sport: sport_label(athlete),
            age,
            current_rank: athlete.ranked_position(),
            best_rank: athlete.best_position(),
            medals: athlete.medals(),
            recent_results,
            trend_ranks: recent_results.iter().filter_map(ResultEntry::placement).collect(),
            latest_points: recent_results.first().and_then(|r| r.points),
        }
    }
}

/// Days-to-go label for the opening ceremony: `D-n`, or `D+n` once passed.
pub fn countdown(opening: NaiveDate, today: NaiveDate) -> String {
    let days = (opening - today).num_days();
    if days >= 0 {
        format!("D-{}", days)
    } else {
        format!("D+{}", days.abs())
    }
}
