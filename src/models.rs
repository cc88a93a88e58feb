//! Data models for the athlete dataset and its derived statistics.
//!
//! This module contains the input records loaded from the dataset file
//! and the view-model structures produced by the aggregation engine.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Medal counts for an athlete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medals {
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub bronze: u32,
}

impl Medals {
    /// Total number of medals of any color.
    pub fn total(&self) -> u64 {
        u64::from(self.gold) + u64::from(self.silver) + u64::from(self.bronze)
    }
}

/// A single competition result in an athlete's history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// ISO date of the competition (e.g. `2025-01-18`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Event name as published by the federation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Finishing position. Non-numeric values load as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub rank: Option<i64>,
    /// Ranking points earned. Non-numeric values load as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_real",
        skip_serializing_if = "Option::is_none"
    )]
    pub points: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nation: Option<String>,
}

impl ResultEntry {
    /// Returns the placement when the athlete actually finished.
    ///
    /// Missing and non-positive ranks (DNS/DNF/DSQ) yield `None`.
    pub fn placement(&self) -> Option<u32> {
        self.rank
            .filter(|rank| *rank > 0)
            .and_then(|rank| u32::try_from(rank).ok())
    }

    /// Returns the points value when it is usable for averaging.
    pub fn valid_points(&self) -> Option<f64> {
        self.points.filter(|p| p.is_finite() && *p >= 0.0)
    }

    /// Returns the `YYYY-MM` prefix of the result date, if well formed.
    pub fn year_month(&self) -> Option<&str> {
        let date = self.date.as_deref()?;
        let prefix = date.get(..7)?;
        let bytes = prefix.as_bytes();

        let digits_ok = bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !digits_ok || bytes[4] != b'-' {
            return None;
        }

        let month: u32 = prefix[5..].parse().ok()?;
        (1..=12).contains(&month).then_some(prefix)
    }
}

/// A national team athlete as stored in the dataset file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// FIS competitor code; the stable key when `id` is absent.
    #[serde(default)]
    pub fis_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fis_url: Option<String>,
    /// Name in Korean.
    #[serde(rename = "name_ko", default)]
    pub name_korean: String,
    /// Name in English.
    #[serde(rename = "name_en", default, skip_serializing_if = "Option::is_none")]
    pub name_english: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Raw sport identifier (e.g. `snowboard_park`).
    #[serde(default)]
    pub sport: String,
    /// Human readable sport label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_display: Option<String>,
    #[serde(default)]
    pub team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_year: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_rank: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_rank: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub season_starts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medals: Option<Medals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_results: Option<Vec<ResultEntry>>,
}

impl AthleteRecord {
    /// Key used for profile lookups: `id` when present, else the FIS code.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.fis_code)
    }

    /// Display name, preferring the English spelling.
    pub fn display_name(&self) -> &str {
        match self.name_english.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.name_korean,
        }
    }

    /// Medal counts, all zero when the record carries none.
    pub fn medals(&self) -> Medals {
        self.medals.unwrap_or_default()
    }

    /// Result history in dataset order.
    pub fn results(&self) -> &[ResultEntry] {
        self.recent_results.as_deref().unwrap_or(&[])
    }

    /// Current world ranking, only when it is a real position.
    pub fn ranked_position(&self) -> Option<u32> {
        positive(self.current_rank)
    }

    /// Best career ranking, only when it is a real position.
    pub fn best_position(&self) -> Option<u32> {
        positive(self.best_rank)
    }

    /// Year component of `birth_date`, if it has a 4-digit year prefix.
    pub fn birth_date_year(&self) -> Option<i32> {
        let date = self.birth_date.as_deref()?;
        let year = date.get(..4)?;
        if !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        year.parse().ok()
    }
}

fn positive(value: Option<i64>) -> Option<u32> {
    value
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
}

/// Dataset-level metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Root of the dataset file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthletesData {
    #[serde(default)]
    pub metadata: Option<DatasetMetadata>,
    #[serde(default)]
    pub athletes: Vec<AthleteRecord>,
}

impl AthletesData {
    /// The `last_updated` stamp, if the file carries one.
    pub fn last_updated(&self) -> Option<&str> {
        self.metadata.as_ref()?.last_updated.as_deref()
    }
}

/// Accepts a JSON number with no fractional part; anything else is `None`.
fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        _ => None,
    }))
}

/// Accepts any JSON number; anything else is `None`.
fn lenient_real<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

/// Label → count mapping that keeps first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountMap {
    entries: Vec<(String, usize)>,
}

impl CountMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for `key`, appending it if unseen.
    pub fn increment(&mut self, key: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key.to_string(), 1)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
impl CountMap {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

impl Serialize for CountMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Ski / snowboard / other partition of the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SportSplit {
    pub ski: usize,
    pub snowboard: usize,
    pub other: usize,
}

impl SportSplit {
    /// Rounded percentage of ski athletes out of `total`.
    pub fn ski_percent(&self, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        ((self.ski as f64 / total as f64) * 100.0).round() as u32
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.ski + self.snowboard + self.other
    }
}

/// Age buckets for athletes with a known birth date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgeDistribution {
    /// Younger than 20.
    pub teens: usize,
    /// 20 to 29.
    pub twenties: usize,
    /// 30 and older.
    pub thirties: usize,
}

impl AgeDistribution {
    /// Number of athletes placed in any bucket.
    pub fn total(&self) -> usize {
        self.teens + self.twenties + self.thirties
    }
}

/// Mean ranking points of one sport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportPoints {
    pub sport: String,
    pub avg_fis_points: f64,
}

/// Mean placement within one year-month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRank {
    /// `YYYY-MM`
    pub label: String,
    pub value: f64,
}

/// A scatter point relating age to current ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeRankPoint {
    pub age: u32,
    pub rank: u32,
}

/// Athlete count of one sport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SportCount {
    pub sport: String,
    pub count: usize,
}

/// Statistics derived from the full athlete list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedStatistics {
    pub total_athletes: usize,
    pub by_sport: CountMap,
    pub by_team: CountMap,
    pub sport_split: SportSplit,
    pub age_distribution: AgeDistribution,
    pub resource_allocation: Vec<SportPoints>,
    pub success_momentum: Vec<MonthlyRank>,
    pub age_vs_rank: Vec<AgeRankPoint>,
    pub team_composition: Vec<SportCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_athlete_record() {
        let json = r#"{
            "name_ko": "김선수",
            "name_en": "KIM Sunsu",
            "sport": "snowboard_park",
            "sport_display": "Snowboard Park",
            "team": "KOR",
            "fis_code": "9531234",
            "birth_date": "2004-03-12",
            "current_rank": 12,
            "medals": {"gold": 1, "silver": 0, "bronze": 2},
            "recent_results": [
                {"date": "2025-01-18", "event": "Big Air", "rank": 3, "points": 65.5}
            ]
        }"#;

        let athlete: AthleteRecord = serde_json::from_str(json).unwrap();
        assert_eq!(athlete.name_korean, "김선수");
        assert_eq!(athlete.key(), "9531234");
        assert_eq!(athlete.display_name(), "KIM Sunsu");
        assert_eq!(athlete.ranked_position(), Some(12));
        assert_eq!(athlete.medals().total(), 3);
        assert_eq!(athlete.results().len(), 1);
        assert_eq!(athlete.results()[0].placement(), Some(3));
    }

    #[test]
    fn test_lenient_numeric_fields() {
        let json = r#"{
            "sport": "alpine_skiing",
            "current_rank": null,
            "recent_results": [
                {"date": "2025-01-18", "rank": "DNF", "points": "n/a"},
                {"date": "2025-01-19", "rank": 0, "points": 12}
            ]
        }"#;

        let athlete: AthleteRecord = serde_json::from_str(json).unwrap();
        assert_eq!(athlete.current_rank, None);
        assert_eq!(athlete.results()[0].rank, None);
        assert_eq!(athlete.results()[0].points, None);
        assert_eq!(athlete.results()[1].rank, Some(0));
        assert_eq!(athlete.results()[1].placement(), None);
        assert_eq!(athlete.results()[1].valid_points(), Some(12.0));
    }

    #[test]
    fn test_missing_optional_fields() {
        let athlete: AthleteRecord = serde_json::from_str(r#"{"sport": "ski_cross"}"#).unwrap();
        assert_eq!(athlete.medals(), Medals::default());
        assert!(athlete.results().is_empty());
        assert_eq!(athlete.birth_date_year(), None);
        assert_eq!(athlete.ranked_position(), None);
    }

    #[test]
    fn test_key_prefers_id() {
        let athlete = AthleteRecord {
            id: Some("athlete-7".to_string()),
            fis_code: "9531234".to_string(),
            ..Default::default()
        };
        assert_eq!(athlete.key(), "athlete-7");
    }

    #[test]
    fn test_birth_date_year() {
        let mut athlete = AthleteRecord {
            birth_date: Some("1995-06-01".to_string()),
            ..Default::default()
        };
        assert_eq!(athlete.birth_date_year(), Some(1995));

        athlete.birth_date = Some("unknown".to_string());
        assert_eq!(athlete.birth_date_year(), None);

        athlete.birth_date = Some("95-06-01".to_string());
        assert_eq!(athlete.birth_date_year(), None);

        athlete.birth_date = Some("2005/01/01".to_string());
        assert_eq!(athlete.birth_date_year(), Some(2005));

        athlete.birth_date = Some("20050101".to_string());
        assert_eq!(athlete.birth_date_year(), Some(2005));

        athlete.birth_date = Some("200".to_string());
        assert_eq!(athlete.birth_date_year(), None);
    }

    #[test]
    fn test_medal_total_does_not_overflow() {
        let medals = Medals {
            gold: u32::MAX,
            silver: 1,
            bronze: 0,
        };
        assert_eq!(medals.total(), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_year_month() {
        let mut entry = ResultEntry {
            date: Some("2025-01-18".to_string()),
            ..Default::default()
        };
        assert_eq!(entry.year_month(), Some("2025-01"));

        entry.date = Some("2025-13-01".to_string());
        assert_eq!(entry.year_month(), None);

        entry.date = Some("Jan 2025".to_string());
        assert_eq!(entry.year_month(), None);

        entry.date = Some("2025".to_string());
        assert_eq!(entry.year_month(), None);

        entry.date = None;
        assert_eq!(entry.year_month(), None);
    }

    #[test]
    fn test_valid_points_rejects_negative() {
        let entry = ResultEntry {
            points: Some(-4.0),
            ..Default::default()
        };
        assert_eq!(entry.valid_points(), None);
    }

    #[test]
    fn test_count_map_keeps_first_seen_order() {
        let mut counts = CountMap::new();
        counts.increment("Moguls");
        counts.increment("Ski Cross");
        counts.increment("Moguls");

        let entries: Vec<_> = counts.iter().collect();
        assert_eq!(entries, vec![("Moguls", 2), ("Ski Cross", 1)]);
        assert_eq!(counts.total(), 3);

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"Moguls":2,"Ski Cross":1}"#);
    }

    #[test]
    fn test_ski_percent() {
        let split = SportSplit {
            ski: 2,
            snowboard: 1,
            other: 0,
        };
        assert_eq!(split.ski_percent(3), 67);
        assert_eq!(SportSplit::default().ski_percent(0), 0);
    }
}
