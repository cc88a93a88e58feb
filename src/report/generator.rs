//! Markdown report generation.
//!
//! This module renders the statistics report as Markdown tables, section
//! by section, mirroring the dashboard pages.

use super::{Report, ReportMetadata};
use crate::analysis::classify::{short_discipline, sport_label};
use crate::analysis::{AthleteProfile, FlatResult, Page, RosterGroup};
use crate::models::{AthleteRecord, DerivedStatistics};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Rows shown in the resource allocation table.
const RESOURCE_ROWS: usize = 7;

/// Rows shown in the team composition table.
const COMPOSITION_ROWS: usize = 6;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report<'_>) -> String {
    let mut output = String::new();

    output.push_str("# Podium Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.statistics));
    output.push_str(&generate_distribution_section(&report.statistics));
    output.push_str(&generate_performance_section(&report.statistics));
    output.push_str(&generate_athlete_table(
        "Top Rankers",
        &report.top_rankers,
        "No ranked athletes.",
    ));
    output.push_str(&generate_athlete_table(
        "Medalists",
        &report.medalists,
        "No medalists yet.",
    ));

    if let Some(ref roster) = report.roster {
        output.push_str(&generate_roster_section(roster));
    }
    if let Some(ref feed) = report.feed {
        output.push_str(&generate_feed_section(feed));
    }
    if let Some(ref profile) = report.profile {
        output.push_str(&generate_profile_section(profile));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset));
    if let Some(ref updated) = metadata.last_updated {
        section.push_str(&format!("- **Last Updated:** {}\n", updated));
    }
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Reference Year:** {}\n",
        metadata.reference_year
    ));
    section.push_str(&format!(
        "- **Opening Day:** {} ({})\n",
        metadata.opening_date.format("%Y-%m-%d"),
        metadata.countdown
    ));
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(stats: &DerivedStatistics) -> String {
    let mut section = String::new();
    let split = &stats.sport_split;
    let ski_pct = split.ski_percent(stats.total_athletes);

    section.push_str("## Summary\n\n");
    section.push_str(&format!("**Total Athletes:** {}\n\n", stats.total_athletes));

    section.push_str("| Ski | Snowboard | Other |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        split.ski, split.snowboard, split.other
    ));
    section.push_str(&format!(
        "*Ski {}% · Snowboard {}%*\n\n",
        ski_pct,
        100 - ski_pct
    ));

    section
}

/// Generate the distribution section (sport, team, age).
fn generate_distribution_section(stats: &DerivedStatistics) -> String {
    let mut section = String::new();

    section.push_str("## Distribution\n\n");

    if !stats.by_sport.is_empty() {
        section.push_str("### Discipline Ratio\n\n");
        section.push_str("| Sport | Athletes |\n");
        section.push_str("|:---|:---:|\n");
        for (sport, count) in stats.by_sport.iter() {
            section.push_str(&format!("| {} | {} |\n", sport, count));
        }
        section.push('\n');
    }

    if !stats.by_team.is_empty() {
        section.push_str("### Team Size\n\n");
        section.push_str("| Team | Athletes |\n");
        section.push_str("|:---|:---:|\n");
        for (team, count) in stats.by_team.iter() {
            section.push_str(&format!("| {} | {} |\n", team, count));
        }
        section.push('\n');
    }

    let ages = &stats.age_distribution;
    section.push_str("### Age Demographics\n\n");
    section.push_str("| Teens | 20s | 30s |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        ages.teens, ages.twenties, ages.thirties
    ));
    section.push_str(&format!(
        "*{} of {} athletes with a known birth date*\n\n",
        ages.total(),
        stats.total_athletes
    ));

    section
}

/// Generate the performance analysis section.
fn generate_performance_section(stats: &DerivedStatistics) -> String {
    let mut section = String::new();

    section.push_str("## Performance Analysis\n\n");

    if !stats.resource_allocation.is_empty() {
        section.push_str("### Average FIS Points by Sport\n\n");
        section.push_str("| Sport | Avg Points |\n");
        section.push_str("|:---|---:|\n");
        for entry in stats.resource_allocation.iter().take(RESOURCE_ROWS) {
            section.push_str(&format!(
                "| {} | {:.2} |\n",
                entry.sport, entry.avg_fis_points
            ));
        }
        section.push('\n');
    }

    if !stats.success_momentum.is_empty() {
        section.push_str("### Success Momentum\n\n");
        section.push_str("| Month | Avg Rank |\n");
        section.push_str("|:---|---:|\n");
        for month in &stats.success_momentum {
            section.push_str(&format!("| {} | {:.1} |\n", month.label, month.value));
        }
        section.push('\n');
    }

    if !stats.age_vs_rank.is_empty() {
        section.push_str("### Age vs Rank\n\n");
        section.push_str("| Age | Rank |\n");
        section.push_str("|:---:|:---:|\n");
        for point in &stats.age_vs_rank {
            section.push_str(&format!("| {} | {} |\n", point.age, point.rank));
        }
        section.push('\n');
    }

    if !stats.team_composition.is_empty() {
        section.push_str("### Team Composition\n\n");
        section.push_str("| Sport | Athletes |\n");
        section.push_str("|:---|:---:|\n");
        for entry in stats.team_composition.iter().take(COMPOSITION_ROWS) {
            section.push_str(&format!("| {} | {} |\n", entry.sport, entry.count));
        }
        section.push('\n');
    }

    section
}

/// Generate a table of athletes under `title`.
fn generate_athlete_table(title: &str, athletes: &[&AthleteRecord], empty: &str) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));

    if athletes.is_empty() {
        section.push_str(empty);
        section.push_str("\n\n");
        return section;
    }

    section.push_str("| Athlete | Sport | Rank | Medals |\n");
    section.push_str("|:---|:---|:---:|:---:|\n");
    for athlete in athletes {
        section.push_str(&generate_athlete_row(athlete));
    }
    section.push('\n');

    section
}

/// Generate one athlete table row.
fn generate_athlete_row(athlete: &AthleteRecord) -> String {
    let rank = athlete
        .ranked_position()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "| {} ({}) | {} | {} | {} |\n",
        athlete.display_name(),
        athlete.name_korean,
        sport_label(athlete),
        rank,
        format_medals(athlete)
    )
}

fn format_medals(athlete: &AthleteRecord) -> String {
    let medals = athlete.medals();
    let mut parts = Vec::new();

    if medals.gold > 0 {
        parts.push(format!("🥇{}", medals.gold));
    }
    if medals.silver > 0 {
        parts.push(format!("🥈{}", medals.silver));
    }
    if medals.bronze > 0 {
        parts.push(format!("🥉{}", medals.bronze));
    }

    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}

/// Generate the per-sport roster section.
fn generate_roster_section(roster: &[RosterGroup<'_>]) -> String {
    let mut section = String::new();

    section.push_str("## Roster\n\n");

    for group in roster {
        section.push_str(&format!(
            "### {} ({} athletes)\n\n",
            group.sport,
            group.athletes.len()
        ));
        for athlete in &group.athletes {
            section.push_str(&format!(
                "- {} ({}) `{}`\n",
                athlete.display_name(),
                athlete.name_korean,
                athlete.key()
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the results feed section for one page.
fn generate_feed_section(feed: &Page<FlatResult<'_>>) -> String {
    let mut section = String::new();

    section.push_str("## Results Feed\n\n");
    section.push_str(&format!(
        "*Page {} of {} ({} results)*\n\n",
        feed.page, feed.total_pages, feed.total_items
    ));

    if feed.items.is_empty() {
        section.push_str("No results on this page.\n\n");
        return section;
    }

    section.push_str("| Date | Athlete | Event | Rank | Points |\n");
    section.push_str("|:---|:---|:---|:---:|---:|\n");
    for item in &feed.items {
        section.push_str(&generate_feed_row(item));
    }
    section.push('\n');

    section
}

/// Generate one results feed row.
fn generate_feed_row(item: &FlatResult<'_>) -> String {
    let result = item.result;
    let event = result
        .discipline
        .as_deref()
        .or(result.event.as_deref())
        .map(short_discipline)
        .unwrap_or("-");

    format!(
        "| {} | {} | {} | {} | {} |\n",
        result.date.as_deref().unwrap_or("-"),
        item.athlete.display_name(),
        event,
        format_rank(result.placement()),
        format_points(result.points)
    )
}

/// Generate the athlete profile section.
fn generate_profile_section(profile: &AthleteProfile<'_>) -> String {
    let mut section = String::new();
    let athlete = profile.athlete;

    section.push_str(&format!(
        "## Athlete Profile: {} ({})\n\n",
        athlete.display_name(),
        athlete.name_korean
    ));

    section.push_str(&format!("- **Sport:** {}\n", profile.sport));
    if !athlete.team.is_empty() {
        section.push_str(&format!("- **Team:** {}\n", athlete.team));
    }
    section.push_str(&format!("- **FIS Code:** {}\n", athlete.fis_code));
    if let Some(age) = profile.age {
        section.push_str(&format!("- **Age:** {}\n", age));
    }
    section.push_str(&format!(
        "- **Current Rank:** {}\n",
        format_rank(profile.current_rank)
    ));
    section.push_str(&format!(
        "- **Best Rank:** {}\n",
        format_rank(profile.best_rank)
    ));
    section.push_str(&format!("- **Medals:** {}\n", format_medals(athlete)));
    section.push_str(&format!(
        "- **Latest Points:** {}\n",
        format_points(profile.latest_points)
    ));
    if !profile.trend_ranks.is_empty() {
        let trend: Vec<String> = profile.trend_ranks.iter().map(|r| r.to_string()).collect();
        section.push_str(&format!("- **Rank Trend:** {}\n", trend.join(" → ")));
    }
    section.push('\n');

    if !profile.recent_results.is_empty() {
        section.push_str("### Recent Results\n\n");
        section.push_str("| Date | Event | Venue | Rank | Points |\n");
        section.push_str("|:---|:---|:---|:---:|---:|\n");
        for result in profile.recent_results {
            section.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                result.date.as_deref().unwrap_or("-"),
                result.event.as_deref().unwrap_or("-"),
                result
                    .venue
                    .as_deref()
                    .or(result.nation.as_deref())
                    .unwrap_or("-"),
                format_rank(result.placement()),
                format_points(result.points)
            ));
        }
        section.push('\n');
    }

    section
}

fn format_rank(rank: Option<u32>) -> String {
    rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
}

fn format_points(points: Option<f64>) -> String {
    points
        .map(|p| format!("{:.2}", p))
        .unwrap_or_else(|| "-".to_string())
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by Podium*\n");

    footer
}

/// Write the Markdown report to a file.
pub fn write_report(report: &Report<'_>, path: &Path) -> Result<()> {
    let content = generate_markdown_report(report);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report<'_>) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a JSON report to a file.
pub fn write_json_report(report: &Report<'_>, path: &Path) -> Result<()> {
    let content = generate_json_report(report)?;

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::report::tests::sample_data;
    use crate::report::{build_report, ReportRequest};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn request(athlete: Option<&str>) -> ReportRequest {
        ReportRequest {
            page: 1,
            athlete: athlete.map(String::from),
            today: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let data = sample_data();
        let report = build_report(&data, &Config::default(), &request(None)).unwrap();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Podium Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("D-5"));
        assert!(markdown.contains("**Total Athletes:** 2"));
        assert!(markdown.contains("Ski 50% · Snowboard 50%"));
        assert!(markdown.contains("### Discipline Ratio"));
        assert!(markdown.contains("*2 of 2 athletes with a known birth date*"));
        assert!(markdown.contains("| Snowboard Park | 75.00 |"));
        assert!(markdown.contains("| 2025-12 | 6.5 |"));
        assert!(markdown.contains("## Top Rankers"));
        assert!(markdown.contains("🥇1"));
        assert!(markdown.contains("## Roster"));
        assert!(markdown.contains("*Page 1 of 1 (3 results)*"));
        assert!(!markdown.contains("## Athlete Profile"));
    }

    #[test]
    fn test_generate_profile_section() {
        let data = sample_data();
        let report = build_report(&data, &Config::default(), &request(Some("9531002"))).unwrap();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("## Athlete Profile: JUNG Donghyun (정동현)"));
        assert!(markdown.contains("- **Age:** 37"));
        assert!(markdown.contains("- **Current Rank:** 41"));
        assert!(markdown.contains("- **Best Rank:** -"));
        assert!(markdown.contains("- **Latest Points:** 20.00"));
    }

    #[test]
    fn test_feed_rows_newest_first() {
        let data = sample_data();
        let report = build_report(&data, &Config::default(), &request(None)).unwrap();
        let feed = generate_feed_section(report.feed.as_ref().unwrap());

        let first = feed.find("2025-12-12").unwrap();
        let second = feed.find("2025-12-01").unwrap();
        let third = feed.find("2025-11-20").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_empty_report() {
        let data = crate::models::AthletesData::default();
        let report = build_report(&data, &Config::default(), &request(None)).unwrap();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("**Total Athletes:** 0"));
        assert!(markdown.contains("No ranked athletes."));
        assert!(markdown.contains("No medalists yet."));
        assert!(markdown.contains("No results on this page."));
    }

    #[test]
    fn test_generate_json_report() {
        let data = sample_data();
        let report = build_report(&data, &Config::default(), &request(None)).unwrap();
        let json = generate_json_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["statistics"]["total_athletes"], 2);
        assert_eq!(value["statistics"]["sport_split"]["snowboard"], 1);
        assert_eq!(value["statistics"]["by_sport"]["Alpine Skiing"], 1);
        assert_eq!(value["metadata"]["reference_year"], 2026);
        assert!(value["statistics"]["success_momentum"].is_array());
    }

    #[test]
    fn test_write_reports() {
        let data = sample_data();
        let report = build_report(&data, &Config::default(), &request(None)).unwrap();
        let temp_dir = TempDir::new().unwrap();

        let md_path = temp_dir.path().join("report.md");
        write_report(&report, &md_path).unwrap();
        assert!(std::fs::read_to_string(&md_path)
            .unwrap()
            .starts_with("# Podium Report"));

        let json_path = temp_dir.path().join("report.json");
        write_json_report(&report, &json_path).unwrap();
        assert!(std::fs::read_to_string(&json_path)
            .unwrap()
            .contains("\"statistics\""));
    }
}
