//! Sport classification rules.
//!
//! Two independent classifiers bucket a raw sport identifier: one for the
//! team-size chart and one for the ski/snowboard split. Each is an ordered
//! rule table evaluated top to bottom; the first matching substring wins.

use crate::models::AthleteRecord;

/// Coarse team bucket used by the team-size chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamBucket {
    Ski,
    Snowboard,
    Skating,
    Ice,
}

impl TeamBucket {
    pub fn label(&self) -> &'static str {
        match self {
            TeamBucket::Ski => "Ski",
            TeamBucket::Snowboard => "Snowboard",
            TeamBucket::Skating => "Skating",
            TeamBucket::Ice => "Ice",
        }
    }
}

/// Bucket used by the ski/snowboard split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitBucket {
    Ski,
    Snowboard,
    Other,
}

/// An ordered list of `(needle, bucket)` rules with a fallback bucket.
#[derive(Debug)]
pub struct RuleTable<B: 'static> {
    pub rules: &'static [(&'static str, B)],
    pub fallback: B,
}

impl<B: Copy> RuleTable<B> {
    /// Classify `sport` by case-insensitive substring match.
    pub fn classify(&self, sport: &str) -> B {
        let sport = sport.to_lowercase();
        self.rules
            .iter()
            .find(|(needle, _)| sport.contains(needle))
            .map(|(_, bucket)| *bucket)
            .unwrap_or(self.fallback)
    }
}

/// "snowboard" has to be tested before "ski"; skating and ice only exist here.
pub const TEAM_RULES: RuleTable<TeamBucket> = RuleTable {
    rules: &[
        ("snowboard", TeamBucket::Snowboard),
        ("ski", TeamBucket::Ski),
        ("skating", TeamBucket::Skating),
        ("ice", TeamBucket::Ice),
    ],
    fallback: TeamBucket::Ski,
};

/// Skating and ice sports land in `Other` for the split.
pub const SPLIT_RULES: RuleTable<SplitBucket> = RuleTable {
    rules: &[
        ("snowboard", SplitBucket::Snowboard),
        ("ski", SplitBucket::Ski),
    ],
    fallback: SplitBucket::Other,
};

pub fn classify_team(sport: &str) -> TeamBucket {
    TEAM_RULES.classify(sport)
}

pub fn classify_split(sport: &str) -> SplitBucket {
    SPLIT_RULES.classify(sport)
}

/// Label shown for an athlete's sport.
///
/// Uses `sport_display` when present and non-empty, then `sport`, and
/// finally `"Unknown"`.
pub fn sport_label(athlete: &AthleteRecord) -> &str {
    match athlete.sport_display.as_deref() {
        Some(display) if !display.is_empty() => display,
        _ if !athlete.sport.is_empty() => &athlete.sport,
        _ => "Unknown",
    }
}

/// Abbreviations for discipline names, checked in order.
const DISCIPLINE_ABBREVIATIONS: &[(&[&str], &str)] = &[
    (&["halfpipe"], "HP"),
    (&["big air"], "BA"),
    (&["slalom", "giant"], "GS"),
    (&["slalom"], "SL"),
    (&["parallel", "giant"], "PGS"),
    (&["parallel", "slalom"], "PSL"),
    (&["snowboard cross"], "SBX"),
    (&["ski cross"], "SX"),
];

/// Short code for a discipline name, or the name itself when none applies.
pub fn short_discipline(text: &str) -> &str {
    let lower = text.to_lowercase();
    DISCIPLINE_ABBREVIATIONS
        .iter()
        .find(|(needles, _)| needles.iter().all(|n| lower.contains(n)))
        .map(|(_, code)| *code)
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_precedence() {
        assert_eq!(classify_team("Snowboard Slalom"), TeamBucket::Snowboard);
        assert_eq!(classify_team("snowboard_cross"), TeamBucket::Snowboard);
        assert_eq!(classify_team("Alpine Skiing"), TeamBucket::Ski);
        assert_eq!(classify_team("Short Track Speed Skating"), TeamBucket::Skating);
        assert_eq!(classify_team("Ice Hockey"), TeamBucket::Ice);
        assert_eq!(classify_team("Biathlon"), TeamBucket::Ski);
        assert_eq!(classify_team(""), TeamBucket::Ski);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        assert_eq!(classify_team("Snowboard Ski Cross"), TeamBucket::Snowboard);
        assert_eq!(classify_team("Ski on ice"), TeamBucket::Ski);
        assert_eq!(classify_team("Ice Skating"), TeamBucket::Skating);
        assert_eq!(classify_split("Snowboard Ski Cross"), SplitBucket::Snowboard);
        assert_eq!(classify_split("ski_snowboard"), SplitBucket::Snowboard);
    }

    #[test]
    fn test_split_is_independent_of_team() {
        assert_eq!(classify_split("SNOWBOARD PARK"), SplitBucket::Snowboard);
        assert_eq!(classify_split("ski_jumping"), SplitBucket::Ski);
        assert_eq!(classify_split("Figure Skating"), SplitBucket::Other);
        assert_eq!(classify_split("Ice Hockey"), SplitBucket::Other);
        // Falls back to Ski for the team chart but Other for the split.
        assert_eq!(classify_team("Biathlon"), TeamBucket::Ski);
        assert_eq!(classify_split("Biathlon"), SplitBucket::Other);
    }

    #[test]
    fn test_sport_label_fallbacks() {
        let mut athlete = AthleteRecord {
            sport: "freestyle_moguls".to_string(),
            sport_display: Some("Moguls".to_string()),
            ..Default::default()
        };
        assert_eq!(sport_label(&athlete), "Moguls");

        athlete.sport_display = Some(String::new());
        assert_eq!(sport_label(&athlete), "freestyle_moguls");

        athlete.sport_display = None;
        athlete.sport = String::new();
        assert_eq!(sport_label(&athlete), "Unknown");
    }

    #[test]
    fn test_short_discipline() {
        assert_eq!(short_discipline("Men's Halfpipe"), "HP");
        assert_eq!(short_discipline("Giant Slalom"), "GS");
        assert_eq!(short_discipline("Slalom"), "SL");
        assert_eq!(short_discipline("Snowboard Cross"), "SBX");
        assert_eq!(short_discipline("Moguls"), "Moguls");
    }
}
