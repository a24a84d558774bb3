//! Four-axis behavioral classification
//!
//! Pure, deterministic rule evaluation over the aggregator's output. Each
//! axis is an independent fixed decision table producing a single-letter
//! code, a justification string carrying the numbers that drove the
//! decision, and a confidence score. The four codes concatenate into the
//! player's profile type code.
//!
//! The keyword tables are versioned static configuration, preserved
//! verbatim from the classification rules this engine ships with — they
//! are never inferred from the API, so classification stays reproducible.

use crate::types::{AchievementBreakdown, AxisResult, LibrarySummary, ProfileAxes, ProfileResult};

/// Version of the static rule tables below. Bump when a keyword list or
/// threshold changes.
pub const TABLES_VERSION: u32 = 1;

/// Story-oriented titles (Challenge axis, code `S`)
pub const STORY_TITLES: &[&str] = &[
    "Life is Strange",
    "The Witcher 3",
    "Assassin's Creed",
    "Little Nightmares",
];

/// Mechanically-demanding titles (Challenge axis, code `M`)
pub const MECHANICAL_TITLES: &[&str] = &["Hades", "Celeste", "Dark Souls", "Monster Hunter"];

/// Exploration-oriented titles (Challenge axis, code `E`)
pub const EXPLORATION_TITLES: &[&str] = &[
    "Skyrim",
    "Subnautica",
    "No Man's Sky",
    "Zelda",
    "Hollow Knight",
];

/// Cooperative multiplayer titles (Social axis, code `T`)
pub const COOP_TITLES: &[&str] = &[
    "Left 4 Dead",
    "Warframe",
    "PAYDAY 2",
    "Deep Rock Galactic",
];

/// Competitive / PvP titles (Social axis, code `C`)
pub const COMPETITIVE_TITLES: &[&str] = &[
    "Counter-Strike",
    "Paladins",
    "PUBG",
    "Apex Legends",
    "Dota",
];

/// Classify a player's aggregated statistics into the four-axis profile.
///
/// Pure function: no I/O, and identical inputs always produce an
/// identical `ProfileResult`, reason strings included.
pub fn classify(summary: &LibrarySummary, breakdown: &[AchievementBreakdown]) -> ProfileResult {
    let axes = ProfileAxes {
        progression: progression_axis(summary, breakdown),
        challenge: challenge_axis(breakdown),
        social: social_axis(breakdown),
        rhythm: rhythm_axis(summary, breakdown),
    };

    let type_code = format!(
        "{}{}{}{}",
        axes.progression.code, axes.challenge.code, axes.social.code, axes.rhythm.code
    );

    ProfileResult { type_code, axes }
}

/// Axis 1 — Progression Style: completionist (`C`), casual finisher
/// (`F`), or no dominant signal (`-`).
fn progression_axis(summary: &LibrarySummary, breakdown: &[AchievementBreakdown]) -> AxisResult {
    let high_completion = breakdown
        .iter()
        .filter(|entry| entry.completion_percent >= 80.0)
        .count();
    // Absent overall completion counts as zero for this rule
    let overall = summary.overall_completion_percent.unwrap_or(0.0);

    if high_completion >= 3 {
        AxisResult {
            code: 'C',
            reason: format!("{high_completion} titles with at least 80% achievement completion."),
            score: 1.0,
        }
    } else if overall < 30.0 {
        AxisResult {
            code: 'F',
            reason: format!("Overall achievement completion below 30% ({overall}%)."),
            score: 0.3,
        }
    } else {
        AxisResult {
            code: '-',
            reason: format!("No dominant progression signal (overall = {overall}%)."),
            score: 0.5,
        }
    }
}

/// Axis 2 — Challenge Nature: story (`S`), mechanical (`M`), exploration
/// (`E`), or no clear tendency (`-`). Priority S > M > E when several
/// tables match.
fn challenge_axis(breakdown: &[AchievementBreakdown]) -> AxisResult {
    let story = first_match(breakdown, STORY_TITLES, 20.0);
    let mechanical = first_match(breakdown, MECHANICAL_TITLES, 20.0);
    let exploration = first_match(breakdown, EXPLORATION_TITLES, 20.0);

    if let Some(entry) = story {
        AxisResult {
            code: 'S',
            reason: format!(
                "Meaningful progress in story-driven titles ({} at {}%).",
                entry.name, entry.completion_percent
            ),
            score: 0.6,
        }
    } else if let Some(entry) = mechanical {
        AxisResult {
            code: 'M',
            reason: format!(
                "Progress in mechanically demanding titles ({} at {}%).",
                entry.name, entry.completion_percent
            ),
            score: 0.6,
        }
    } else if let Some(entry) = exploration {
        AxisResult {
            code: 'E',
            reason: format!(
                "Progress in exploration-driven titles ({} at {}%).",
                entry.name, entry.completion_percent
            ),
            score: 0.6,
        }
    } else {
        AxisResult {
            code: '-',
            reason: "No clear challenge tendency detected.".to_string(),
            score: 0.3,
        }
    }
}

/// Axis 3 — Social Orientation: cooperative (`T`), competitive (`C`), or
/// lone player (`L`). Priority coop > competitive > no signal.
fn social_axis(breakdown: &[AchievementBreakdown]) -> AxisResult {
    let coop = first_match(breakdown, COOP_TITLES, 10.0);
    let competitive = first_match(breakdown, COMPETITIVE_TITLES, 5.0);
    let solo = coop.is_none() && competitive.is_none();

    if let Some(entry) = coop {
        AxisResult {
            code: 'T',
            reason: format!(
                "Cooperative multiplayer progress ({} at {}%).",
                entry.name, entry.completion_percent
            ),
            score: 0.7,
        }
    } else if let Some(entry) = competitive {
        AxisResult {
            code: 'C',
            reason: format!(
                "Competitive or PvP progress ({} at {}%).",
                entry.name, entry.completion_percent
            ),
            score: 0.6,
        }
    } else if solo {
        AxisResult {
            code: 'L',
            reason: "No multiplayer achievement signal visible.".to_string(),
            score: 0.2,
        }
    } else {
        // Unreachable by construction: `solo` is the complement of the
        // two branches above. Kept as a defensive default.
        AxisResult {
            code: '-',
            reason: "Multiplayer data non-interpretable.".to_string(),
            score: 0.3,
        }
    }
}

/// Axis 4 — Rhythm / Engagement: heavy (`H`), balanced (`B`), or dabbling
/// (`D`), driven by total hours and the count of actively progressed
/// titles.
fn rhythm_axis(summary: &LibrarySummary, breakdown: &[AchievementBreakdown]) -> AxisResult {
    let high_play = breakdown
        .iter()
        .filter(|entry| entry.completion_percent > 30.0)
        .count();
    let total_hours = summary.total_hours;

    if total_hours > 2000.0 && high_play >= 5 {
        AxisResult {
            code: 'H',
            reason: format!(
                "{total_hours}h total with steady achievement progress across {high_play} titles."
            ),
            score: 1.0,
        }
    } else if total_hours > 500.0 {
        AxisResult {
            code: 'B',
            reason: format!("Moderate activity ({total_hours}h played)."),
            score: 0.7,
        }
    } else {
        AxisResult {
            code: 'D',
            reason: format!("Few titles played or completed ({total_hours}h)."),
            score: 0.3,
        }
    }
}

/// First breakdown entry whose name contains one of the keywords
/// (case-sensitive substring) and whose completion percent exceeds the
/// gate.
fn first_match<'a>(
    breakdown: &'a [AchievementBreakdown],
    keywords: &[&str],
    gate: f64,
) -> Option<&'a AchievementBreakdown> {
    breakdown.iter().find(|entry| {
        entry.completion_percent > gate && keywords.iter().any(|key| entry.name.contains(key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_summary(total_hours: f64, overall: Option<f64>) -> LibrarySummary {
        LibrarySummary {
            player_name: "gordon".to_string(),
            player_level: 12,
            total_hours,
            titles_played: 10,
            overall_completion_percent: overall,
        }
    }

    fn make_entry(name: &str, completion_percent: f64) -> AchievementBreakdown {
        AchievementBreakdown {
            app_id: 1,
            name: name.to_string(),
            total_achievements: 100,
            unlocked: completion_percent as u32,
            completion_percent,
        }
    }

    #[test]
    fn test_progression_completionist() {
        let summary = make_summary(100.0, Some(10.0));
        let breakdown = vec![
            make_entry("A", 85.0),
            make_entry("B", 92.0),
            make_entry("C", 80.0),
        ];

        let axis = progression_axis(&summary, &breakdown);
        assert_eq!(axis.code, 'C');
        assert_eq!(axis.score, 1.0);
        // Overall completion is irrelevant once three titles are >= 80%
        assert!(axis.reason.contains('3'));
    }

    #[test]
    fn test_progression_low_overall() {
        let summary = make_summary(100.0, Some(12.5));
        let axis = progression_axis(&summary, &[make_entry("A", 85.0)]);
        assert_eq!(axis.code, 'F');
        assert_eq!(axis.score, 0.3);
        assert!(axis.reason.contains("12.5"));
    }

    #[test]
    fn test_progression_absent_overall_counts_as_zero() {
        let summary = make_summary(100.0, None);
        let axis = progression_axis(&summary, &[]);
        assert_eq!(axis.code, 'F');
    }

    #[test]
    fn test_progression_undetermined() {
        let summary = make_summary(100.0, Some(45.0));
        let axis = progression_axis(&summary, &[]);
        assert_eq!(axis.code, '-');
        assert_eq!(axis.score, 0.5);
    }

    #[test]
    fn test_challenge_story_has_priority() {
        let breakdown = vec![
            make_entry("Hades", 50.0),
            make_entry("The Witcher 3: Wild Hunt", 40.0),
            make_entry("Subnautica", 60.0),
        ];

        let axis = challenge_axis(&breakdown);
        assert_eq!(axis.code, 'S');
        assert_eq!(axis.score, 0.6);
        assert!(axis.reason.contains("The Witcher 3"));
    }

    #[test]
    fn test_challenge_gate_excludes_low_completion() {
        // Name matches the story table but the 20% gate is not cleared
        let breakdown = vec![make_entry("Life is Strange", 15.0)];
        let axis = challenge_axis(&breakdown);
        assert_eq!(axis.code, '-');
        assert_eq!(axis.score, 0.3);
    }

    #[test]
    fn test_challenge_substring_is_case_sensitive() {
        let breakdown = vec![make_entry("the witcher 3", 90.0)];
        assert_eq!(challenge_axis(&breakdown).code, '-');
    }

    #[test]
    fn test_challenge_mechanical_and_exploration() {
        let mechanical = vec![make_entry("Dark Souls III", 35.0)];
        assert_eq!(challenge_axis(&mechanical).code, 'M');

        let exploration = vec![make_entry("Hollow Knight", 25.0)];
        assert_eq!(challenge_axis(&exploration).code, 'E');
    }

    #[test]
    fn test_social_coop_beats_competitive() {
        let breakdown = vec![
            make_entry("Counter-Strike 2", 50.0),
            make_entry("Deep Rock Galactic", 30.0),
        ];

        let axis = social_axis(&breakdown);
        assert_eq!(axis.code, 'T');
        assert_eq!(axis.score, 0.7);
    }

    #[test]
    fn test_social_competitive_gate() {
        // 5% gate for competitive, 10% for coop
        let breakdown = vec![
            make_entry("Dota 2", 6.0),
            make_entry("Warframe", 8.0),
        ];

        let axis = social_axis(&breakdown);
        assert_eq!(axis.code, 'C');
        assert_eq!(axis.score, 0.6);
    }

    #[test]
    fn test_social_lone_player_default() {
        let axis = social_axis(&[make_entry("Stardew Valley", 80.0)]);
        assert_eq!(axis.code, 'L');
        assert_eq!(axis.score, 0.2);
    }

    #[test]
    fn test_rhythm_heavy() {
        let summary = make_summary(2500.0, Some(40.0));
        let breakdown: Vec<_> = (0..6).map(|i| make_entry(&format!("T{i}"), 45.0)).collect();

        let axis = rhythm_axis(&summary, &breakdown);
        assert_eq!(axis.code, 'H');
        assert_eq!(axis.score, 1.0);
        assert!(axis.reason.contains("2500"));
        assert!(axis.reason.contains('6'));
    }

    #[test]
    fn test_rhythm_falls_back_on_hours_alone() {
        // 2500h but only 2 actively progressed titles: B, since 2500 > 500
        let summary = make_summary(2500.0, Some(40.0));
        let breakdown = vec![make_entry("A", 45.0), make_entry("B", 55.0)];
        assert_eq!(rhythm_axis(&summary, &breakdown).code, 'B');

        let light = make_summary(120.0, None);
        assert_eq!(rhythm_axis(&light, &[]).code, 'D');
    }

    #[test]
    fn test_classify_concatenates_codes_in_order() {
        let summary = make_summary(600.0, Some(45.0));
        let breakdown = vec![
            make_entry("The Witcher 3", 40.0),
            make_entry("Warframe", 30.0),
        ];

        let profile = classify(&summary, &breakdown);
        assert_eq!(profile.type_code, "-STB");
        assert_eq!(profile.axes.progression.code, '-');
        assert_eq!(profile.axes.challenge.code, 'S');
        assert_eq!(profile.axes.social.code, 'T');
        assert_eq!(profile.axes.rhythm.code, 'B');
    }

    #[test]
    fn test_classify_is_deterministic() {
        let summary = make_summary(2500.0, Some(28.0));
        let breakdown = vec![
            make_entry("Celeste", 95.0),
            make_entry("Hades", 88.0),
            make_entry("Dark Souls", 81.0),
            make_entry("PAYDAY 2", 33.0),
            make_entry("Dota 2", 12.0),
            make_entry("Skyrim", 47.0),
        ];

        let first = classify(&summary, &breakdown);
        let second = classify(&summary, &breakdown);
        assert_eq!(first, second);
        assert_eq!(first.type_code, "CMTH");
    }
}
