//! Core types for the Playlens pipeline
//!
//! This module defines the data structures that flow through each stage:
//! owned-title records from the gateway, the per-title achievement
//! breakdown and library summary produced by the aggregator, and the
//! four-axis profile produced by the classifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single owned title in a player's library, as reported by the
/// ownership endpoint. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRecord {
    /// Steam application id
    pub app_id: u64,
    /// Display name; `App {app_id}` when the service omits one
    pub name: String,
    /// Lifetime playtime in minutes
    pub playtime_minutes: u64,
}

/// The full achievement catalog a title defines, independent of any
/// player's progress. Absent entirely for titles without achievements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementSchema {
    pub app_id: u64,
    /// Ordered achievement keys; total count = `definitions.len()`
    pub definitions: Vec<String>,
}

/// One player's unlock flag per achievement key for a single title.
pub type AchievementUnlockState = HashMap<String, bool>;

/// Per-title achievement completion, produced only when both the schema
/// and the player's unlock state are present and the title defines at
/// least one achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementBreakdown {
    pub app_id: u64,
    pub name: String,
    pub total_achievements: u32,
    pub unlocked: u32,
    /// `unlocked / total * 100`, rounded to 2 decimals
    pub completion_percent: f64,
}

impl AchievementBreakdown {
    /// Build a breakdown from raw counts, computing the completion
    /// percentage. Returns `None` when the counts violate the
    /// `unlocked <= total` contract or the title has no achievements.
    pub fn from_counts(app_id: u64, name: String, total: u32, unlocked: u32) -> Option<Self> {
        if total == 0 || unlocked > total {
            return None;
        }
        Some(Self {
            app_id,
            name,
            total_achievements: total,
            unlocked,
            completion_percent: round2(f64::from(unlocked) / f64::from(total) * 100.0),
        })
    }
}

/// Scalar summary statistics over a player's whole library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrarySummary {
    pub player_name: String,
    pub player_level: u32,
    /// Total playtime in hours, rounded to 1 decimal
    pub total_hours: f64,
    /// Count of titles with any recorded playtime
    pub titles_played: u32,
    /// Unlocked / total across all contributing titles, as a percentage
    /// rounded to 2 decimals. Weighted by achievement count, never the
    /// mean of per-title percentages. `None` when no title contributed.
    pub overall_completion_percent: Option<f64>,
}

/// Outcome of one classification axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisResult {
    /// Single-letter tag, or `-` when undetermined
    pub code: char,
    /// Natural-language justification interpolating the numbers that
    /// drove the decision. Part of the contract, not incidental logging.
    pub reason: String,
    /// Confidence in [0, 1]
    pub score: f64,
}

/// The four axis results, in fixed evaluation order. Field order is the
/// serialization order, so the JSON object is a stable ordered mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAxes {
    #[serde(rename = "Progression Style")]
    pub progression: AxisResult,
    #[serde(rename = "Challenge Nature")]
    pub challenge: AxisResult,
    #[serde(rename = "Social Orientation")]
    pub social: AxisResult,
    #[serde(rename = "Rhythm / Engagement")]
    pub rhythm: AxisResult,
}

/// Composite behavioral profile: the four-letter type code plus the
/// per-axis results it was concatenated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResult {
    /// Progression, Challenge, Social, Rhythm codes in that order
    #[serde(rename = "type")]
    pub type_code: String,
    pub axes: ProfileAxes,
}

/// Envelope emitted by the CLI: one complete profiling run with
/// provenance timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    pub computed_at: DateTime<Utc>,
    pub player_id: String,
    pub summary: LibrarySummary,
    pub breakdown: Vec<AchievementBreakdown>,
    pub profile: ProfileResult,
}

/// Round to 1 decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to 2 decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_breakdown_from_counts() {
        let b = AchievementBreakdown::from_counts(620, "Portal 2".to_string(), 51, 17).unwrap();
        assert_eq!(b.total_achievements, 51);
        assert_eq!(b.unlocked, 17);
        assert_eq!(b.completion_percent, 33.33);
    }

    #[test]
    fn test_breakdown_rejects_invalid_counts() {
        // unlocked > total violates the contract
        assert!(AchievementBreakdown::from_counts(1, "Broken".to_string(), 5, 6).is_none());
        // a title with no achievements never produces a breakdown
        assert!(AchievementBreakdown::from_counts(2, "No cheevos".to_string(), 0, 0).is_none());
    }

    #[test]
    fn test_breakdown_bounds() {
        let zero = AchievementBreakdown::from_counts(3, "Fresh".to_string(), 30, 0).unwrap();
        assert_eq!(zero.completion_percent, 0.0);

        let full = AchievementBreakdown::from_counts(4, "Done".to_string(), 30, 30).unwrap();
        assert_eq!(full.completion_percent, 100.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round1(1234.0 / 60.0), 20.6);
        assert_eq!(round2(1.0 / 3.0 * 100.0), 33.33);
        assert_eq!(round2(2.0 / 12.0 * 100.0), 16.67);
    }

    #[test]
    fn test_profile_axes_serialize_with_original_names() {
        let axis = AxisResult {
            code: '-',
            reason: "n/a".to_string(),
            score: 0.5,
        };
        let axes = ProfileAxes {
            progression: axis.clone(),
            challenge: axis.clone(),
            social: axis.clone(),
            rhythm: axis,
        };
        let json = serde_json::to_value(&axes).unwrap();
        assert!(json.get("Progression Style").is_some());
        assert!(json.get("Rhythm / Engagement").is_some());
    }
}
