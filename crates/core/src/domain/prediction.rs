use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::team::TeamStats;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchupStats {
    pub home: TeamStats,
    pub away: TeamStats,
}

/// Scored outcome for one home/away pairing. Created fresh per query and
/// never mutated; safe to cache by the `(home, away)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Probability that the home team wins, clamped to 0.1..=0.9.
    pub win_probability: f64,
    /// Magnitude of the statistical disparity between the teams, 0.6..=0.9.
    pub confidence: f64,
    pub stats: MatchupStats,
    pub description: String,
    pub confidence_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFixture {
    pub home_team: String,
    pub away_team: String,
    pub prediction: Prediction,
    pub game_time: DateTime<Utc>,
    pub venue: String,
    pub status: String,
}
