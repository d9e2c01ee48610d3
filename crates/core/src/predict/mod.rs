pub mod describe;
pub mod features;

use std::fmt;

use crate::domain::prediction::{MatchupStats, Prediction};
use crate::domain::team::TeamTable;
use features::FeatureVector;

/// Linear-model weights. Constructed once at startup and passed in; the
/// scoring path never reads the environment itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionWeights {
    pub runs_weight: f64,
    pub ops_weight: f64,
    pub obp_weight: f64,
    pub earned_runs_weight: f64,
    pub win_pct_weight: f64,
    /// Accepted as a recognized option for configuration compatibility;
    /// no scoring term reads it.
    pub home_advantage_weight: f64,
    /// Accepted for compatibility; no scoring term reads it.
    pub home_away_weight: f64,
}

impl Default for PredictionWeights {
    fn default() -> Self {
        Self {
            runs_weight: 0.15,
            ops_weight: 0.2,
            obp_weight: 0.2,
            earned_runs_weight: 0.15,
            win_pct_weight: 0.1,
            home_advantage_weight: 0.15,
            home_away_weight: 0.2,
        }
    }
}

impl PredictionWeights {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        read_weight("RUNS_WEIGHT", &mut out.runs_weight);
        read_weight("OPS_WEIGHT", &mut out.ops_weight);
        read_weight("OBP_WEIGHT", &mut out.obp_weight);
        read_weight("EARNED_RUNS_WEIGHT", &mut out.earned_runs_weight);
        read_weight("WIN_PCT_WEIGHT", &mut out.win_pct_weight);
        read_weight("HOME_ADVANTAGE_WEIGHT", &mut out.home_advantage_weight);
        read_weight("HOME_AWAY_WEIGHT", &mut out.home_away_weight);

        out
    }
}

fn read_weight(var: &str, slot: &mut f64) {
    if let Ok(s) = std::env::var(var) {
        if let Ok(v) = s.parse::<f64>() {
            *slot = v;
        }
    }
}

/// The only failure the scoring path can signal: a bad, missing, equal or
/// unknown team name. Always recoverable by picking different teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTeamSelection {
    pub detail: String,
}

impl fmt::Display for InvalidTeamSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid team selection: {}", self.detail)
    }
}

impl std::error::Error for InvalidTeamSelection {}

fn invalid(detail: impl Into<String>) -> InvalidTeamSelection {
    InvalidTeamSelection {
        detail: detail.into(),
    }
}

/// Scores one matchup. Pure and deterministic: identical inputs produce
/// bit-identical output, and the table is only read.
pub fn score(
    home_team: &str,
    away_team: &str,
    table: &TeamTable,
    weights: &PredictionWeights,
) -> Result<Prediction, InvalidTeamSelection> {
    if home_team.is_empty() || away_team.is_empty() {
        return Err(invalid("both teams must be selected"));
    }
    if home_team == away_team {
        return Err(invalid("home and away team must differ"));
    }

    let home = table
        .get(home_team)
        .ok_or_else(|| invalid(format!("unknown team: {home_team}")))?;
    let away = table
        .get(away_team)
        .ok_or_else(|| invalid(format!("unknown team: {away_team}")))?;

    let f = FeatureVector::extract(&home.stats, &away.stats);

    let weighted_sum = f.runs * weights.runs_weight
        + f.hits * 0.1
        + f.rbi * 0.1
        + f.strikeouts * 0.05
        + f.obp * weights.obp_weight
        + f.ops * weights.ops_weight
        + f.lob * 0.05
        + f.walks * 0.05
        + f.earned_runs * weights.earned_runs_weight
        + f.win_pct * weights.win_pct_weight;
    let win_probability = (0.5 + weighted_sum).clamp(0.1, 0.9);

    // Confidence grows with the absolute disparity, from a 0.6 floor.
    let disparity = f.runs.abs() * 0.1
        + f.hits.abs() * 0.1
        + f.rbi.abs() * 0.1
        + f.strikeouts.abs() * 0.05
        + f.obp.abs() * 0.15
        + f.ops.abs() * 0.15
        + f.lob.abs() * 0.05
        + f.walks.abs() * 0.05
        + f.earned_runs.abs() * 0.1
        + f.win_pct.abs() * 0.15;
    let confidence = (0.6 + disparity).min(0.9);

    let description = describe::prediction(win_probability, home_team, away_team, &home.stats, &away.stats);
    let confidence_description = describe::confidence(confidence).to_string();

    Ok(Prediction {
        win_probability,
        confidence,
        stats: MatchupStats {
            home: home.stats,
            away: away.stats,
        },
        description,
        confidence_description,
    })
}
