use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BUILTIN_TEAMS_JSON: &str = include_str!("builtin_teams.json");

/// One team's season aggregate. Wire field names are fixed (`winPct`,
/// `homeWinPct`, ...) for compatibility with existing dashboard clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub r: f64,
    pub h: f64,
    pub rbi: f64,
    pub so: f64,
    pub obp: f64,
    pub ops: f64,
    /// Runners left on base per game, roughly 0..5 — not a 0..1 rate.
    pub lob: f64,
    pub bb: f64,
    pub er: f64,
    pub win_pct: f64,
    pub home_win_pct: f64,
    pub away_win_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub stats: TeamStats,
}

/// Immutable name -> team mapping. Built once at startup and passed into the
/// scoring path; replaced wholesale if the season data is ever regenerated.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct TeamTable {
    teams: BTreeMap<String, Team>,
}

impl TeamTable {
    pub fn from_teams(teams: BTreeMap<String, Team>) -> anyhow::Result<Self> {
        ensure!(!teams.is_empty(), "team table must not be empty");
        for (name, team) in &teams {
            validate_team(name, team)?;
        }
        Ok(Self { teams })
    }

    /// The bundled season table, used whenever no fresher source is wired in.
    pub fn builtin() -> anyhow::Result<Self> {
        let teams: BTreeMap<String, Team> = serde_json::from_str(BUILTIN_TEAMS_JSON)
            .context("bundled team table is not valid JSON")?;
        Self::from_teams(teams)
    }

    /// Lookup by exact name ("St. Louis Cardinals", not "st louis cardinals").
    pub fn get(&self, name: &str) -> Option<&Team> {
        self.teams.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.teams.contains_key(name)
    }

    /// Team names in ascending order.
    pub fn names(&self) -> Vec<String> {
        self.teams.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Team> {
        &self.teams
    }
}

fn validate_team(name: &str, team: &Team) -> anyhow::Result<()> {
    ensure!(!name.trim().is_empty(), "team name must be non-empty");

    let s = &team.stats;
    for (label, value) in [
        ("r", s.r),
        ("h", s.h),
        ("rbi", s.rbi),
        ("so", s.so),
        ("lob", s.lob),
        ("bb", s.bb),
        ("er", s.er),
    ] {
        ensure!(
            value.is_finite() && value >= 0.0,
            "{name}: {label} must be a non-negative number (got {value})"
        );
    }

    for (label, value) in [
        ("obp", s.obp),
        ("ops", s.ops),
        ("winPct", s.win_pct),
        ("homeWinPct", s.home_win_pct),
        ("awayWinPct", s.away_win_pct),
    ] {
        ensure!(
            (0.0..=1.0).contains(&value),
            "{name}: {label} must be within 0..=1 (got {value})"
        );
    }

    Ok(())
}
