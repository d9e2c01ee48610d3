use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Shape of the public schedule feed. Only the fields the dashboard needs are
/// modeled; everything else in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDate {
    pub date: NaiveDate,
    #[serde(default)]
    pub games: Vec<ScheduledGame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGame {
    pub game_date: DateTime<Utc>,
    pub teams: GameTeams,
    #[serde(default)]
    pub venue: Option<Venue>,
    #[serde(default)]
    pub status: Option<GameStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameTeams {
    pub home: GameSide,
    pub away: GameSide,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSide {
    pub team: TeamRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    #[serde(default)]
    pub detailed_state: Option<String>,
}
