pub mod types;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::time::Duration;

use crate::config::Settings;
use crate::domain::prediction::GameFixture;
use crate::domain::team::TeamTable;
use crate::predict::{self, PredictionWeights};
use types::{ScheduleResponse, ScheduledGame};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: u32 = 3;
// sportId=1 is the major league in the public stats feed.
const SPORT_ID: &str = "1";

#[async_trait::async_trait]
pub trait ScheduleProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_schedule(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>>;
}

#[derive(Debug, Clone)]
pub struct StatsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    retries: u32,
}

impl StatsApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_schedule_base_url()?.to_string();
        let api_key = settings.schedule_api_key.clone();

        let timeout_secs = std::env::var("SCHEDULE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("SCHEDULE_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build schedule http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            retries,
        })
    }

    fn url(&self) -> String {
        format!("{}/schedule", self.base_url.trim_end_matches('/'))
    }

    async fn fetch_once(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>> {
        let mut req = self
            .http
            .get(self.url())
            .query(&[("sportId", SPORT_ID.to_string()), ("date", date.to_string())]);
        if let Some(api_key) = &self.api_key {
            req = req.bearer_auth(api_key);
        }

        let res = req.send().await.context("schedule request failed")?;
        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read schedule response")?;

        if !status.is_success() {
            anyhow::bail!("schedule API HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<ScheduleResponse>(&text)
            .with_context(|| format!("schedule response is not valid JSON: {text}"))?;
        extract_games(parsed, date)
    }
}

#[async_trait::async_trait]
impl ScheduleProvider for StatsApiClient {
    fn provider_name(&self) -> &'static str {
        "mlb_stats_api"
    }

    async fn fetch_schedule(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(date).await {
                Ok(games) => return Ok(games),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, error = %err, "schedule fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

fn extract_games(response: ScheduleResponse, expected: NaiveDate) -> Result<Vec<ScheduledGame>> {
    let Some(day) = response.dates.into_iter().next() else {
        // An empty slate is a valid answer (off-day).
        return Ok(Vec::new());
    };

    anyhow::ensure!(
        day.date == expected,
        "schedule date mismatch: expected {expected}, got {}",
        day.date
    );

    Ok(day.games)
}

/// Scores every scheduled game whose teams are both covered by the table;
/// games against uncovered teams are skipped rather than failed.
pub fn fixtures_from_schedule(
    games: Vec<ScheduledGame>,
    table: &TeamTable,
    weights: &PredictionWeights,
) -> Vec<GameFixture> {
    let mut out = Vec::with_capacity(games.len());
    for game in games {
        let home = game.teams.home.team.name;
        let away = game.teams.away.team.name;

        let prediction = match predict::score(&home, &away, table, weights) {
            Ok(p) => p,
            Err(err) => {
                tracing::debug!(%home, %away, error = %err, "skipping game without table coverage");
                continue;
            }
        };

        out.push(GameFixture {
            home_team: home,
            away_team: away,
            prediction,
            game_time: game.game_date,
            venue: game
                .venue
                .and_then(|v| v.name)
                .unwrap_or_else(|| "Unknown Venue".to_string()),
            status: game
                .status
                .and_then(|s| s.detailed_state)
                .unwrap_or_else(|| "Scheduled".to_string()),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::TeamTable;
    use serde_json::json;

    fn schedule_json(date: &str) -> serde_json::Value {
        json!({
            "totalGames": 2,
            "dates": [
                {
                    "date": date,
                    "games": [
                        {
                            "gamePk": 745123,
                            "gameDate": format!("{date}T18:10:00Z"),
                            "teams": {
                                "home": {"team": {"id": 119, "name": "Los Angeles Dodgers"}},
                                "away": {"team": {"id": 146, "name": "Miami Marlins"}}
                            },
                            "venue": {"name": "Dodger Stadium"},
                            "status": {"detailedState": "Scheduled"}
                        },
                        {
                            "gamePk": 745124,
                            "gameDate": format!("{date}T23:05:00Z"),
                            "teams": {
                                "home": {"team": {"id": 147, "name": "New York Yankees"}},
                                "away": {"team": {"id": 999, "name": "Sacramento River Cats"}}
                            }
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn parses_the_public_feed_shape() {
        let parsed: ScheduleResponse = serde_json::from_value(schedule_json("2026-06-01")).unwrap();
        assert_eq!(parsed.dates.len(), 1);

        let games = &parsed.dates[0].games;
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].teams.home.team.name, "Los Angeles Dodgers");
        assert_eq!(
            games[0].venue.as_ref().and_then(|v| v.name.as_deref()),
            Some("Dodger Stadium")
        );
        // Optional blocks may be absent entirely.
        assert!(games[1].venue.is_none());
        assert!(games[1].status.is_none());
    }

    #[test]
    fn extract_rejects_a_mismatched_date() {
        let parsed: ScheduleResponse = serde_json::from_value(schedule_json("2026-06-02")).unwrap();
        let expected = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert!(extract_games(parsed, expected).is_err());
    }

    #[test]
    fn extract_treats_an_empty_feed_as_an_off_day() {
        let parsed: ScheduleResponse = serde_json::from_value(json!({"dates": []})).unwrap();
        let expected = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert_eq!(extract_games(parsed, expected).unwrap().len(), 0);
    }

    #[test]
    fn fixtures_skip_games_outside_table_coverage() {
        let table = TeamTable::builtin().unwrap();
        let weights = PredictionWeights::default();
        let parsed: ScheduleResponse = serde_json::from_value(schedule_json("2026-06-01")).unwrap();
        let expected = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let games = extract_games(parsed, expected).unwrap();

        let fixtures = fixtures_from_schedule(games, &table, &weights);
        // The River Cats matchup has no table coverage and is dropped.
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].home_team, "Los Angeles Dodgers");
        assert_eq!(fixtures[0].venue, "Dodger Stadium");
        assert_eq!(fixtures[0].status, "Scheduled");
        assert!(fixtures[0].prediction.win_probability > 0.5);
    }

    #[test]
    fn fixtures_default_missing_venue_and_status() {
        let table = TeamTable::builtin().unwrap();
        let weights = PredictionWeights::default();
        let v = json!({
            "dates": [{
                "date": "2026-06-01",
                "games": [{
                    "gameDate": "2026-06-01T20:15:00Z",
                    "teams": {
                        "home": {"team": {"id": 117, "name": "Houston Astros"}},
                        "away": {"team": {"id": 136, "name": "Seattle Mariners"}}
                    }
                }]
            }]
        });
        let parsed: ScheduleResponse = serde_json::from_value(v).unwrap();
        let games = extract_games(parsed, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()).unwrap();

        let fixtures = fixtures_from_schedule(games, &table, &weights);
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].venue, "Unknown Venue");
        assert_eq!(fixtures[0].status, "Scheduled");
    }
}
