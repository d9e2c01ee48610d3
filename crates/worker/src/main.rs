use anyhow::Context;
use chrono::Datelike;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pennant_core::config::Settings;
use pennant_core::domain::prediction::GameFixture;
use pennant_core::domain::team::TeamTable;
use pennant_core::predict::PredictionWeights;
use pennant_core::schedule::{fixtures_from_schedule, ScheduleProvider, StatsApiClient};
use pennant_core::time::game_day::resolve_game_date;

mod picks;

#[derive(Debug, Parser)]
#[command(name = "pennant_worker")]
struct Args {
    /// Game date (YYYY-MM-DD). Defaults to today's US Eastern date.
    #[arg(long)]
    date: Option<String>,

    /// Skip the live schedule and build a sample slate.
    #[arg(long)]
    sample: bool,

    /// Print the ranked picks as JSON instead of log lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let date = resolve_game_date(args.date.as_deref(), chrono::Utc::now())?;
    let table = TeamTable::builtin().context("failed to load the team table")?;
    let weights = PredictionWeights::from_env();

    let fixtures = build_fixtures(args.sample, &settings, &table, &weights, date).await;
    let ranked = picks::rank_fixtures(fixtures);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    tracing::info!(%date, picks = ranked.len(), "ranked picks for the slate");
    for (i, game) in ranked.iter().enumerate() {
        tracing::info!(
            rank = i + 1,
            home = %game.home_team,
            away = %game.away_team,
            win_probability = game.prediction.win_probability,
            confidence = game.prediction.confidence,
            "{}",
            game.prediction.description
        );
    }

    Ok(())
}

async fn build_fixtures(
    sample_only: bool,
    settings: &Settings,
    table: &TeamTable,
    weights: &PredictionWeights,
    date: chrono::NaiveDate,
) -> Vec<GameFixture> {
    if !sample_only {
        match StatsApiClient::from_settings(settings) {
            Ok(client) => match client.fetch_schedule(date).await {
                Ok(games) => {
                    let fixtures = fixtures_from_schedule(games, table, weights);
                    if !fixtures.is_empty() {
                        return fixtures;
                    }
                    tracing::warn!(%date, "no scorable games on the live schedule; using a sample slate");
                }
                Err(err) => {
                    sentry_anyhow::capture_anyhow(&err);
                    tracing::error!(%date, error = %err, "schedule fetch failed; using a sample slate");
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "schedule feed not configured; using a sample slate");
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(date.num_days_from_ce() as u64);
    pennant_core::sample::sample_games(table, weights, date, &mut rng)
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
