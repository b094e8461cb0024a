//! Headless Raven arena.
//!
//! Builds an arena from environment configuration, lets the bots fight for
//! a fixed number of ticks, and prints the final scoreboard as JSON on
//! stdout. Logs go to stderr and to a per-session log file.
//!
//! ```bash
//! RAVEN_BOTS=6 RAVEN_TEAM_MODE=1 RAVEN_TICKS=7200 cargo run -p raven-cli
//! ```
mod arena;
mod config;
mod logging;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use raven_content::{TunableTable, TunablesLoader};
use raven_core::{ScoreEntry, World};
use raven_runtime::{CombatEvent, Event, Runtime, RuntimeConfig, Topic};

use config::CliConfig;

/// Ticks between progress lines in the log.
const PROGRESS_EVERY: u64 = 600;

#[derive(Serialize)]
struct MatchReport {
    session: Option<String>,
    seed: u64,
    ticks: u64,
    simulated_seconds: f64,
    scores: Vec<ScoreEntry>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _log_guard = logging::setup_logging(config.session_id.as_deref())?;

    let tunables = match &config.tunables {
        Some(path) => TunablesLoader::load_with_defaults(path)?,
        None => TunableTable::raven_defaults()?,
    };
    let layout = arena::standard_arena(config.team_mode);
    let world = World::from_tunables(layout, &tunables, config.seed)?;

    let mut builder = Runtime::builder()
        .config(RuntimeConfig {
            autostart: false,
            ..RuntimeConfig::default()
        })
        .world(world);
    for index in 0..config.bots {
        builder = builder.bot(arena::team_for(index, config.team_mode));
    }
    let runtime = builder.build().await?;
    let handle = runtime.handle();

    tracing::info!(
        bots = config.bots,
        ticks = config.ticks,
        team_mode = config.team_mode,
        seed = config.seed,
        "Starting match"
    );

    let combat_log = tokio::spawn(log_combat(handle.subscribe(Topic::Combat)));

    let mut remaining = config.ticks;
    while remaining > 0 {
        let batch = remaining.min(PROGRESS_EVERY);
        let done = handle.step(batch).await?;
        remaining -= batch;
        tracing::info!(ticks = done, "Progress");
    }

    let (ticks, simulated_seconds) = handle.time().await?;
    let report = MatchReport {
        session: config.session_id.clone(),
        seed: config.seed,
        ticks,
        simulated_seconds,
        scores: handle.scoreboard().await?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    drop(handle);
    runtime.shutdown().await?;
    combat_log.await?;

    tracing::info!("Match complete");
    Ok(())
}

async fn log_combat(mut events: tokio::sync::broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(Event::Combat(CombatEvent::BotKilled {
                victim,
                killer,
                time,
            })) => {
                tracing::info!(%victim, %killer, time, "Kill");
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Combat log fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
