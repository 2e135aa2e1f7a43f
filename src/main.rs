//! Plinko entry point
//!
//! Plays one headless round on the bundled physics world and prints where
//! the ball landed.
//!
//! Environment:
//! - `PLINKO_SEED`: RNG seed (defaults to the settings seed, then the clock)
//! - `PLINKO_SETTINGS`: settings as JSON, missing fields use defaults
//! - `RUST_LOG`: log filter for `env_logger`

use anyhow::Context;
use plinko_sim::Settings;
use plinko_sim::consts::SIM_DT;
use plinko_sim::sim::{RoundController, RoundPhase};

/// Host frames to run before giving up (the watchdog fires well before this)
const MAX_FRAMES: u32 = 120 * 60;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Plinko (native) starting...");

    let settings = match std::env::var("PLINKO_SETTINGS") {
        Ok(json) => {
            Settings::from_json(&json).context("PLINKO_SETTINGS is not valid settings JSON")?
        }
        Err(_) => Settings::default(),
    };

    let seed = match std::env::var("PLINKO_SEED") {
        Ok(s) => s.parse::<u64>().context("PLINKO_SEED must be an unsigned integer")?,
        Err(_) => settings.seed.unwrap_or_else(clock_seed),
    };
    log::info!("Seed: {}", seed);

    let mut controller = RoundController::basic(settings, seed)?;
    controller.start_round()?;

    let mut frames = 0;
    while controller.state().phase != RoundPhase::Idle && frames < MAX_FRAMES {
        controller.update(SIM_DT);
        frames += 1;
    }

    let state = controller.state();
    log::debug!("Final state: {}", serde_json::to_string(state)?);

    match state.result {
        Some(outcome) => {
            if let Some(slot) = outcome.slot() {
                println!("Slot {}: Score: {}", slot, outcome);
            } else {
                println!("{}", outcome);
            }
        }
        None => println!("Round did not finish after {} frames", frames),
    }
    Ok(())
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
