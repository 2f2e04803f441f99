//! WindowShock headless runner
//!
//! Plays one seeded run with the built-in autopilot at a fixed timestep and
//! prints the run statistics as JSON.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use serde::Serialize;

use window_shock::consts::{MAX_SUBSTEPS, SIM_DT};
use window_shock::sim::{FrameSnapshot, GamePhase, GameState, GameStats, TankClass, TickInput, tick};
use window_shock::{ConfigError, Settings, Tuning};

/// Display refresh the runner pretends to present at
const FRAME_DT: f32 = 1.0 / 30.0;

/// Game instance holding all state
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn new(seed: u64, settings: &Settings, tuning: Tuning) -> Self {
        let screen = Vec2::new(settings.screen_width, settings.screen_height);
        Self {
            state: GameState::new(seed, screen, tuning),
            accumulator: 0.0,
            input: TickInput {
                fire: settings.auto_fire,
                autopilot: true,
                ..Default::default()
            },
        }
    }

    /// Run as many fixed ticks as the frame time covers
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    phase: GamePhase,
    tank: TankClass,
    stats: GameStats,
    final_frame: FrameSnapshot,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> Result<(), ConfigError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load_or_default();
    let tuning = Tuning::load_or_default(settings.tuning_path.as_deref());
    let seed = settings.seed.unwrap_or_else(clock_seed);
    log::info!(
        "WindowShock starting: seed {seed}, screen {}x{}, {}s run",
        settings.screen_width,
        settings.screen_height,
        settings.run_seconds
    );

    let mut game = Game::new(seed, &settings, tuning);
    // Welcome and the collapse animation come on top of the playing time
    let max_frames = ((settings.run_seconds + 10.0) / FRAME_DT).ceil() as u64;
    for _ in 0..max_frames {
        game.update(FRAME_DT);
        let state = &game.state;
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("frame {}", FrameSnapshot::capture(state).to_json()?);
        }
        if state.phase == GamePhase::GameOver || state.elapsed >= settings.run_seconds {
            break;
        }
    }

    let state = &mut game.state;
    if state.phase == GamePhase::Playing {
        state.end_run();
    }

    let summary = RunSummary {
        seed,
        phase: state.phase,
        tank: state.player.tank,
        stats: state.stats.clone(),
        final_frame: FrameSnapshot::capture(state),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
