#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Tower Defense experience.
//!
//! `play` opens a window driven by the macroquad backend while `simulate`
//! runs a seeded match headlessly and prints a summary of every wave.

mod frame_clock;
mod scene;
mod tower_spec;

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use tower_defense_core::{Event, TICKS_PER_SECOND, WELCOME_BANNER};
use tower_defense_rendering::{Color, Presentation, RenderingBackend};
use tower_defense_rendering_macroquad::MacroquadBackend;
use tower_defense_session::{
    InMemoryHighScores, MatchSnapshot, NoHighScores, PlayerAction, Session, SessionConfig,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use self::{frame_clock::FrameClock, tower_spec::TowerSpec};

const MAX_TICKS_PER_FRAME: u32 = 8;

/// Command-line arguments accepted by the Tower Defense binary.
#[derive(Debug, Parser)]
#[command(name = "tower-defense", about = "Defend the path against waves of enemies.")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Opens a window and plays interactively.
    Play(PlayArgs),
    /// Runs a match without a window and prints a summary.
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Synchronise presentation with the display refresh rate (default).
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,
    /// Render as fast as possible.
    #[arg(long = "no-vsync", overrides_with = "vsync")]
    no_vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Seed for enemy selection; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// Number of ticks to simulate.
    #[arg(long)]
    ticks: u64,
    /// Seed for enemy selection.
    #[arg(long)]
    seed: Option<u64>,
    /// Tower bought before the first tick, as KIND@X,Y. May be repeated.
    #[arg(long = "tower", value_name = "KIND@X,Y")]
    towers: Vec<TowerSpec>,
}

/// Entry point for the Tower Defense command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    match args.command {
        Command::Play(args) => play(args),
        Command::Simulate(args) => simulate(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn play(args: PlayArgs) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "{WELCOME_BANNER}");

    let mut session = Session::new(SessionConfig::with_seed(seed), InMemoryHighScores::new());
    let presentation = Presentation::new(
        "Tower Defense",
        Color::from_rgb_u8(0, 0, 0),
        scene::build_scene(&session.snapshot()),
    );
    let vsync = args.vsync || !args.no_vsync;
    let backend = MacroquadBackend::new()
        .with_vsync(vsync)
        .with_show_fps(args.show_fps);

    let mut clock = FrameClock::new(TICKS_PER_SECOND, MAX_TICKS_PER_FRAME);
    backend
        .run(presentation, move |frame, input, presented| {
            if input.restart {
                session.restart();
            }

            for click in input.clicks {
                session.queue(scene::action_for_click(click));
            }

            for _ in 0..clock.advance(frame) {
                for event in session.step() {
                    log_rejection(event);
                }
            }

            scene::populate_scene(presented, &session.snapshot());
        })
        .context("failed to run the macroquad rendering backend")
}

fn simulate(args: SimulateArgs) -> Result<()> {
    ensure!(args.ticks > 0, "--ticks must be at least 1");

    let config = args
        .seed
        .map_or_else(SessionConfig::default, SessionConfig::with_seed);
    info!(seed = config.seed, ticks = args.ticks, "simulating match");
    let mut session = Session::new(config, NoHighScores);

    for spec in &args.towers {
        session.queue(PlayerAction::SelectTowerKind { kind: spec.kind });
        session.queue(PlayerAction::PlaceTower {
            position: spec.position,
        });
    }

    let mut ticks_run = 0;
    while ticks_run < args.ticks && !session.is_over() {
        let events = session.step().to_vec();
        ticks_run += 1;

        let snapshot = session.snapshot();
        for event in &events {
            log_rejection(event);
            if let Event::WaveBonusAwarded { wave, .. } = event {
                println!("{}", wave_summary(*wave, &snapshot));
            }
        }
    }

    println!("{}", final_summary(ticks_run, &session.snapshot()));
    Ok(())
}

fn log_rejection(event: &Event) {
    match event {
        Event::TowerPlacementRejected {
            kind,
            position,
            reason,
        } => warn!(?kind, x = position.x(), y = position.y(), %reason, "tower not placed"),
        Event::TowerUpgradeRejected { position, reason } => {
            debug!(x = position.x(), y = position.y(), %reason, "tower not upgraded");
        }
        _ => {}
    }
}

fn wave_summary(wave: u32, snapshot: &MatchSnapshot) -> String {
    format!(
        "wave {wave} cleared at tick {}: money {}, lives {}, score {}",
        snapshot.tick,
        snapshot.money.get(),
        snapshot.lives,
        snapshot.score,
    )
}

fn final_summary(ticks_run: u64, snapshot: &MatchSnapshot) -> String {
    let state = match snapshot.outcome {
        Some(outcome) => format!(
            "defeated at tick {} after clearing {} waves",
            outcome.tick, outcome.waves_cleared
        ),
        None => format!("still defending wave {}", snapshot.wave.wave),
    };

    format!(
        "simulation finished after {ticks_run} ticks: {state}; money {}, lives {}, score {}, towers {}, enemies {}",
        snapshot.money.get(),
        snapshot.lives,
        snapshot.score,
        snapshot.towers.len(),
        snapshot.enemies.len(),
    )
}
