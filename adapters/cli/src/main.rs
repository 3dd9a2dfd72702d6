#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Labyrinth experience.

mod config;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use labyrinth_core::{DirectionalKeys, Position};
use labyrinth_rendering::{Color, Presentation, RenderingBackend, TilePalette};
use labyrinth_rendering_macroquad::MacroquadBackend;
use labyrinth_system_scheduler::Config as SchedulerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{parse_position, GameConfig, Overrides},
    session::Session,
};

const WINDOW_TITLE: &str = "Labyrinth";

/// Reach the finish tile before the enemy catches you.
#[derive(Debug, Parser)]
#[command(name = "labyrinth", version)]
struct CliArgs {
    /// TOML file with game settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Grid source: whitespace-separated tile codes, one row per line.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,
    /// Hero start cell.
    #[arg(long, value_name = "X,Y", value_parser = parse_position)]
    hero: Option<Position>,
    /// Enemy start cell.
    #[arg(long, value_name = "X,Y", value_parser = parse_position)]
    enemy: Option<Position>,
    /// Tile codes agents may occupy.
    #[arg(long, value_name = "CODES", value_delimiter = ',')]
    free_tiles: Option<Vec<u32>>,
    /// Tile code that wins the round.
    #[arg(long, value_name = "CODE")]
    finish_tile: Option<u32>,
    /// Milliseconds between enemy steps.
    #[arg(long, value_name = "MILLIS")]
    enemy_interval_ms: Option<u64>,
    /// Frame rate cap; 0 runs uncapped.
    #[arg(long, value_name = "FPS")]
    fps: Option<u32>,
    /// Tile edge length in pixels.
    #[arg(long, value_name = "PIXELS")]
    tile_size: Option<f32>,
    /// Run without a window, holding no keys.
    #[arg(long)]
    headless: bool,
    /// Number of frames simulated in headless mode.
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            map: self.map.clone(),
            hero: self.hero,
            enemy: self.enemy,
            free_tiles: self.free_tiles.clone(),
            finish_tile: self.finish_tile,
            enemy_interval_ms: self.enemy_interval_ms,
            frames_per_second: self.fps,
            tile_size: self.tile_size,
        }
    }
}

/// Entry point for the Labyrinth command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    }
    .with_overrides(args.overrides());

    let world = config.build_world()?;
    let mut session = Session::new(world, SchedulerConfig::new(config.enemy_interval()));
    info!(
        hero = ?config.hero_start(),
        enemy = ?config.enemy_start(),
        enemy_interval_ms = config.enemy_interval_ms,
        "round started"
    );

    if args.headless {
        run_headless(session, &config, args.frames);
        return Ok(());
    }

    let scene = session.scene(&TilePalette::default());
    let presentation = Presentation::new(
        WINDOW_TITLE,
        Color::from_rgb_u8(0, 0, 0),
        config.tile_size,
        scene,
    )
    .context("invalid presentation settings")?;

    MacroquadBackend::new(config.frame_rate()).run(presentation, move |dt, input, scene| {
        let _ = session.advance_frame(dt, input.keys);
        session.populate_scene(scene);
    })
}

fn run_headless(mut session: Session, config: &GameConfig, frames: u32) {
    let dt = config
        .frame_rate()
        .map_or(Duration::from_millis(16), |fps| Duration::from_secs(1) / fps);

    let mut elapsed_frames = 0;
    while elapsed_frames < frames && !session.state().is_terminal() {
        let _ = session.advance_frame(dt, DirectionalKeys::default());
        elapsed_frames += 1;
    }

    match session.state().message() {
        Some(message) => println!("{message} after {elapsed_frames} frames"),
        None => println!("round still running after {elapsed_frames} frames"),
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
