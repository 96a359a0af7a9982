#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Dodge in console mode.
//!
//! Time is simulated: every tick advances the session by a fixed amount, so a
//! seed plus a move script always replays the same game.

mod console;
mod snapshot_transfer;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use dodge_core::{Direction, Event, GameLevel, PlayState};
use dodge_session::{Config, Session};
use log::{debug, info};

/// Console-mode Dodge runner.
#[derive(Parser, Debug)]
#[command(name = "dodge")]
#[command(about = "Plays a game of Dodge on the console with a scripted player")]
struct Args {
    /// TOML configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of grid rows.
    #[arg(long)]
    rows: Option<i32>,

    /// Number of grid columns.
    #[arg(long)]
    cols: Option<i32>,

    /// Difficulty level.
    #[arg(long, value_enum)]
    level: Option<LevelArg>,

    /// Enemies created on start.
    #[arg(long)]
    enemies: Option<u32>,

    /// Obstacles created on start.
    #[arg(long)]
    obstacles: Option<u32>,

    /// Seed for deterministic runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of simulated ticks.
    #[arg(long, default_value_t = 200)]
    ticks: u32,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,

    /// Player moves, one per tick: w, a, s, d, or `.` to stand still.
    #[arg(long, default_value = "")]
    moves: String,

    /// Resume the saved game stored in this file.
    #[arg(long)]
    load: Option<PathBuf>,

    /// Store the final state of the game in this file.
    #[arg(long)]
    save: Option<PathBuf>,
}

/// Difficulty levels accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LevelArg {
    /// 100 ms between enemy steps.
    Beginner,
    /// 20 ms between enemy steps.
    Intermediate,
    /// 4 ms between enemy steps.
    Expert,
}

impl From<LevelArg> for GameLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Beginner => Self::Beginner,
            LevelArg::Intermediate => Self::Intermediate,
            LevelArg::Expert => Self::Expert,
        }
    }
}

/// Entry point for the Dodge command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = resolve_config(&args)?;
    let moves = parse_moves(&args.moves)?;

    let mut events = Vec::new();
    let mut session = match &args.load {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read saved game at {}", path.display()))?;
            let snapshot = snapshot_transfer::decode(&text)
                .with_context(|| format!("failed to decode saved game at {}", path.display()))?;
            Session::restore(&config, &snapshot, &mut events).context("failed to restore game")?
        }
        None => Session::new(&config).context("failed to create game")?,
    };
    session
        .start(config.enemies, config.obstacles, &mut events)
        .context("failed to start game")?;
    drain(&mut events);

    let dt = Duration::from_millis(args.tick_ms);
    for tick in 0..args.ticks {
        if session.state() == PlayState::Ended {
            break;
        }
        if let Some(direction) = moves.get(tick as usize) {
            if let Some(outcome) = session.move_player(*direction, &mut events) {
                if !outcome.is_clear() {
                    debug!("player blocked: {:?} by {:?}", outcome.result, outcome.blocker);
                }
            }
        }
        session.advance(dt, &mut events)?;
        drain(&mut events);
    }

    print!("{}", console::render(session.board()));
    println!("{}", console::status(session.board(), session.elapsed_secs()));
    match session.outcome() {
        Some(outcome) => println!("game over: {outcome:?}"),
        None => println!("game in progress"),
    }

    if let Some(path) = &args.save {
        let encoded = snapshot_transfer::encode(&session.export());
        fs::write(path, format!("{encoded}\n"))
            .with_context(|| format!("failed to write saved game to {}", path.display()))?;
        info!("saved game to {}", path.display());
    }
    Ok(())
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path.clone())
            .with_context(|| format!("failed to load config at {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if let Some(level) = args.level {
        config.level = level.into();
    }
    if let Some(enemies) = args.enemies {
        config.enemies = enemies;
    }
    if let Some(obstacles) = args.obstacles {
        config.obstacles = obstacles;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn parse_moves(script: &str) -> Result<Vec<Direction>> {
    script
        .chars()
        .filter(|key| !key.is_whitespace())
        .map(|key| match key.to_ascii_lowercase() {
            'w' => Ok(Direction::UP),
            'a' => Ok(Direction::LEFT),
            's' => Ok(Direction::DOWN),
            'd' => Ok(Direction::RIGHT),
            '.' => Ok(Direction::NONE),
            other => bail!("unknown move '{other}'; expected w, a, s, d or ."),
        })
        .collect()
}

fn drain(events: &mut Vec<Event>) {
    for event in events.drain(..) {
        debug!("{event:?}");
    }
}
