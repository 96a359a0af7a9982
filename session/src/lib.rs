#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session driving a Dodge board over time.
//!
//! The session owns the board, the elapsed-time clock and one step scheduler
//! per enemy. Callers feed wall-clock time through [`Session::advance`]; every
//! enemy whose interval elapsed takes a step. Terminal conditions are derived
//! from death events.

use std::{collections::BTreeMap, time::Duration};

use dodge_core::{
    snapshot::BoardSnapshot, Command, Direction, EntityId, EntityKind, Event, Footprint, GameLevel,
    MoveOutcome, Outcome, PlayState,
};
use dodge_world::{self as world, query, Board, BoardError};
use log::{debug, info, warn};
use thiserror::Error;

mod config;

pub use config::{Config, ConfigError, PlacementMode, DEFAULT_ENEMIES, DEFAULT_OBSTACLES};

const SECOND: Duration = Duration::from_secs(1);
const MIN_STEP_INTERVAL: Duration = Duration::from_millis(1);

/// Errors raised by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The board rejected a command.
    #[error(transparent)]
    Board(#[from] BoardError),
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// `start` was called on a session that already left the idle state.
    #[error("session cannot start from {0:?}")]
    AlreadyStarted(PlayState),
}

/// A single game: board, clock and enemy schedules.
#[derive(Debug)]
pub struct Session {
    board: Board,
    placement: PlacementMode,
    state: PlayState,
    outcome: Option<Outcome>,
    populated: bool,
    elapsed_secs: u64,
    clock: Duration,
    schedules: BTreeMap<EntityId, Duration>,
}

impl Session {
    /// Creates an idle session with an empty board.
    pub fn new(config: &Config) -> Result<Self, SessionError> {
        config.validate()?;
        let board = Board::new(config.board())?;
        info!(
            "created {}x{} session at {:?}",
            config.rows, config.cols, config.level
        );
        Ok(Self::with_board(board, config.placement, false, 0))
    }

    /// Recreates an idle session from a saved game.
    ///
    /// Starting the session resumes the saved entities instead of populating
    /// the board again.
    pub fn restore(
        config: &Config,
        snapshot: &BoardSnapshot,
        out: &mut Vec<Event>,
    ) -> Result<Self, SessionError> {
        let board = Board::from_snapshot(config.board(), snapshot, out)?;
        info!(
            "restored session at {:?} after {}s",
            snapshot.level, snapshot.elapsed_secs
        );
        Ok(Self::with_board(
            board,
            PlacementMode::Immediate,
            true,
            snapshot.elapsed_secs,
        ))
    }

    fn with_board(
        board: Board,
        placement: PlacementMode,
        populated: bool,
        elapsed_secs: u64,
    ) -> Self {
        Self {
            board,
            placement,
            state: PlayState::Idle,
            outcome: None,
            populated,
            elapsed_secs,
            clock: Duration::ZERO,
            schedules: BTreeMap::new(),
        }
    }

    /// Populates the board and starts the clock.
    ///
    /// In [`PlacementMode::Immediate`] every entity is placed before this
    /// returns. A restored session ignores the counts.
    pub fn start(
        &mut self,
        enemies: u32,
        obstacles: u32,
        out: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        if self.state != PlayState::Idle {
            return Err(SessionError::AlreadyStarted(self.state));
        }

        if !self.populated {
            world::apply(
                &mut self.board,
                Command::Populate { enemies, obstacles },
                out,
            )?;
            self.populated = true;
            if self.placement == PlacementMode::Immediate {
                world::apply(&mut self.board, Command::PlaceAll, out)?;
            }
        }

        self.transition(PlayState::Running, out);
        Ok(())
    }

    /// Places one entity whose footprint the presentation has finalised.
    pub fn place(
        &mut self,
        entity: EntityId,
        footprint: Option<Footprint>,
        out: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        if let Some(footprint) = footprint {
            world::apply(
                &mut self.board,
                Command::SetFootprint { entity, footprint },
                out,
            )?;
        }
        world::apply(&mut self.board, Command::PlaceEntity { entity }, out)?;
        Ok(())
    }

    /// Suspends the clock and every enemy schedule.
    pub fn pause(&mut self, out: &mut Vec<Event>) {
        if self.state == PlayState::Running {
            self.transition(PlayState::Paused, out);
        } else {
            warn!("ignoring pause while {:?}", self.state);
        }
    }

    /// Restarts the clock and schedules from their preserved state.
    pub fn resume(&mut self, out: &mut Vec<Event>) {
        if self.state == PlayState::Paused {
            self.transition(PlayState::Running, out);
        } else {
            warn!("ignoring resume while {:?}", self.state);
        }
    }

    /// Moves the player one step while the game is running.
    ///
    /// Returns how the attempt went, or `None` when the input was ignored or
    /// there is no player to move.
    pub fn move_player(
        &mut self,
        direction: Direction,
        out: &mut Vec<Event>,
    ) -> Option<MoveOutcome> {
        if self.state != PlayState::Running {
            debug!("ignoring player input while {:?}", self.state);
            return None;
        }
        let first = out.len();
        let outcome = self.board.move_player(direction, out);
        self.settle(first, out);
        outcome
    }

    /// Changes the difficulty level of every enemy.
    pub fn set_level(
        &mut self,
        level: GameLevel,
        out: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        world::apply(&mut self.board, Command::SetLevel { level }, out)?;
        Ok(())
    }

    /// Advances the clock by `dt` and steps every enemy that is due.
    ///
    /// Nothing happens unless the session is running. Enemies stay put until
    /// every entity has been positioned.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<Event>) -> Result<(), SessionError> {
        if self.state != PlayState::Running {
            return Ok(());
        }

        self.clock += dt;
        while self.clock >= SECOND {
            self.clock -= SECOND;
            self.elapsed_secs += 1;
        }

        if !query::all_entities_positioned(&self.board) {
            return Ok(());
        }

        for enemy in query::enemy_ids(&self.board) {
            let mut due = self.schedules.get(&enemy).copied().unwrap_or_default() + dt;
            while self.state == PlayState::Running {
                let Some(interval) = query::step_interval(&self.board, enemy) else {
                    break;
                };
                let interval = interval.max(MIN_STEP_INTERVAL);
                if due < interval {
                    break;
                }
                due -= interval;
                self.execute(Command::StepEnemy { enemy }, out)?;
            }
            if query::entity(&self.board, enemy).is_some() {
                let _ = self.schedules.insert(enemy, due);
            }
            if self.state != PlayState::Running {
                break;
            }
        }
        Ok(())
    }

    /// Captures the board and the elapsed clock.
    #[must_use]
    pub fn export(&self) -> BoardSnapshot {
        self.board.export(self.elapsed_secs)
    }

    /// Read access to the board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Terminal outcome once the session has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whole seconds the session has been running.
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    fn execute(&mut self, command: Command, out: &mut Vec<Event>) -> Result<(), SessionError> {
        let first = out.len();
        world::apply(&mut self.board, command, out)?;
        self.settle(first, out);
        Ok(())
    }

    fn settle(&mut self, first: usize, out: &mut Vec<Event>) {
        let deaths: Vec<(EntityId, EntityKind)> = out[first..]
            .iter()
            .filter_map(|event| match *event {
                Event::EntityDied { entity, kind } => Some((entity, kind)),
                _ => None,
            })
            .collect();
        for (entity, kind) in deaths {
            let _ = self.schedules.remove(&entity);
            self.check_outcome(kind, out);
        }
    }

    fn check_outcome(&mut self, died: EntityKind, out: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        let cleared = query::enemy_count(&self.board) <= 1 && query::player(&self.board).is_some();
        let outcome = match died {
            EntityKind::Player => Outcome::Defeat,
            EntityKind::Enemy if cleared => Outcome::Victory,
            EntityKind::Enemy | EntityKind::Obstacle => return,
        };

        self.outcome = Some(outcome);
        info!("session ended in {outcome:?} after {}s", self.elapsed_secs);
        self.transition(PlayState::Ended, out);
        out.push(Event::SessionEnded { outcome });
    }

    fn transition(&mut self, state: PlayState, out: &mut Vec<Event>) {
        debug!("session {:?} -> {state:?}", self.state);
        self.state = state;
        out.push(Event::PlayStateChanged { state });
    }
}
