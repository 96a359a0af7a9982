#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that drives enemy entities.
//!
//! Every enemy owns a [`Motion`]: a pattern state machine (straight, diagonal,
//! circular, following the player) combined with a [`Pace`]. The board hands
//! the motion an [`Arena`] for each scheduled tick; the motion proposes
//! targets, submits them through [`Arena::try_move`] and reacts to blocking
//! outcomes by rewriting its own direction, pattern or orbit.

use std::time::Duration;

use dodge_core::{
    snapshot::MotionSnapshot, CellRect, Direction, Footprint, MovePace, MovePattern, MoveResult,
    MoveOutcome, Position, TargetEdge,
};
pub use dodge_core::BlockMode;
use rand::Rng;

mod block;
mod pace;
mod pattern;
mod quota;

pub use block::BlockTracker;
pub use pace::{Pace, DEFAULT_STEP_QUANTUM};
pub use pattern::{following_target, Orbit};
pub use quota::{FollowingQuota, MAX_FOLLOWING, MIN_FOLLOWING};

/// Immediate retries a straight or diagonal enemy gets after being blocked.
pub const MAX_DIVERSIONS: u32 = 3;

/// View of the board from the perspective of the enemy being ticked.
pub trait Arena {
    /// Current upper-left cell of the enemy.
    fn position(&self) -> Position;

    /// Cells covered by the enemy.
    fn footprint(&self) -> Footprint;

    /// Grid dimensions as `(rows, cols)`.
    fn dimensions(&self) -> (i32, i32);

    /// Rectangle of the player, if the player is still alive.
    fn player(&self) -> Option<CellRect>;

    /// Validates the move and commits it when clear.
    fn try_move(&mut self, target: Position) -> MoveOutcome;

    /// Whether the enemy is still on the board.
    fn is_alive(&self) -> bool;
}

/// Movement state machine of a single enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    pattern: MovePattern,
    direction: Direction,
    step: i32,
    target_edge: TargetEdge,
    orbit: Option<Orbit>,
    block: BlockTracker,
    pace: Pace,
}

impl Motion {
    /// Samples a fresh motion for a newly created enemy.
    ///
    /// Following enemies always keep a constant pace; quantum paces draw a
    /// burst threshold between half and all of [`DEFAULT_STEP_QUANTUM`].
    pub fn spawn<R>(rng: &mut R, quota: &mut FollowingQuota, base: Duration, step: i32) -> Self
    where
        R: Rng + ?Sized,
    {
        let pattern = quota.sample(rng);
        let pace = if pattern == MovePattern::FollowingPlayer {
            MovePace::Constant
        } else {
            MovePace::ALL[rng.gen_range(0..MovePace::ALL.len())]
        };
        let quantum = if pace == MovePace::Quantum {
            rng.gen_range(DEFAULT_STEP_QUANTUM / 2..=DEFAULT_STEP_QUANTUM)
        } else {
            DEFAULT_STEP_QUANTUM
        };
        let direction = match pattern {
            MovePattern::Straight => Direction::random_straight(rng),
            MovePattern::Diagonal => Direction::random_diagonal(rng),
            MovePattern::Circular | MovePattern::FollowingPlayer => Direction::NONE,
        };

        Self::new(pattern, Pace::new(pace, base, quantum), direction, step)
    }

    /// Builds a motion from explicit parts.
    #[must_use]
    pub fn new(pattern: MovePattern, pace: Pace, direction: Direction, step: i32) -> Self {
        Self {
            pattern,
            direction,
            step,
            target_edge: TargetEdge::Top,
            orbit: None,
            block: BlockTracker::default(),
            pace,
        }
    }

    /// Rebuilds a motion from a saved record.
    ///
    /// Missing fields fall back to `base`, [`TargetEdge::Top`], a clockwise
    /// orbit, [`DEFAULT_STEP_QUANTUM`], an idle quantum phase and no block
    /// history.
    #[must_use]
    pub fn from_snapshot(snapshot: &MotionSnapshot, base: Duration, step: i32) -> Self {
        let base = snapshot
            .step_interval_ms
            .map_or(base, Duration::from_millis);
        let pace = Pace::new(
            snapshot.pace,
            base,
            snapshot.quantum.unwrap_or(DEFAULT_STEP_QUANTUM),
        )
        .with_counter(snapshot.quantum_counter.unwrap_or(0))
        .with_burst(snapshot.quantum_active.unwrap_or(false));

        let mut motion = Self::new(snapshot.pattern, pace, snapshot.direction, step);
        motion.target_edge = snapshot.target_edge.unwrap_or_default();
        motion.orbit = snapshot
            .orbit_center
            .map(|center| Orbit::restore(center, snapshot.clockwise.unwrap_or(true)));
        motion.block = BlockTracker::restore(
            snapshot.block_mode.unwrap_or_default(),
            snapshot.previous_block_mode.unwrap_or_default(),
        );
        motion
    }

    /// Captures the saveable part of the motion.
    #[must_use]
    pub fn to_snapshot(&self) -> MotionSnapshot {
        let quantum = (self.pace.kind() == MovePace::Quantum).then(|| self.pace.quantum());
        let block = (self.block != BlockTracker::default()).then_some(self.block);
        MotionSnapshot {
            pattern: self.pattern,
            pace: self.pace.kind(),
            direction: self.direction,
            step_interval_ms: u64::try_from(self.pace.base_interval().as_millis()).ok(),
            target_edge: Some(self.target_edge),
            orbit_center: self.orbit.map(|orbit| orbit.center()),
            clockwise: self.orbit.map(|orbit| orbit.clockwise()),
            quantum,
            quantum_counter: quantum.map(|_| self.pace.counter()),
            quantum_active: quantum.map(|_| self.pace.is_bursting()),
            block_mode: block.map(|block| block.current()),
            previous_block_mode: block.map(|block| block.previous()),
        }
    }

    /// Active movement pattern.
    #[must_use]
    pub const fn pattern(&self) -> MovePattern {
        self.pattern
    }

    /// Pacing state.
    #[must_use]
    pub const fn pace(&self) -> &Pace {
        &self.pace
    }

    /// Current direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Cells covered per step.
    #[must_use]
    pub const fn step(&self) -> i32 {
        self.step
    }

    /// Edge of the player's rectangle the enemy aims for while following.
    #[must_use]
    pub const fn target_edge(&self) -> TargetEdge {
        self.target_edge
    }

    /// Orbit of a circular enemy once it is known.
    #[must_use]
    pub const fn orbit(&self) -> Option<Orbit> {
        self.orbit
    }

    /// Block mode history of a following enemy.
    #[must_use]
    pub const fn block(&self) -> BlockTracker {
        self.block
    }

    /// Interval until the enemy's next scheduled tick.
    #[must_use]
    pub const fn current_interval(&self) -> Duration {
        self.pace.current_interval()
    }

    /// Applies a new base interval, as after a level change.
    pub fn set_base_interval(&mut self, base: Duration) {
        self.pace.set_base(base);
    }

    /// Completes initialisation once the enemy holds its first cell.
    ///
    /// Circular enemies fit their orbit around the spawn cell unless one was
    /// already restored.
    pub fn placed<A>(&mut self, arena: &A)
    where
        A: Arena + ?Sized,
    {
        if self.pattern == MovePattern::Circular && self.orbit.is_none() {
            let (rows, cols) = arena.dimensions();
            self.orbit = Some(Orbit::around_spawn(
                arena.position(),
                arena.footprint(),
                rows,
                cols,
            ));
        }
    }

    /// Runs one scheduled tick.
    pub fn tick<A>(&mut self, arena: &mut A)
    where
        A: Arena + ?Sized,
    {
        if self.pace.begin_step() {
            self.advance(arena);
        }
    }

    fn advance<A>(&mut self, arena: &mut A)
    where
        A: Arena + ?Sized,
    {
        let mut diversions = 0;
        loop {
            let target = self.target(&*arena, self.pattern);
            let outcome = arena.try_move(target);
            if outcome.is_clear() {
                self.after_clear_move(arena);
                return;
            }
            if !arena.is_alive() {
                return;
            }

            if self.pattern == MovePattern::FollowingPlayer || self.block.is_diverted() {
                if self.block.previous() != BlockMode::None {
                    self.rotate_target_edge(&*arena);
                }
                self.steer_around(&*arena, outcome.result);
                return;
            }

            if self.pattern == MovePattern::Circular {
                if let Some(orbit) = self.orbit.as_mut() {
                    orbit.flip();
                }
                return;
            }

            self.direction.divert(outcome.result);
            if diversions >= MAX_DIVERSIONS {
                return;
            }
            diversions += 1;
        }
    }

    fn after_clear_move<A>(&mut self, arena: &mut A)
    where
        A: Arena + ?Sized,
    {
        match self.block.current() {
            BlockMode::None => {}
            BlockMode::Total => {
                let axis = if self.block.previous() == BlockMode::Row {
                    MoveResult::ColumnBlock
                } else {
                    MoveResult::RowBlock
                };
                self.steer_around(&*arena, axis);
            }
            BlockMode::Row | BlockMode::Column => {
                let target = self.target(&*arena, MovePattern::FollowingPlayer);
                if arena.try_move(target).is_clear() {
                    self.block.record(BlockMode::None);
                    self.pattern = MovePattern::FollowingPlayer;
                }
            }
        }
    }

    fn steer_around<A>(&mut self, arena: &A, result: MoveResult)
    where
        A: Arena + ?Sized,
    {
        let origin = arena.position();
        let goal = self.target(arena, MovePattern::FollowingPlayer);
        match result {
            MoveResult::Clear => {}
            MoveResult::RowBlock => {
                self.block.record(BlockMode::Row);
                self.pattern = MovePattern::Straight;
                self.direction
                    .steer_horizontally(origin.col(), goal.col(), false);
            }
            MoveResult::ColumnBlock => {
                self.block.record(BlockMode::Column);
                self.pattern = MovePattern::Straight;
                self.direction.steer_vertically(origin.row(), goal.row(), false);
            }
            MoveResult::TotalBlock => {
                self.block.record(BlockMode::Total);
                self.pattern = MovePattern::Diagonal;
                self.direction
                    .steer_horizontally(origin.col(), goal.col(), true);
                self.direction.steer_vertically(origin.row(), goal.row(), true);
                self.direction.divert(MoveResult::TotalBlock);
            }
        }
    }

    fn rotate_target_edge<A>(&mut self, arena: &A)
    where
        A: Arena + ?Sized,
    {
        if arena.player().is_some() {
            self.target_edge = self.target_edge.next();
        }
    }

    fn target<A>(&mut self, arena: &A, pattern: MovePattern) -> Position
    where
        A: Arena + ?Sized,
    {
        let position = arena.position();
        match pattern {
            MovePattern::FollowingPlayer => following_target(
                position,
                arena.footprint(),
                self.step,
                self.target_edge,
                arena.player(),
            ),
            MovePattern::Circular => match self.orbit.as_mut() {
                Some(orbit) => orbit.next_target(position),
                None => position,
            },
            MovePattern::Straight | MovePattern::Diagonal => {
                self.direction.apply(position, self.step)
            }
        }
    }
}
