#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dodge engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative board, and the movement system. Adapters submit [`Command`]
//! values describing desired mutations, the board executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values describing
//! what happened. Persistence adapters exchange the plain records found in the
//! [`snapshot`] module.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

mod direction;
mod geometry;
pub mod snapshot;

pub use direction::Direction;
pub use geometry::{Area, CellRect, Footprint, Position};

/// Life granted to the player when a game starts.
pub const PLAYER_LIFE: u32 = 10;

/// Life granted to every enemy when a game starts.
pub const ENEMY_LIFE: u32 = 3;

/// Cells covered by a single step of the player or an enemy.
pub const DEFAULT_STEP_SIZE: i32 = 1;

/// Commands that express all permissible board mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Creates the player, the enemies and the obstacles of a new game.
    Populate {
        /// Number of enemies to create.
        enemies: u32,
        /// Number of obstacles to create.
        obstacles: u32,
    },
    /// Replaces the footprint of an entity that has not been placed yet.
    SetFootprint {
        /// Entity whose footprint changes.
        entity: EntityId,
        /// Cells the entity will cover.
        footprint: Footprint,
    },
    /// Places a single unpositioned entity on the grid.
    PlaceEntity {
        /// Entity to place.
        entity: EntityId,
    },
    /// Places every unpositioned entity, player first.
    PlaceAll,
    /// Runs one scheduled tick of an enemy's movement state machine.
    StepEnemy {
        /// Enemy being ticked.
        enemy: EntityId,
    },
    /// Moves the player one step in the provided direction.
    MovePlayer {
        /// Direction requested by the input adapter.
        direction: Direction,
    },
    /// Changes the difficulty level and re-derives enemy step intervals.
    SetLevel {
        /// Level to activate.
        level: GameLevel,
    },
    /// Informs the board that the presentation surface was resized.
    NotifyResize,
}

/// Events broadcast by the board and the session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that an entity was added to the registry.
    EntityCreated {
        /// Identifier assigned to the entity.
        entity: EntityId,
        /// Role of the entity.
        kind: EntityKind,
    },
    /// Confirms that an entity received its first cell.
    EntityPlaced {
        /// Identifier of the placed entity.
        entity: EntityId,
        /// Upper-left cell assigned to the entity.
        position: Position,
    },
    /// Confirms that an entity moved between two cells.
    EntityMoved {
        /// Identifier of the entity that moved.
        entity: EntityId,
        /// Upper-left cell before the move.
        from: Position,
        /// Upper-left cell after the move.
        to: Position,
    },
    /// Reports that an entity lost one life and survived.
    EntityHit {
        /// Identifier of the entity that was hit.
        entity: EntityId,
        /// Life left after the hit.
        remaining_life: u32,
    },
    /// Reports that an entity ran out of life and left the board.
    EntityDied {
        /// Identifier of the entity that died.
        entity: EntityId,
        /// Role the entity had.
        kind: EntityKind,
    },
    /// Announces that every entity has been placed and enemies may move.
    AllEntitiesPositioned,
    /// Re-announces the board dimensions after a resize notification.
    BoardResized {
        /// Number of grid rows.
        rows: i32,
        /// Number of grid columns.
        cols: i32,
    },
    /// Announces a session lifecycle transition.
    PlayStateChanged {
        /// State that became active.
        state: PlayState,
    },
    /// Announces that the game reached a terminal condition.
    SessionEnded {
        /// How the game ended for the player.
        outcome: Outcome,
    },
}

/// Unique identifier assigned to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Identifier reserved for the player.
    pub const PLAYER: Self = Self(1);

    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Role an entity plays on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The single entity controlled by the user.
    Player,
    /// An autonomously moving opponent.
    Enemy,
    /// A static blocker that never takes damage.
    Obstacle,
}

/// Result of validating a candidate move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveResult {
    /// Nothing blocks the move.
    #[default]
    Clear,
    /// The move is blocked along the row axis.
    RowBlock,
    /// The move is blocked along the column axis.
    ColumnBlock,
    /// The move is blocked along both axes.
    TotalBlock,
}

impl MoveResult {
    /// Whether the move was allowed.
    #[must_use]
    pub const fn is_clear(self) -> bool {
        matches!(self, Self::Clear)
    }

    /// Adds a row-axis block to the result.
    #[must_use]
    pub const fn with_row_block(self) -> Self {
        match self {
            Self::Clear | Self::RowBlock => Self::RowBlock,
            Self::ColumnBlock | Self::TotalBlock => Self::TotalBlock,
        }
    }

    /// Adds a column-axis block to the result.
    #[must_use]
    pub const fn with_column_block(self) -> Self {
        match self {
            Self::Clear | Self::ColumnBlock => Self::ColumnBlock,
            Self::RowBlock | Self::TotalBlock => Self::TotalBlock,
        }
    }
}

/// Result of a move attempt together with the entity that caused a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveOutcome {
    /// Classification of the attempt.
    pub result: MoveResult,
    /// First entity found in the way, if another entity caused the block.
    pub blocker: Option<EntityId>,
}

impl MoveOutcome {
    /// Outcome of an unobstructed move.
    pub const CLEAR: Self = Self {
        result: MoveResult::Clear,
        blocker: None,
    };

    /// Outcome blocked by the grid boundary rather than another entity.
    #[must_use]
    pub const fn boundary(result: MoveResult) -> Self {
        Self {
            result,
            blocker: None,
        }
    }

    /// Whether the move was allowed.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.result.is_clear()
    }
}

/// Shape of an enemy's path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovePattern {
    /// Moves along a single axis.
    #[default]
    Straight,
    /// Moves along both axes at once.
    Diagonal,
    /// Orbits a fixed center.
    Circular,
    /// Chases an edge of the player's rectangle.
    FollowingPlayer,
}

impl MovePattern {
    /// Every pattern in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Straight,
        Self::Diagonal,
        Self::Circular,
        Self::FollowingPlayer,
    ];
}

/// Timing policy of an enemy's steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovePace {
    /// Steps at the base interval.
    #[default]
    Constant,
    /// Idles, then moves in bursts.
    Quantum,
    /// Shortens the interval each step until a floor, then resets.
    Accelerated,
    /// Lengthens the interval each step until a ceiling, then resets.
    Decelerated,
}

impl MovePace {
    /// Every pace in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Constant,
        Self::Quantum,
        Self::Accelerated,
        Self::Decelerated,
    ];
}

/// Edge of the player's rectangle a following enemy aims for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetEdge {
    /// Above the player.
    #[default]
    Top,
    /// Right of the player.
    Right,
    /// Below the player.
    Bottom,
    /// Left of the player.
    Left,
}

impl TargetEdge {
    /// Next edge in clockwise order.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Top => Self::Right,
            Self::Right => Self::Bottom,
            Self::Bottom => Self::Left,
            Self::Left => Self::Top,
        }
    }
}

/// Axis on which a following enemy was blocked and is now steering around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockMode {
    /// Not steering around anything.
    #[default]
    None,
    /// Blocked on the row axis; sliding along columns.
    Row,
    /// Blocked on the column axis; sliding along rows.
    Column,
    /// Blocked on both axes; moving diagonally away.
    Total,
}

/// Difficulty level mapping to the enemies' base step interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameLevel {
    /// Slowest enemies.
    #[default]
    Beginner,
    /// Moderately fast enemies.
    Intermediate,
    /// Fastest enemies.
    Expert,
}

impl GameLevel {
    /// Base interval between two enemy steps at this level.
    #[must_use]
    pub const fn base_step_interval(self) -> Duration {
        match self {
            Self::Beginner => Duration::from_millis(100),
            Self::Intermediate => Duration::from_millis(20),
            Self::Expert => Duration::from_millis(4),
        }
    }
}

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// Created but not started.
    #[default]
    Idle,
    /// Clock and enemy schedules are running.
    Running,
    /// Clock and schedules are suspended with state preserved.
    Paused,
    /// A terminal condition was reached.
    Ended,
}

/// Terminal condition of a game from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// At most one enemy remains and the player is alive.
    Victory,
    /// The player died.
    Defeat,
}
