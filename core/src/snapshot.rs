//! Plain records exchanged with persistence adapters.
//!
//! Optional fields fall back to their defaults when absent so that partially
//! written saves still load.

use serde::{Deserialize, Serialize};

use crate::{
    BlockMode, Direction, EntityId, EntityKind, Footprint, GameLevel, MovePace, MovePattern,
    Position, TargetEdge,
};

/// Complete saved state of a board and its session clock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Number of grid rows.
    pub rows: i32,
    /// Number of grid columns.
    pub cols: i32,
    /// Difficulty level the game was running at.
    #[serde(default)]
    pub level: GameLevel,
    /// Whole seconds of running time.
    #[serde(default)]
    pub elapsed_secs: u64,
    /// Every live entity, ordered by id.
    #[serde(default)]
    pub entities: Vec<EntitySnapshot>,
}

/// Saved state of a single entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Role of the entity.
    pub kind: EntityKind,
    /// Upper-left cell the entity occupies.
    pub position: Position,
    /// Cells covered by the entity.
    #[serde(default)]
    pub footprint: Footprint,
    /// Remaining life for players and enemies.
    #[serde(default)]
    pub life: Option<u32>,
    /// Cells covered per step for players and enemies.
    #[serde(default)]
    pub step_size: Option<i32>,
    /// Movement sub-state for enemies.
    #[serde(default)]
    pub motion: Option<MotionSnapshot>,
}

/// Saved movement sub-state of an enemy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionSnapshot {
    /// Active movement pattern.
    #[serde(default)]
    pub pattern: MovePattern,
    /// Active pacing policy.
    #[serde(default)]
    pub pace: MovePace,
    /// Current direction of travel.
    #[serde(default)]
    pub direction: Direction,
    /// Current step interval in milliseconds.
    #[serde(default)]
    pub step_interval_ms: Option<u64>,
    /// Edge of the player rectangle a following enemy heads for.
    #[serde(default)]
    pub target_edge: Option<TargetEdge>,
    /// Center of a circular orbit.
    #[serde(default)]
    pub orbit_center: Option<Position>,
    /// Orbit orientation.
    #[serde(default)]
    pub clockwise: Option<bool>,
    /// Burst threshold of a quantum pace.
    #[serde(default)]
    pub quantum: Option<u32>,
    /// Progress counter of a quantum pace.
    #[serde(default)]
    pub quantum_counter: Option<u32>,
    /// Whether a quantum pace is in its burst phase.
    #[serde(default)]
    pub quantum_active: Option<bool>,
    /// Axis a following enemy is currently steering around.
    #[serde(default)]
    pub block_mode: Option<BlockMode>,
    /// Block mode that preceded the current one.
    #[serde(default)]
    pub previous_block_mode: Option<BlockMode>,
}
