#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Dodge.
//!
//! The [`Board`] owns the entity registry, the grid dimensions and the single
//! random generator of a game. Every mutation flows through [`apply`], which
//! executes a [`Command`] and appends the resulting [`Event`] values to an
//! outbound queue. Read-only access is provided by the [`query`] module.
//!
//! Presentation adapters that finalise footprints on their own threads place
//! entities through a [`SharedBoard`] and take the board back with
//! [`SharedBoard::into_inner`] once every entity is positioned. A session
//! that owns its board places deferred entities directly.

use std::{collections::BTreeMap, time::Duration};

use dodge_core::{
    snapshot::{BoardSnapshot, EntitySnapshot},
    Area, CellRect, Command, Direction, EntityId, EntityKind, Event, GameLevel, MoveOutcome,
    MoveResult, Position, DEFAULT_STEP_SIZE, ENEMY_LIFE, PLAYER_LIFE,
};
use dodge_system_movement::{FollowingQuota, Motion, MAX_FOLLOWING, MIN_FOLLOWING};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

mod arena;
mod collision;
mod entity;
mod placement;
mod shared;

use arena::EnemyArena;
use collision::Sweep;
use entity::{Entity, Role};
use placement::Lattice;

pub use shared::SharedBoard;

/// Default number of grid rows.
pub const DEFAULT_ROWS: i32 = 52;

/// Default number of grid columns.
pub const DEFAULT_COLS: i32 = 100;

/// Parameters used to create a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    /// Number of grid rows.
    pub rows: i32,
    /// Number of grid columns.
    pub cols: i32,
    /// Difficulty level deriving the enemies' base step interval.
    pub level: GameLevel,
    /// Seed of the board's random generator.
    pub seed: u64,
    /// Number of following enemies a population aims for.
    pub min_following: u32,
    /// Number of following enemies a population may not exceed.
    pub max_following: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            level: GameLevel::Beginner,
            seed: 0,
            min_following: MIN_FOLLOWING,
            max_following: MAX_FOLLOWING,
        }
    }
}

/// Errors reported by the board.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// The grid must have at least one row and one column.
    #[error("board dimensions {rows}x{cols} are not positive")]
    InvalidDimensions {
        /// Requested number of rows.
        rows: i32,
        /// Requested number of columns.
        cols: i32,
    },
    /// The player could not take the center of the grid.
    #[error(
        "player cannot be placed at ({}, {}): {result:?}",
        .position.row(),
        .position.col()
    )]
    PlayerPlacement {
        /// Center cell the player was assigned.
        position: Position,
        /// Validation result at the center.
        result: MoveResult,
    },
    /// More entities were requested than the grid is expected to hold.
    #[error("{requested} entities do not fit on the board (capacity {capacity})")]
    Overcrowded {
        /// Enemies plus obstacles requested.
        requested: u32,
        /// Estimated number of entities the grid holds.
        capacity: u32,
    },
    /// The board already holds entities.
    #[error("board is already populated")]
    AlreadyPopulated,
    /// No free cell was found for the entity.
    #[error("no room left to place entity {0}")]
    NoRoom(EntityId),
    /// The entity is not on the board.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    /// The entity exists but is not an enemy.
    #[error("entity {0} is not an enemy")]
    NotAnEnemy(EntityId),
    /// The entity has not been placed yet.
    #[error("entity {0} has not been placed")]
    Unpositioned(EntityId),
    /// A snapshot lists the same id twice.
    #[error("snapshot lists entity {0} more than once")]
    DuplicateEntity(EntityId),
    /// A snapshot assigns the player role to an id other than the player id.
    #[error("snapshot assigns the player role to entity {0}")]
    UnexpectedPlayer(EntityId),
    /// A snapshot puts an entity outside the grid.
    #[error("snapshot places entity {0} outside the grid")]
    OutOfBounds(EntityId),
}

/// Authoritative state of a game board.
#[derive(Debug)]
pub struct Board {
    rows: i32,
    cols: i32,
    level: GameLevel,
    entities: BTreeMap<EntityId, Entity>,
    safe_area: Area,
    lattice: Lattice,
    positioned: usize,
    all_positioned: bool,
    quota: FollowingQuota,
    rng: ChaCha8Rng,
}

impl Board {
    /// Creates an empty board.
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        let BoardConfig { rows, cols, .. } = config;
        if rows <= 0 || cols <= 0 {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }

        Ok(Self {
            rows,
            cols,
            level: config.level,
            entities: BTreeMap::new(),
            safe_area: placement::safe_area(rows, cols),
            lattice: Lattice::default(),
            positioned: 0,
            all_positioned: false,
            quota: FollowingQuota::new(config.min_following, config.max_following),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    /// Rebuilds a saved board.
    ///
    /// Dimensions and level come from the snapshot, the seed and following
    /// bounds from `config`. Entities are restored in place without placement
    /// validation and the board is immediately fully positioned. Enemies saved
    /// without movement state receive a freshly sampled one.
    pub fn from_snapshot(
        config: BoardConfig,
        snapshot: &BoardSnapshot,
        out: &mut Vec<Event>,
    ) -> Result<Self, BoardError> {
        let mut board = Self::new(BoardConfig {
            rows: snapshot.rows,
            cols: snapshot.cols,
            level: snapshot.level,
            ..config
        })?;
        let mut spare = FollowingQuota::new(0, config.max_following);
        let base = snapshot.level.base_step_interval();

        for record in &snapshot.entities {
            board.restore_entity(record, &mut spare, base, out)?;
        }

        let enemies: Vec<EntityId> = board.enemy_ids();
        let mut scratch = Vec::new();
        for enemy in enemies {
            board.drive_enemy(enemy, &mut scratch, |motion, arena| motion.placed(&*arena));
        }
        board.note_positioning(out);
        info!(
            "restored {}x{} board with {} entities",
            board.rows,
            board.cols,
            board.entities.len()
        );
        Ok(board)
    }

    /// Captures the positioned entities and board fields.
    #[must_use]
    pub fn export(&self, elapsed_secs: u64) -> BoardSnapshot {
        let entities = self
            .entities
            .values()
            .filter(|entity| entity.positioned)
            .map(|entity| EntitySnapshot {
                id: entity.id,
                kind: entity.kind(),
                position: entity.position,
                footprint: entity.footprint,
                life: entity.life(),
                step_size: match &entity.role {
                    Role::Player { step, .. } => Some(*step),
                    Role::Enemy { motion, .. } => Some(motion.step()),
                    Role::Obstacle => None,
                },
                motion: entity.motion().map(Motion::to_snapshot),
            })
            .collect();

        BoardSnapshot {
            rows: self.rows,
            cols: self.cols,
            level: self.level,
            elapsed_secs,
            entities,
        }
    }

    /// Validates a move of `entity` to `target` and commits it when clear.
    ///
    /// A blocked move between the player and an enemy, or between two
    /// enemies, damages the entities involved.
    pub fn try_move(
        &mut self,
        entity: EntityId,
        target: Position,
        out: &mut Vec<Event>,
    ) -> Result<MoveOutcome, BoardError> {
        let record = self
            .entities
            .get(&entity)
            .ok_or(BoardError::UnknownEntity(entity))?;
        if !record.positioned {
            return Err(BoardError::Unpositioned(entity));
        }
        Ok(self.move_entity(entity, target, out))
    }

    /// Moves the player one step in `direction` and reports the outcome.
    ///
    /// Returns `None` while there is no positioned player to move.
    pub fn move_player(
        &mut self,
        direction: Direction,
        out: &mut Vec<Event>,
    ) -> Option<MoveOutcome> {
        let Some(player) = self.entities.get(&EntityId::PLAYER) else {
            debug!("no player to move");
            return None;
        };
        if !player.positioned {
            return None;
        }
        let step = match player.role {
            Role::Player { step, .. } => step,
            Role::Enemy { .. } | Role::Obstacle => DEFAULT_STEP_SIZE,
        };
        let target = direction.apply(player.position, step);
        Some(self.move_entity(EntityId::PLAYER, target, out))
    }

    pub(crate) fn move_entity(
        &mut self,
        id: EntityId,
        target: Position,
        out: &mut Vec<Event>,
    ) -> MoveOutcome {
        let Some(mover) = self.entities.get(&id) else {
            return MoveOutcome::boundary(MoveResult::TotalBlock);
        };
        let from = mover.position;
        let outcome = collision::validate(
            &self.entities,
            (self.rows, self.cols),
            id,
            mover.rect(),
            target,
            Sweep::Move,
        );

        if outcome.is_clear() {
            if target != from {
                if let Some(mover) = self.entities.get_mut(&id) {
                    mover.position = target;
                }
                out.push(Event::EntityMoved {
                    entity: id,
                    from,
                    to: target,
                });
            }
            return outcome;
        }

        if let Some(blocker) = outcome.blocker {
            let damaging = matches!(
                self.entities.get(&blocker).map(Entity::kind),
                Some(EntityKind::Player | EntityKind::Enemy)
            );
            if damaging {
                self.collide(id, blocker, out);
            }
        }
        outcome
    }

    fn collide(&mut self, mover: EntityId, blocker: EntityId, out: &mut Vec<Event>) {
        let involves_player = [mover, blocker]
            .iter()
            .any(|id| self.entities.get(id).map(Entity::kind) == Some(EntityKind::Player));
        self.hit(mover, out);
        if involves_player {
            self.hit(blocker, out);
        }
    }

    fn hit(&mut self, id: EntityId, out: &mut Vec<Event>) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        let kind = entity.kind();
        let Some(life) = entity.life_mut() else {
            return;
        };
        *life = life.saturating_sub(1);
        let remaining_life = *life;

        if remaining_life > 0 {
            debug!("{kind:?} {id} hit, {remaining_life} left");
            out.push(Event::EntityHit {
                entity: id,
                remaining_life,
            });
            return;
        }

        if let Some(removed) = self.entities.remove(&id) {
            if removed.positioned {
                self.positioned -= 1;
            }
        }
        info!("{kind:?} {id} died");
        out.push(Event::EntityDied { entity: id, kind });
        self.note_positioning(out);
    }

    pub(crate) fn player_rect(&self) -> Option<CellRect> {
        self.entities
            .get(&EntityId::PLAYER)
            .filter(|entity| entity.positioned && entity.kind() == EntityKind::Player)
            .map(Entity::rect)
    }

    pub(crate) fn drive_enemy<F>(&mut self, id: EntityId, out: &mut Vec<Event>, drive: F)
    where
        F: FnOnce(&mut Motion, &mut EnemyArena<'_>),
    {
        let Some(mut motion) = self.entities.get(&id).and_then(Entity::motion).cloned() else {
            return;
        };
        let mut arena = EnemyArena {
            board: self,
            enemy: id,
            out,
        };
        drive(&mut motion, &mut arena);
        if let Some(slot) = self.entities.get_mut(&id).and_then(Entity::motion_mut) {
            *slot = motion;
        }
    }

    fn enemy_ids(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.kind() == EntityKind::Enemy)
            .map(|entity| entity.id)
            .collect()
    }

    fn populate(
        &mut self,
        enemies: u32,
        obstacles: u32,
        out: &mut Vec<Event>,
    ) -> Result<(), BoardError> {
        if !self.entities.is_empty() {
            return Err(BoardError::AlreadyPopulated);
        }
        let requested = enemies.saturating_add(obstacles);
        let capacity = placement::capacity(self.rows, self.cols, self.safe_area);
        if requested > capacity {
            return Err(BoardError::Overcrowded {
                requested,
                capacity,
            });
        }

        self.lattice = Lattice::for_obstacles(obstacles, self.rows, self.cols);
        self.quota.reset(enemies);

        self.insert(
            Entity::new(
                EntityId::PLAYER,
                Role::Player {
                    life: PLAYER_LIFE,
                    step: DEFAULT_STEP_SIZE,
                },
            ),
            out,
        );

        let base = self.level.base_step_interval();
        let enemy_start = EntityId::PLAYER.get() + 1;
        for _ in 0..enemies {
            let id = self.fresh_id(enemy_start, enemies);
            let motion =
                Motion::spawn(&mut self.rng, &mut self.quota, base, DEFAULT_STEP_SIZE);
            self.insert(
                Entity::new(
                    id,
                    Role::Enemy {
                        life: ENEMY_LIFE,
                        motion,
                    },
                ),
                out,
            );
        }

        let obstacle_start = enemy_start + enemies;
        for _ in 0..obstacles {
            let id = self.fresh_id(obstacle_start, obstacles);
            self.insert(Entity::new(id, Role::Obstacle), out);
        }

        info!(
            "populated board with {enemies} enemies ({} following) and {obstacles} obstacles",
            self.quota.following()
        );
        Ok(())
    }

    fn fresh_id(&mut self, start: u32, count: u32) -> EntityId {
        loop {
            let id = EntityId::new(self.rng.gen_range(start..start + count));
            if !self.entities.contains_key(&id) {
                return id;
            }
        }
    }

    fn insert(&mut self, entity: Entity, out: &mut Vec<Event>) {
        out.push(Event::EntityCreated {
            entity: entity.id,
            kind: entity.kind(),
        });
        let _ = self.entities.insert(entity.id, entity);
    }

    fn restore_entity(
        &mut self,
        record: &EntitySnapshot,
        spare: &mut FollowingQuota,
        base: Duration,
        out: &mut Vec<Event>,
    ) -> Result<(), BoardError> {
        let id = record.id;
        if self.entities.contains_key(&id) {
            return Err(BoardError::DuplicateEntity(id));
        }
        if record.kind == EntityKind::Player && id != EntityId::PLAYER {
            return Err(BoardError::UnexpectedPlayer(id));
        }
        if !CellRect::new(record.position, record.footprint).fits_within(self.rows, self.cols) {
            return Err(BoardError::OutOfBounds(id));
        }

        let step = record.step_size.unwrap_or(DEFAULT_STEP_SIZE);
        let role = match record.kind {
            EntityKind::Player => Role::Player {
                life: record.life.unwrap_or(PLAYER_LIFE),
                step,
            },
            EntityKind::Enemy => {
                let motion = match &record.motion {
                    Some(saved) => Motion::from_snapshot(saved, base, step),
                    None => Motion::spawn(&mut self.rng, spare, base, step),
                };
                Role::Enemy {
                    life: record.life.unwrap_or(ENEMY_LIFE),
                    motion,
                }
            }
            EntityKind::Obstacle => Role::Obstacle,
        };

        let mut entity = Entity::new(id, role);
        entity.footprint = record.footprint;
        entity.position = record.position;
        entity.positioned = true;
        self.insert(entity, out);
        self.positioned += 1;
        out.push(Event::EntityPlaced {
            entity: id,
            position: record.position,
        });
        Ok(())
    }
}

/// Executes the provided command against the board.
pub fn apply(board: &mut Board, command: Command, out: &mut Vec<Event>) -> Result<(), BoardError> {
    match command {
        Command::Populate { enemies, obstacles } => board.populate(enemies, obstacles, out)?,
        Command::SetFootprint { entity, footprint } => {
            let record = board
                .entities
                .get_mut(&entity)
                .ok_or(BoardError::UnknownEntity(entity))?;
            if record.positioned {
                warn!("ignoring footprint change for placed entity {entity}");
            } else {
                record.footprint = footprint;
            }
        }
        Command::PlaceEntity { entity } => board.place(entity, out)?,
        Command::PlaceAll => board.place_all(out)?,
        Command::StepEnemy { enemy } => {
            let record = board
                .entities
                .get(&enemy)
                .ok_or(BoardError::UnknownEntity(enemy))?;
            if record.kind() != EntityKind::Enemy {
                return Err(BoardError::NotAnEnemy(enemy));
            }
            if board.all_positioned {
                board.drive_enemy(enemy, out, |motion, arena| motion.tick(arena));
            }
        }
        Command::MovePlayer { direction } => {
            let _ = board.move_player(direction, out);
        }
        Command::SetLevel { level } => {
            board.level = level;
            let base = level.base_step_interval();
            for entity in board.entities.values_mut() {
                if let Some(motion) = entity.motion_mut() {
                    motion.set_base_interval(base);
                }
            }
            info!("level changed to {level:?}");
        }
        Command::NotifyResize => out.push(Event::BoardResized {
            rows: board.rows,
            cols: board.cols,
        }),
    }
    Ok(())
}

/// Query functions that provide read-only access to the board state.
pub mod query {
    use std::time::Duration;

    use super::{Board, Entity};
    use dodge_core::{Area, EntityId, EntityKind, Footprint, GameLevel, MoveOutcome, Position};
    use dodge_system_movement::Motion;

    /// Read-only description of an entity.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EntityView {
        /// Identifier of the entity.
        pub id: EntityId,
        /// Role of the entity.
        pub kind: EntityKind,
        /// Upper-left cell of the entity.
        pub position: Position,
        /// Cells covered by the entity.
        pub footprint: Footprint,
        /// Whether the entity has been placed.
        pub positioned: bool,
        /// Remaining life for players and enemies.
        pub life: Option<u32>,
    }

    fn view(entity: &Entity) -> EntityView {
        EntityView {
            id: entity.id,
            kind: entity.kind(),
            position: entity.position,
            footprint: entity.footprint,
            positioned: entity.positioned,
            life: entity.life(),
        }
    }

    /// Grid dimensions as `(rows, cols)`.
    #[must_use]
    pub fn dimensions(board: &Board) -> (i32, i32) {
        (board.rows, board.cols)
    }

    /// Active difficulty level.
    #[must_use]
    pub fn level(board: &Board) -> GameLevel {
        board.level
    }

    /// Central area kept free of enemies and obstacles at start.
    #[must_use]
    pub fn safe_area(board: &Board) -> Area {
        board.safe_area
    }

    /// Whether every entity has been placed at least once.
    #[must_use]
    pub fn all_entities_positioned(board: &Board) -> bool {
        board.all_positioned
    }

    /// Describes a single entity.
    #[must_use]
    pub fn entity(board: &Board, id: EntityId) -> Option<EntityView> {
        board.entities.get(&id).map(view)
    }

    /// Describes every entity, ordered by id.
    #[must_use]
    pub fn entities(board: &Board) -> Vec<EntityView> {
        board.entities.values().map(view).collect()
    }

    /// Describes the player while it is alive.
    #[must_use]
    pub fn player(board: &Board) -> Option<EntityView> {
        entity(board, EntityId::PLAYER)
    }

    /// Identifiers of every living enemy, ascending.
    #[must_use]
    pub fn enemy_ids(board: &Board) -> Vec<EntityId> {
        board.enemy_ids()
    }

    /// Number of living enemies.
    #[must_use]
    pub fn enemy_count(board: &Board) -> usize {
        board
            .entities
            .values()
            .filter(|entity| entity.kind() == EntityKind::Enemy)
            .count()
    }

    /// Movement state of an enemy.
    #[must_use]
    pub fn motion(board: &Board, id: EntityId) -> Option<&Motion> {
        board.entities.get(&id).and_then(Entity::motion)
    }

    /// Interval until the enemy's next scheduled tick.
    #[must_use]
    pub fn step_interval(board: &Board, id: EntityId) -> Option<Duration> {
        motion(board, id).map(Motion::current_interval)
    }

    /// Checks whether `id` could be placed at `target` without committing anything.
    #[must_use]
    pub fn placement_outcome(
        board: &Board,
        id: EntityId,
        target: Position,
    ) -> Option<MoveOutcome> {
        let entity = board.entities.get(&id)?;
        Some(board.check_fresh(id, entity.footprint, target))
    }
}
