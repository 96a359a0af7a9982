//! Initial scattering of entities over the grid.
//!
//! The player always takes the exact center. Obstacles are spread over a
//! lattice of cells and enemies over the whole grid; both stay out of the
//! central safe area.

use dodge_core::{Area, CellRect, EntityId, EntityKind, Event, Footprint, MoveOutcome, Position};
use log::{debug, info};

use crate::{
    collision::{self, Sweep},
    Board, BoardError,
};

const LATTICE_ATTEMPTS: u32 = 256;
const SCATTER_ATTEMPTS: u32 = 100_000;

/// Central third of the grid kept free of enemies and obstacles at start.
pub(crate) fn safe_area(rows: i32, cols: i32) -> Area {
    Area::new(rows / 3, rows / 3 * 2 + 1, cols / 3, cols / 3 * 2 + 1)
}

/// Number of single-cell entities the grid is expected to hold outside the
/// safe area, given that placed entities never touch.
pub(crate) fn capacity(rows: i32, cols: i32, safe: Area) -> u32 {
    let excluded = safe.expand_near_edges(Footprint::UNIT);
    let clipped_rows = (excluded.end_row.min(rows) - excluded.start_row.max(0)).max(0);
    let clipped_cols = (excluded.end_col.min(cols) - excluded.start_col.max(0)).max(0);
    let free = rows * cols - clipped_rows * clipped_cols;
    u32::try_from(free / 4).unwrap_or(0)
}

/// Grid of cells obstacles are spread over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Lattice {
    horizontal: i32,
    vertical: i32,
}

impl Lattice {
    /// Derives the lattice for `count` obstacles from the grid's aspect ratio.
    pub(crate) fn for_obstacles(count: u32, rows: i32, cols: i32) -> Self {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        let ratio = f64::from(cols) / f64::from(rows.max(1));
        let horizontal = ((f64::from(count) / ratio).round() as i32).max(1);
        let vertical = ((count + horizontal - 1) / horizontal).max(1);
        Self {
            horizontal,
            vertical,
        }
    }

    /// Anchor area of the `index`-th obstacle, or `None` when the lattice cell
    /// cannot hold the footprint.
    pub(crate) fn cell(
        &self,
        index: usize,
        rows: i32,
        cols: i32,
        footprint: Footprint,
    ) -> Option<Area> {
        let index = i32::try_from(index).ok()?;
        let column = index % self.horizontal;
        let row = index / self.horizontal;
        let width = cols / self.horizontal;
        let height = rows / self.vertical;
        let area = Area::new(
            height * row,
            height * (row + 1),
            width * column,
            width * (column + 1),
        )
        .shrink_far_edges(footprint);
        (!area.is_empty()).then_some(area)
    }
}

impl Default for Lattice {
    fn default() -> Self {
        Self {
            horizontal: 1,
            vertical: 1,
        }
    }
}

impl Board {
    /// Places a single unpositioned entity and announces it.
    pub(crate) fn place(&mut self, id: EntityId, out: &mut Vec<Event>) -> Result<(), BoardError> {
        let entity = self.entities.get(&id).ok_or(BoardError::UnknownEntity(id))?;
        if entity.positioned {
            debug!("entity {id} is already placed");
            return Ok(());
        }
        let footprint = entity.footprint;
        let kind = entity.kind();

        let position = match kind {
            EntityKind::Player => {
                let center = Position::new(
                    (self.rows - footprint.rows()) / 2,
                    (self.cols - footprint.cols()) / 2,
                );
                let outcome = self.check_fresh(id, footprint, center);
                if !outcome.is_clear() {
                    return Err(BoardError::PlayerPlacement {
                        position: center,
                        result: outcome.result,
                    });
                }
                center
            }
            EntityKind::Enemy | EntityKind::Obstacle => self.scatter(id, footprint, kind)?,
        };

        if let Some(entity) = self.entities.get_mut(&id) {
            entity.position = position;
            entity.positioned = true;
        }
        self.positioned += 1;
        debug!("placed {kind:?} {id} at ({}, {})", position.row(), position.col());
        out.push(Event::EntityPlaced {
            entity: id,
            position,
        });

        if kind == EntityKind::Enemy {
            let mut scratch = Vec::new();
            self.drive_enemy(id, &mut scratch, |motion, arena| motion.placed(&*arena));
        }
        self.note_positioning(out);
        Ok(())
    }

    /// Places every unpositioned entity in id order, which puts the player first.
    pub(crate) fn place_all(&mut self, out: &mut Vec<Event>) -> Result<(), BoardError> {
        let pending: Vec<EntityId> = self
            .entities
            .values()
            .filter(|entity| !entity.positioned)
            .map(|entity| entity.id)
            .collect();
        for id in pending {
            self.place(id, out)?;
        }
        Ok(())
    }

    pub(crate) fn note_positioning(&mut self, out: &mut Vec<Event>) {
        if !self.all_positioned
            && !self.entities.is_empty()
            && self.positioned == self.entities.len()
        {
            self.all_positioned = true;
            info!("all {} entities positioned", self.positioned);
            out.push(Event::AllEntitiesPositioned);
        }
    }

    pub(crate) fn check_fresh(
        &self,
        id: EntityId,
        footprint: Footprint,
        target: Position,
    ) -> MoveOutcome {
        collision::validate(
            &self.entities,
            (self.rows, self.cols),
            id,
            CellRect::new(target, footprint),
            target,
            Sweep::Fresh,
        )
    }

    fn scatter(
        &mut self,
        id: EntityId,
        footprint: Footprint,
        kind: EntityKind,
    ) -> Result<Position, BoardError> {
        let excluded = self.safe_area.expand_near_edges(footprint);

        if kind == EntityKind::Obstacle {
            let index = self
                .entities
                .values()
                .filter(|entity| entity.positioned && entity.kind() == EntityKind::Obstacle)
                .count();
            match self.lattice.cell(index, self.rows, self.cols, footprint) {
                Some(cell) => {
                    for _ in 0..LATTICE_ATTEMPTS {
                        let candidate = cell.random_position(&mut self.rng, Some(&excluded));
                        if self.check_fresh(id, footprint, candidate).is_clear() {
                            return Ok(candidate);
                        }
                    }
                    debug!("lattice cell {index} is full, scattering obstacle {id} freely");
                }
                None => debug!("lattice cell {index} cannot hold obstacle {id}"),
            }
        }

        let anchors = Area::grid(
            self.rows - footprint.rows() + 1,
            self.cols - footprint.cols() + 1,
        );
        if anchors.is_empty() {
            return Err(BoardError::NoRoom(id));
        }
        for _ in 0..SCATTER_ATTEMPTS {
            let candidate = anchors.random_position(&mut self.rng, Some(&excluded));
            if self.check_fresh(id, footprint, candidate).is_clear() {
                return Ok(candidate);
            }
        }
        Err(BoardError::NoRoom(id))
    }
}
