//! Board-backed view handed to an enemy's motion during a tick.

use dodge_core::{CellRect, EntityId, Event, Footprint, MoveOutcome, Position};
use dodge_system_movement::Arena;

use crate::Board;

pub(crate) struct EnemyArena<'a> {
    pub(crate) board: &'a mut Board,
    pub(crate) enemy: EntityId,
    pub(crate) out: &'a mut Vec<Event>,
}

impl Arena for EnemyArena<'_> {
    fn position(&self) -> Position {
        self.board
            .entities
            .get(&self.enemy)
            .map(|entity| entity.position)
            .unwrap_or_default()
    }

    fn footprint(&self) -> Footprint {
        self.board
            .entities
            .get(&self.enemy)
            .map(|entity| entity.footprint)
            .unwrap_or_default()
    }

    fn dimensions(&self) -> (i32, i32) {
        (self.board.rows, self.board.cols)
    }

    fn player(&self) -> Option<CellRect> {
        self.board.player_rect()
    }

    fn try_move(&mut self, target: Position) -> MoveOutcome {
        self.board.move_entity(self.enemy, target, self.out)
    }

    fn is_alive(&self) -> bool {
        self.board.entities.contains_key(&self.enemy)
    }
}
