//! Registry records for the entities living on the board.

use dodge_core::{CellRect, EntityId, EntityKind, Footprint, Position};
use dodge_system_movement::Motion;

/// Entity stored inside the board registry.
#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) footprint: Footprint,
    pub(crate) position: Position,
    pub(crate) positioned: bool,
    pub(crate) role: Role,
}

/// Type-specific state of an entity.
#[derive(Clone, Debug)]
pub(crate) enum Role {
    Player { life: u32, step: i32 },
    Enemy { life: u32, motion: Motion },
    Obstacle,
}

impl Entity {
    pub(crate) fn new(id: EntityId, role: Role) -> Self {
        Self {
            id,
            footprint: Footprint::UNIT,
            position: Position::default(),
            positioned: false,
            role,
        }
    }

    pub(crate) fn kind(&self) -> EntityKind {
        match self.role {
            Role::Player { .. } => EntityKind::Player,
            Role::Enemy { .. } => EntityKind::Enemy,
            Role::Obstacle => EntityKind::Obstacle,
        }
    }

    pub(crate) fn rect(&self) -> CellRect {
        CellRect::new(self.position, self.footprint)
    }

    pub(crate) fn life(&self) -> Option<u32> {
        match self.role {
            Role::Player { life, .. } | Role::Enemy { life, .. } => Some(life),
            Role::Obstacle => None,
        }
    }

    pub(crate) fn life_mut(&mut self) -> Option<&mut u32> {
        match &mut self.role {
            Role::Player { life, .. } | Role::Enemy { life, .. } => Some(life),
            Role::Obstacle => None,
        }
    }

    pub(crate) fn motion(&self) -> Option<&Motion> {
        match &self.role {
            Role::Enemy { motion, .. } => Some(motion),
            Role::Player { .. } | Role::Obstacle => None,
        }
    }

    pub(crate) fn motion_mut(&mut self) -> Option<&mut Motion> {
        match &mut self.role {
            Role::Enemy { motion, .. } => Some(motion),
            Role::Player { .. } | Role::Obstacle => None,
        }
    }
}
