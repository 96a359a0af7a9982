//! Swept-rectangle move validation.
//!
//! Each moving axis is scanned from the leading edge of the old rectangle to
//! the leading edge of the new one, inclusive on both ends, so an entity can
//! never end a move flush against another. The perpendicular axis is compared
//! against the mover's current rectangle.

use std::collections::BTreeMap;

use dodge_core::{CellRect, EntityId, MoveOutcome, MoveResult, Position};

use crate::entity::Entity;

/// How a candidate rectangle is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Sweep {
    /// First placement: only the destination rectangle matters.
    Fresh,
    /// Regular move from the current position.
    Move,
}

/// Classifies a move of `mover` from `current` to `target`.
///
/// Unpositioned entities are ignored. The first blocker in id order is
/// reported.
pub(crate) fn validate(
    entities: &BTreeMap<EntityId, Entity>,
    dimensions: (i32, i32),
    mover: EntityId,
    current: CellRect,
    target: Position,
    sweep: Sweep,
) -> MoveOutcome {
    if sweep == Sweep::Move && current.origin() == target {
        return MoveOutcome::CLEAR;
    }

    let (rows, cols) = dimensions;
    let footprint = current.footprint();
    let destination = CellRect::new(target, footprint);
    let mut bounds = MoveResult::Clear;
    if !destination.rows_within(rows) {
        bounds = bounds.with_row_block();
    }
    if !destination.cols_within(cols) {
        bounds = bounds.with_column_block();
    }
    if !bounds.is_clear() {
        return MoveOutcome::boundary(bounds);
    }

    let (row_scan, col_scan, anchor) = match sweep {
        Sweep::Fresh => (
            (target.row(), target.row() + footprint.rows()),
            (target.col(), target.col() + footprint.cols()),
            destination,
        ),
        Sweep::Move => (
            axis_scan(current.origin().row(), target.row(), footprint.rows()),
            axis_scan(current.origin().col(), target.col(), footprint.cols()),
            current,
        ),
    };

    for other in entities.values() {
        if other.id == mover || !other.positioned {
            continue;
        }
        let rect = other.rect();
        let other_rows = (rect.origin().row(), rect.end_row());
        let other_cols = (rect.origin().col(), rect.end_col());
        let rows_touch = touches(other_rows, (anchor.origin().row(), anchor.end_row()));
        let cols_touch = touches(other_cols, (anchor.origin().col(), anchor.end_col()));

        let mut result = MoveResult::Clear;
        if col_scan.0 != col_scan.1 && touches(other_cols, col_scan) && rows_touch {
            result = result.with_column_block();
        }
        if row_scan.0 != row_scan.1 && touches(other_rows, row_scan) && cols_touch {
            result = result.with_row_block();
        }
        if !result.is_clear() {
            return MoveOutcome {
                result,
                blocker: Some(other.id),
            };
        }
    }

    MoveOutcome::CLEAR
}

fn axis_scan(from: i32, to: i32, span: i32) -> (i32, i32) {
    if to > from {
        (from + span, to + span)
    } else {
        (to, from)
    }
}

fn touches(span: (i32, i32), scan: (i32, i32)) -> bool {
    span.0 <= scan.1 && span.1 >= scan.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Role;
    use dodge_core::Footprint;

    fn obstacle(id: u32, row: i32, col: i32) -> (EntityId, Entity) {
        let mut entity = Entity::new(EntityId::new(id), Role::Obstacle);
        entity.position = Position::new(row, col);
        entity.positioned = true;
        (entity.id, entity)
    }

    fn unit(row: i32, col: i32) -> CellRect {
        CellRect::new(Position::new(row, col), Footprint::UNIT)
    }

    fn player_move(entities: &BTreeMap<EntityId, Entity>, row: i32, col: i32) -> MoveOutcome {
        validate(
            entities,
            (10, 10),
            EntityId::PLAYER,
            unit(4, 4),
            Position::new(row, col),
            Sweep::Move,
        )
    }

    #[test]
    fn stationary_move_is_clear() {
        let entities: BTreeMap<_, _> = [obstacle(2, 4, 4)].into_iter().collect();
        let outcome = player_move(&entities, 4, 4);
        assert_eq!(outcome, MoveOutcome::CLEAR);
    }

    #[test]
    fn boundary_blocks_by_axis() {
        let entities = BTreeMap::new();
        let check = |target| {
            validate(&entities, (10, 10), EntityId::PLAYER, unit(0, 0), target, Sweep::Move).result
        };
        assert_eq!(check(Position::new(-1, 0)), MoveResult::RowBlock);
        assert_eq!(check(Position::new(0, -1)), MoveResult::ColumnBlock);
        assert_eq!(check(Position::new(-1, -1)), MoveResult::TotalBlock);
    }

    #[test]
    fn neighbour_in_path_blocks_column_axis() {
        let entities: BTreeMap<_, _> = [obstacle(5, 4, 5)].into_iter().collect();
        let outcome = player_move(&entities, 4, 5);
        assert_eq!(outcome.result, MoveResult::ColumnBlock);
        assert_eq!(outcome.blocker, Some(EntityId::new(5)));
    }

    #[test]
    fn moving_flush_against_another_is_blocked() {
        let entities: BTreeMap<_, _> = [obstacle(3, 6, 4)].into_iter().collect();
        let outcome = player_move(&entities, 5, 4);
        assert_eq!(outcome.result, MoveResult::RowBlock);
    }

    #[test]
    fn distant_entities_do_not_block() {
        let entities: BTreeMap<_, _> =
            [obstacle(3, 4, 7), obstacle(4, 8, 4)].into_iter().collect();
        let outcome = player_move(&entities, 4, 5);
        assert!(outcome.is_clear());
    }

    #[test]
    fn fresh_placement_on_occupied_cell_is_total_block() {
        let entities: BTreeMap<_, _> = [obstacle(3, 2, 2)].into_iter().collect();
        let outcome = validate(
            &entities,
            (10, 10),
            EntityId::new(9),
            unit(0, 0),
            Position::new(2, 2),
            Sweep::Fresh,
        );
        assert_eq!(outcome.result, MoveResult::TotalBlock);
        assert_eq!(outcome.blocker, Some(EntityId::new(3)));
    }

    #[test]
    fn lowest_id_blocker_is_reported() {
        let entities: BTreeMap<_, _> =
            [obstacle(7, 4, 5), obstacle(3, 5, 5)].into_iter().collect();
        let outcome = player_move(&entities, 4, 5);
        assert_eq!(outcome.blocker, Some(EntityId::new(3)));
    }

    #[test]
    fn unpositioned_entities_are_ignored() {
        let (id, mut entity) = obstacle(3, 4, 5);
        entity.positioned = false;
        let entities: BTreeMap<_, _> = [(id, entity)].into_iter().collect();
        let outcome = player_move(&entities, 4, 5);
        assert!(outcome.is_clear());
    }
}
