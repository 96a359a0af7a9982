use std::collections::BTreeSet;

use dodge_core::{
    snapshot::BoardSnapshot, CellRect, Command, Direction, EntityId, EntityKind, Event, GameLevel,
    MoveResult, Position,
};
use dodge_world::{self as world, query, Board, BoardConfig};
use proptest::prelude::*;

fn populated(rows: i32, cols: i32, enemies: u32, obstacles: u32, seed: u64) -> Board {
    let mut board = Board::new(BoardConfig {
        rows,
        cols,
        seed,
        ..BoardConfig::default()
    })
    .expect("board");
    let mut events = Vec::new();
    world::apply(&mut board, Command::Populate { enemies, obstacles }, &mut events)
        .expect("populate");
    world::apply(&mut board, Command::PlaceAll, &mut events).expect("place");
    board
}

fn assert_disjoint_and_inside(board: &Board) {
    let (rows, cols) = query::dimensions(board);
    let views = query::entities(board);
    for (index, view) in views.iter().enumerate() {
        let rect = CellRect::new(view.position, view.footprint);
        assert!(rect.fits_within(rows, cols), "{view:?} leaves the grid");
        for other in &views[index + 1..] {
            let other_rect = CellRect::new(other.position, other.footprint);
            assert!(!rect.overlaps(&other_rect), "{view:?} overlaps {other:?}");
        }
    }
}

fn direction(index: u8) -> Direction {
    match index % 5 {
        0 => Direction::UP,
        1 => Direction::DOWN,
        2 => Direction::LEFT,
        3 => Direction::RIGHT,
        _ => Direction::NONE,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn entities_never_overlap_or_leave_the_grid(
        rows in 16i32..36,
        cols in 16i32..36,
        enemies in 0u32..6,
        obstacles in 0u32..4,
        seed in any::<u64>(),
        inputs in prop::collection::vec(any::<u8>(), 1..80),
    ) {
        let mut board = populated(rows, cols, enemies, obstacles, seed);
        assert_disjoint_and_inside(&board);

        let mut events = Vec::new();
        for input in inputs {
            for enemy in query::enemy_ids(&board) {
                world::apply(&mut board, Command::StepEnemy { enemy }, &mut events)
                    .expect("step");
            }
            world::apply(
                &mut board,
                Command::MovePlayer { direction: direction(input) },
                &mut events,
            )
            .expect("move");
            assert_disjoint_and_inside(&board);
        }
    }

    #[test]
    fn populate_assigns_unique_ids(
        enemies in 0u32..10,
        obstacles in 0u32..6,
        seed in any::<u64>(),
    ) {
        let board = populated(30, 30, enemies, obstacles, seed);
        let ids: BTreeSet<EntityId> = query::entities(&board).iter().map(|view| view.id).collect();
        prop_assert_eq!(ids.len() as u32, 1 + enemies + obstacles);
        prop_assert_eq!(
            query::player(&board).map(|view| view.kind),
            Some(EntityKind::Player)
        );
    }
}

fn ten_by_ten(entities: Vec<dodge_core::snapshot::EntitySnapshot>) -> Board {
    let snapshot = BoardSnapshot {
        rows: 10,
        cols: 10,
        level: GameLevel::Beginner,
        elapsed_secs: 0,
        entities,
    };
    Board::from_snapshot(BoardConfig::default(), &snapshot, &mut Vec::new()).expect("restore")
}

fn unit(id: u32, kind: EntityKind, row: i32, col: i32) -> dodge_core::snapshot::EntitySnapshot {
    dodge_core::snapshot::EntitySnapshot {
        id: EntityId::new(id),
        kind,
        position: Position::new(row, col),
        footprint: dodge_core::Footprint::UNIT,
        life: None,
        step_size: None,
        motion: None,
    }
}

#[test]
fn obstacle_to_the_right_blocks_the_player_column() {
    let mut board = ten_by_ten(vec![
        unit(1, EntityKind::Player, 4, 4),
        unit(2, EntityKind::Obstacle, 4, 5),
    ]);
    let mut events = Vec::new();

    world::apply(
        &mut board,
        Command::MovePlayer {
            direction: Direction::RIGHT,
        },
        &mut events,
    )
    .expect("move");

    assert!(events.is_empty());
    assert_eq!(
        query::player(&board).map(|view| view.position),
        Some(Position::new(4, 4))
    );
    let outcome = board.move_player(Direction::RIGHT, &mut events);
    assert_eq!(outcome.map(|outcome| outcome.result), Some(MoveResult::ColumnBlock));
    assert_eq!(outcome.and_then(|outcome| outcome.blocker), Some(EntityId::new(2)));
}

#[test]
fn player_dies_after_repeated_collisions() {
    let mut board = ten_by_ten(vec![unit(1, EntityKind::Player, 4, 4)]);
    let mut events = Vec::new();
    let mut id = 2;

    while query::player(&board).is_some() {
        let enemy = unit(id, EntityKind::Enemy, 4, 6);
        let mut snapshot = board.export(0);
        snapshot.entities.push(enemy);
        board = Board::from_snapshot(BoardConfig::default(), &snapshot, &mut Vec::new())
            .expect("restore");
        for _ in 0..3 {
            if query::player(&board).is_none() {
                break;
            }
            let _ = board
                .try_move(EntityId::PLAYER, Position::new(4, 5), &mut events)
                .expect("bump");
        }
        id += 1;
        assert!(id < 20, "player never died");
    }

    assert!(events.contains(&Event::EntityDied {
        entity: EntityId::PLAYER,
        kind: EntityKind::Player
    }));
    assert_eq!(query::player(&board), None);
}

#[test]
fn exported_board_restores_identically() {
    let board = populated(20, 30, 5, 3, 8);
    let snapshot = board.export(42);
    assert_eq!(snapshot.elapsed_secs, 42);
    assert_eq!(snapshot.entities.len(), 9);

    let restored =
        Board::from_snapshot(BoardConfig::default(), &snapshot, &mut Vec::new()).expect("restore");
    assert_eq!(query::entities(&restored), query::entities(&board));
    assert_eq!(restored.export(42), snapshot);
}
