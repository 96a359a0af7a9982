use std::thread;

use dodge_core::{Command, EntityId, EntityKind, Event, Footprint};
use dodge_world::{apply, query, Board, BoardConfig, SharedBoard};

fn populated(seed: u64) -> Board {
    let mut board = Board::new(BoardConfig {
        rows: 30,
        cols: 60,
        seed,
        ..BoardConfig::default()
    })
    .expect("board");
    apply(
        &mut board,
        Command::Populate {
            enemies: 8,
            obstacles: 3,
        },
        &mut Vec::new(),
    )
    .expect("populate");
    board
}

#[test]
fn presentation_threads_place_every_entity_once() {
    let board = populated(21);
    let roster: Vec<(EntityId, EntityKind)> = query::entities(&board)
        .iter()
        .map(|view| (view.id, view.kind))
        .collect();
    let shared = SharedBoard::new(board);

    let workers: Vec<_> = [EntityKind::Player, EntityKind::Enemy, EntityKind::Obstacle]
        .into_iter()
        .map(|kind| {
            let shared = shared.clone();
            let mine: Vec<EntityId> = roster
                .iter()
                .filter(|(_, role)| *role == kind)
                .map(|(id, _)| *id)
                .collect();
            thread::spawn(move || {
                let mut events = Vec::new();
                for id in mine {
                    let footprint = match kind {
                        EntityKind::Obstacle => Footprint::new(2, 3),
                        EntityKind::Player | EntityKind::Enemy => Footprint::UNIT,
                    };
                    events.extend(
                        shared
                            .apply(Command::SetFootprint {
                                entity: id,
                                footprint,
                            })
                            .expect("footprint"),
                    );
                    events.extend(shared.place(id).expect("place"));
                }
                events
            })
        })
        .collect();

    let events: Vec<Event> = workers
        .into_iter()
        .flat_map(|worker| worker.join().expect("worker"))
        .collect();

    let board = shared.into_inner().expect("sole handle");
    assert!(query::all_entities_positioned(&board));
    let placed = events
        .iter()
        .filter(|event| matches!(event, Event::EntityPlaced { .. }))
        .count();
    assert_eq!(placed, roster.len());
    let announced = events
        .iter()
        .filter(|event| **event == Event::AllEntitiesPositioned)
        .count();
    assert_eq!(announced, 1);
    for view in query::entities(&board) {
        if view.kind == EntityKind::Obstacle {
            assert_eq!(view.footprint, Footprint::new(2, 3));
        }
    }
}

#[test]
fn enemies_wait_until_the_last_entity_is_placed() {
    let board = populated(8);
    let enemy = query::enemy_ids(&board)[0];
    let shared = SharedBoard::new(board);

    let _ = shared.place(EntityId::PLAYER).expect("player");
    let _ = shared.place(enemy).expect("enemy");
    let before = shared.with(|board| query::entity(board, enemy).map(|view| view.position));
    let idle = shared.apply(Command::StepEnemy { enemy }).expect("step");
    assert!(idle.is_empty());
    assert_eq!(
        shared.with(|board| query::entity(board, enemy).map(|view| view.position)),
        before
    );

    let _ = shared.apply(Command::PlaceAll).expect("rest");
    let board = shared.into_inner().expect("sole handle");
    assert!(query::all_entities_positioned(&board));
}
