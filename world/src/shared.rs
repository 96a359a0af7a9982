//! Thread-safe handle used while entities are placed one at a time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dodge_core::{Command, EntityId, Event};

use crate::{apply, Board, BoardError};

/// Board shared between the threads that finalise entity footprints.
///
/// Every call takes the same lock, so concurrent placements never observe a
/// half-committed registry.
#[derive(Clone, Debug)]
pub struct SharedBoard {
    inner: Arc<Mutex<Board>>,
}

impl SharedBoard {
    /// Wraps a board for shared access.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            inner: Arc::new(Mutex::new(board)),
        }
    }

    /// Places a single entity and returns the events it produced.
    pub fn place(&self, entity: EntityId) -> Result<Vec<Event>, BoardError> {
        self.apply(Command::PlaceEntity { entity })
    }

    /// Executes any command under the lock.
    pub fn apply(&self, command: Command) -> Result<Vec<Event>, BoardError> {
        let mut events = Vec::new();
        apply(&mut *self.lock(), command, &mut events)?;
        Ok(events)
    }

    /// Runs `read` against the locked board.
    pub fn with<T>(&self, read: impl FnOnce(&Board) -> T) -> T {
        read(&*self.lock())
    }

    /// Takes the board back when this is the last handle.
    pub fn into_inner(self) -> Result<Board, Self> {
        Arc::try_unwrap(self.inner)
            .map(|mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner))
            .map_err(|inner| Self { inner })
    }

    fn lock(&self) -> MutexGuard<'_, Board> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{query, BoardConfig};
    use dodge_core::{EntityKind, Footprint};

    #[test]
    fn concurrent_placements_never_overlap() {
        let mut board = Board::new(BoardConfig {
            rows: 40,
            cols: 40,
            seed: 11,
            ..BoardConfig::default()
        })
        .expect("board");
        apply(
            &mut board,
            Command::Populate {
                enemies: 12,
                obstacles: 6,
            },
            &mut Vec::new(),
        )
        .expect("populate");
        let ids: Vec<EntityId> = query::entities(&board).iter().map(|view| view.id).collect();
        let shared = SharedBoard::new(board);

        let handles: Vec<_> = ids
            .chunks(5)
            .map(|chunk| {
                let shared = shared.clone();
                let chunk = chunk.to_vec();
                thread::spawn(move || {
                    for id in chunk {
                        let footprint = if id == EntityId::PLAYER {
                            Footprint::UNIT
                        } else {
                            Footprint::new(1, 2)
                        };
                        let _ = shared
                            .apply(Command::SetFootprint {
                                entity: id,
                                footprint,
                            })
                            .expect("footprint");
                        let _ = shared.place(id).expect("place");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker");
        }

        let board = shared.into_inner().expect("sole handle");
        assert!(query::all_entities_positioned(&board));
        let views = query::entities(&board);
        for (index, a) in views.iter().enumerate() {
            let a_rect = dodge_core::CellRect::new(a.position, a.footprint);
            for b in &views[index + 1..] {
                let b_rect = dodge_core::CellRect::new(b.position, b.footprint);
                assert!(!a_rect.overlaps(&b_rect), "{a:?} overlaps {b:?}");
            }
        }
        assert_eq!(
            query::player(&board).map(|view| view.kind),
            Some(EntityKind::Player)
        );
    }
}
