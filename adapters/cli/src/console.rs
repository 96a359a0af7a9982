//! ASCII rendition of the board for console mode.

use dodge_core::EntityKind;
use dodge_world::{query, Board};

const EMPTY: char = '.';

fn glyph(kind: EntityKind) -> char {
    match kind {
        EntityKind::Player => 'P',
        EntityKind::Enemy => 'E',
        EntityKind::Obstacle => '#',
    }
}

/// Draws every positioned entity over a grid of empty cells, one line per row.
pub(crate) fn render(board: &Board) -> String {
    let (rows, cols) = query::dimensions(board);
    let width = usize::try_from(cols).unwrap_or(0);
    let height = usize::try_from(rows).unwrap_or(0);
    let mut cells = vec![vec![EMPTY; width]; height];

    for view in query::entities(board).into_iter().filter(|view| view.positioned) {
        let row_span = view.position.row()..view.position.row() + view.footprint.rows();
        for row in row_span {
            let col_span = view.position.col()..view.position.col() + view.footprint.cols();
            for col in col_span {
                let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
                    continue;
                };
                if let Some(cell) = cells.get_mut(row).and_then(|line| line.get_mut(col)) {
                    *cell = glyph(view.kind);
                }
            }
        }
    }

    let mut output = String::with_capacity((width + 1) * height);
    for line in cells {
        output.extend(line);
        output.push('\n');
    }
    output
}

/// One-line summary of the game state.
pub(crate) fn status(board: &Board, elapsed_secs: u64) -> String {
    let life = query::player(board)
        .and_then(|view| view.life)
        .map_or_else(|| "dead".to_owned(), |life| life.to_string());
    format!(
        "time {elapsed_secs}s | player life {life} | enemies {}",
        query::enemy_count(board)
    )
}
