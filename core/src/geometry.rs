//! Cell-grid geometry shared by the board and the movement system.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Location of a cell expressed as row and column indices.
///
/// Coordinates are signed so that candidate targets may fall outside the grid
/// and be rejected by boundary checks instead of wrapping.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    row: i32,
    col: i32,
}

impl Position {
    /// Creates a new position from row and column indices.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Returns a copy shifted by the provided row and column deltas.
    #[must_use]
    pub const fn offset(self, rows: i32, cols: i32) -> Self {
        Self {
            row: self.row + rows,
            col: self.col + cols,
        }
    }

    /// Returns a copy with the row replaced.
    #[must_use]
    pub const fn with_row(self, row: i32) -> Self {
        Self { row, col: self.col }
    }

    /// Returns a copy with the column replaced.
    #[must_use]
    pub const fn with_col(self, col: i32) -> Self {
        Self { row: self.row, col }
    }
}

/// Number of rows and columns an entity occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    rows: i32,
    cols: i32,
}

impl Footprint {
    /// Footprint of a single cell.
    pub const UNIT: Self = Self { rows: 1, cols: 1 };

    /// Creates a footprint, clamping both spans to at least one cell.
    #[must_use]
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Row span in cells.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Column span in cells.
    #[must_use]
    pub const fn cols(&self) -> i32 {
        self.cols
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Axis-aligned rectangle formed by a footprint anchored at a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: Position,
    footprint: Footprint,
}

impl CellRect {
    /// Anchors the footprint at the provided upper-left cell.
    #[must_use]
    pub const fn new(origin: Position, footprint: Footprint) -> Self {
        Self { origin, footprint }
    }

    /// Upper-left cell of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// First row past the bottom edge.
    #[must_use]
    pub const fn end_row(&self) -> i32 {
        self.origin.row + self.footprint.rows
    }

    /// First column past the right edge.
    #[must_use]
    pub const fn end_col(&self) -> i32 {
        self.origin.col + self.footprint.cols
    }

    /// Reports whether the two rectangles share at least one cell.
    #[must_use]
    pub fn overlaps(&self, other: &CellRect) -> bool {
        self.origin.row < other.end_row()
            && other.origin.row < self.end_row()
            && self.origin.col < other.end_col()
            && other.origin.col < self.end_col()
    }

    /// Reports whether the rectangle lies within `[0, rows) x [0, cols)`.
    #[must_use]
    pub fn fits_within(&self, rows: i32, cols: i32) -> bool {
        self.rows_within(rows) && self.cols_within(cols)
    }

    /// Reports whether the rectangle lies within `[0, rows)` on the row axis.
    #[must_use]
    pub fn rows_within(&self, rows: i32) -> bool {
        self.origin.row >= 0 && self.end_row() <= rows
    }

    /// Reports whether the rectangle lies within `[0, cols)` on the column axis.
    #[must_use]
    pub fn cols_within(&self, cols: i32) -> bool {
        self.origin.col >= 0 && self.end_col() <= cols
    }
}

/// Rectangular region of anchor cells, half-open on both axes.
///
/// Areas describe where an entity's upper-left cell may be sampled from, or
/// where it must not land.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Area {
    /// First row of the area.
    pub start_row: i32,
    /// First row past the area.
    pub end_row: i32,
    /// First column of the area.
    pub start_col: i32,
    /// First column past the area.
    pub end_col: i32,
}

impl Area {
    /// Creates an area from half-open row and column ranges.
    #[must_use]
    pub const fn new(start_row: i32, end_row: i32, start_col: i32, end_col: i32) -> Self {
        Self {
            start_row,
            end_row,
            start_col,
            end_col,
        }
    }

    /// Area covering a whole `rows x cols` grid.
    #[must_use]
    pub const fn grid(rows: i32, cols: i32) -> Self {
        Self::new(0, rows, 0, cols)
    }

    /// Reports whether the area contains no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start_row >= self.end_row || self.start_col >= self.end_col
    }

    /// Reports whether the position falls inside the area.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row >= self.start_row
            && position.row < self.end_row
            && position.col >= self.start_col
            && position.col < self.end_col
    }

    /// Reports whether every cell of `other` also lies inside this area.
    #[must_use]
    pub const fn covers(&self, other: &Area) -> bool {
        other.is_empty()
            || (self.start_row <= other.start_row
                && self.end_row >= other.end_row
                && self.start_col <= other.start_col
                && self.end_col >= other.end_col)
    }

    /// Grows the top and left edges outward by the footprint.
    ///
    /// An anchor just above or left of the area would otherwise place the
    /// footprint's far cells inside it.
    #[must_use]
    pub const fn expand_near_edges(self, footprint: Footprint) -> Self {
        Self {
            start_row: self.start_row - footprint.rows,
            end_row: self.end_row,
            start_col: self.start_col - footprint.cols,
            end_col: self.end_col,
        }
    }

    /// Pulls the bottom and right edges inward by the footprint.
    #[must_use]
    pub const fn shrink_far_edges(self, footprint: Footprint) -> Self {
        Self {
            start_row: self.start_row,
            end_row: self.end_row - footprint.rows,
            start_col: self.start_col,
            end_col: self.end_col - footprint.cols,
        }
    }

    /// Samples a uniformly random anchor inside the area and outside `excluded`.
    ///
    /// An exclusion that covers the whole area is ignored. An empty area
    /// yields its start corner.
    pub fn random_position<R>(&self, rng: &mut R, excluded: Option<&Area>) -> Position
    where
        R: Rng + ?Sized,
    {
        if self.is_empty() {
            return Position::new(self.start_row, self.start_col);
        }

        let excluded = excluded.filter(|area| !area.covers(self));
        loop {
            let col = rng.gen_range(self.start_col..self.end_col);
            let row = rng.gen_range(self.start_row..self.end_row);
            let candidate = Position::new(row, col);
            match excluded {
                Some(area) if area.contains(candidate) => continue,
                _ => return candidate,
            }
        }
    }
}
