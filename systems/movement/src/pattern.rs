//! Target computation for circular and player-following paths.

use dodge_core::{CellRect, Footprint, Position, TargetEdge};

/// Circle an enemy orbits around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Orbit {
    center: Position,
    radius: i32,
    clockwise: bool,
}

impl Orbit {
    /// Fits the largest orbit through `position` that stays on a `rows x cols` grid.
    ///
    /// The center lies toward whichever side of the grid has more room.
    #[must_use]
    pub fn around_spawn(position: Position, footprint: Footprint, rows: i32, cols: i32) -> Self {
        let (row, col) = (position.row(), position.col());
        let row_span = if row > rows / 2 { 0 } else { footprint.rows() };
        let col_span = if col > cols / 2 { 0 } else { footprint.cols() };

        let radius = (row / 2)
            .max((rows - 1 - row - row_span) / 2)
            .min((col / 2).max((cols - 1 - col - col_span) / 2));

        let center_row = if row + row_span + radius * 2 <= rows {
            row + radius
        } else {
            row - radius
        };
        let center_col = if col + col_span + radius * 2 <= cols {
            col + radius
        } else {
            col - radius
        };

        Self {
            center: Position::new(center_row, center_col),
            radius,
            clockwise: true,
        }
    }

    /// Restores a saved orbit; the radius is recomputed on the next step.
    #[must_use]
    pub const fn restore(center: Position, clockwise: bool) -> Self {
        Self {
            center,
            radius: 0,
            clockwise,
        }
    }

    /// Center of the orbit.
    #[must_use]
    pub const fn center(&self) -> Position {
        self.center
    }

    /// Radius of the orbit in cells.
    #[must_use]
    pub const fn radius(&self) -> i32 {
        self.radius
    }

    /// Whether the orbit currently runs clockwise.
    #[must_use]
    pub const fn clockwise(&self) -> bool {
        self.clockwise
    }

    /// Reverses the orientation.
    pub fn flip(&mut self) {
        self.clockwise = !self.clockwise;
    }

    /// Computes the next cell along the circle from `position`.
    ///
    /// The column offset advances by one unit and the row offset follows from
    /// `col^2 + row^2 = r^2`, with the sign chosen by the current half of the
    /// circle and the orientation.
    pub fn next_target(&mut self, position: Position) -> Position {
        let mut col = position.col() - self.center.col();
        let row = f64::from(self.center.row() - position.row());

        if self.radius == 0 {
            self.radius = (f64::from(col).powi(2) + row.powi(2)).sqrt().ceil() as i32;
        }

        let positive = if row > 0.0 && col.abs() < self.radius {
            col += if self.clockwise { 1 } else { -1 };
            true
        } else if row < 0.0 && col.abs() < self.radius {
            col += if self.clockwise { -1 } else { 1 };
            false
        } else if col > 0 {
            col -= 1;
            !self.clockwise
        } else {
            col += 1;
            self.clockwise
        };

        let squared = f64::from(self.radius).powi(2) - f64::from(col).powi(2);
        let mut row = squared.max(0.0).sqrt();
        if !positive {
            row = -row;
        }

        Position::new(
            self.center.row() - row.round() as i32,
            self.center.col() + col,
        )
    }
}

/// Next cell for an enemy chasing `edge` of the player's rectangle.
///
/// Each axis moves at most `step` cells toward the offset anchor. Without a
/// player the enemy stays where it is.
#[must_use]
pub fn following_target(
    position: Position,
    footprint: Footprint,
    step: i32,
    edge: TargetEdge,
    player: Option<CellRect>,
) -> Position {
    let Some(player) = player else {
        return position;
    };
    let anchor = player.origin();
    let goal = match edge {
        TargetEdge::Top => anchor.offset(-footprint.rows(), 0),
        TargetEdge::Left => anchor.offset(0, -footprint.cols()),
        TargetEdge::Bottom => anchor.offset(player.footprint().rows(), 0),
        TargetEdge::Right => anchor.offset(0, player.footprint().cols()),
    };
    Position::new(
        toward(position.row(), goal.row(), step),
        toward(position.col(), goal.col(), step),
    )
}

fn toward(source: i32, target: i32, step: i32) -> i32 {
    let distance = (target - source).abs().min(step);
    if target > source {
        source + distance
    } else {
        source - distance
    }
}
