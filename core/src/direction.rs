//! Four-flag movement direction with diagonal and diversion transforms.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{MoveResult, Position};

/// Direction of travel expressed as independent up/down/left/right flags.
///
/// At most one flag per axis is set by the constructors and steering helpers.
/// The steering helpers remember the last vertical and horizontal choice so a
/// tie can break the other way next time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    #[serde(skip)]
    previous_up: bool,
    #[serde(skip)]
    previous_left: bool,
}

impl Direction {
    /// Direction with no flags set.
    pub const NONE: Self = Self::from_flags(false, false, false, false);
    /// Toward row zero.
    pub const UP: Self = Self::from_flags(true, false, false, false);
    /// Toward the last row.
    pub const DOWN: Self = Self::from_flags(false, true, false, false);
    /// Toward column zero.
    pub const LEFT: Self = Self::from_flags(false, false, true, false);
    /// Toward the last column.
    pub const RIGHT: Self = Self::from_flags(false, false, false, true);

    /// Builds a direction from explicit flags.
    #[must_use]
    pub const fn from_flags(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
            previous_up: false,
            previous_left: false,
        }
    }

    /// Picks one of the four straight directions uniformly.
    pub fn random_straight<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        match rng.gen_range(0..4) {
            0 => Self::UP,
            1 => Self::DOWN,
            2 => Self::LEFT,
            _ => Self::RIGHT,
        }
    }

    /// Picks one of the four diagonal directions uniformly.
    pub fn random_diagonal<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let up = rng.gen_bool(0.5);
        let left = rng.gen_bool(0.5);
        Self::from_flags(up, !up, left, !left)
    }

    /// Whether the up flag is set.
    #[must_use]
    pub const fn up(&self) -> bool {
        self.up
    }

    /// Whether the down flag is set.
    #[must_use]
    pub const fn down(&self) -> bool {
        self.down
    }

    /// Whether the left flag is set.
    #[must_use]
    pub const fn left(&self) -> bool {
        self.left
    }

    /// Whether the right flag is set.
    #[must_use]
    pub const fn right(&self) -> bool {
        self.right
    }

    /// Whether a vertical flag is set.
    #[must_use]
    pub const fn is_vertical(&self) -> bool {
        self.up || self.down
    }

    /// Whether a horizontal flag is set.
    #[must_use]
    pub const fn is_horizontal(&self) -> bool {
        self.left || self.right
    }

    /// Whether both axes carry a flag.
    #[must_use]
    pub const fn is_diagonal(&self) -> bool {
        self.is_vertical() && self.is_horizontal()
    }

    /// Whether no flag is set.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.is_vertical() && !self.is_horizontal()
    }

    /// Clears every flag while keeping the steering memory.
    pub fn reset(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
    }

    /// Inverts the axes named by a blocking result.
    ///
    /// A diagonal direction flips only the blocked axis (both for a total
    /// block). A straight direction always reverses.
    pub fn divert(&mut self, result: MoveResult) {
        if result.is_clear() {
            return;
        }

        if self.is_diagonal() {
            match result {
                MoveResult::RowBlock => self.flip_vertical(),
                MoveResult::ColumnBlock => self.flip_horizontal(),
                MoveResult::TotalBlock => {
                    self.flip_vertical();
                    self.flip_horizontal();
                }
                MoveResult::Clear => {}
            }
        } else if self.is_vertical() {
            self.flip_vertical();
        } else {
            self.flip_horizontal();
        }
    }

    /// Points the vertical flags from `origin` row toward `target` row.
    ///
    /// Unless `keep_horizontal` is set the direction is reset first. Equal rows
    /// pick the opposite of the previous vertical choice.
    pub fn steer_vertically(&mut self, origin: i32, target: i32, keep_horizontal: bool) {
        if !keep_horizontal {
            self.reset();
        }
        let up = match origin.cmp(&target) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => !self.previous_up,
        };
        self.up = up;
        self.down = !up;
        self.previous_up = up;
    }

    /// Points the horizontal flags from `origin` column toward `target` column.
    ///
    /// Mirrors [`Direction::steer_vertically`] on the column axis.
    pub fn steer_horizontally(&mut self, origin: i32, target: i32, keep_vertical: bool) {
        if !keep_vertical {
            self.reset();
        }
        let left = match origin.cmp(&target) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => !self.previous_left,
        };
        self.left = left;
        self.right = !left;
        self.previous_left = left;
    }

    /// Displaces the position by `step` cells along every set flag.
    #[must_use]
    pub fn apply(&self, position: Position, step: i32) -> Position {
        let mut rows = 0;
        let mut cols = 0;
        if self.down {
            rows += step;
        }
        if self.up {
            rows -= step;
        }
        if self.right {
            cols += step;
        }
        if self.left {
            cols -= step;
        }
        position.offset(rows, cols)
    }

    fn flip_vertical(&mut self) {
        std::mem::swap(&mut self.up, &mut self.down);
    }

    fn flip_horizontal(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }
}
