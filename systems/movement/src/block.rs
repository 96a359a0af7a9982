//! Memory of how a following enemy was last blocked.

use dodge_core::BlockMode;

/// Current block mode together with the one it replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockTracker {
    current: BlockMode,
    previous: BlockMode,
}

impl BlockTracker {
    /// Rebuilds a tracker from saved modes.
    #[must_use]
    pub const fn restore(current: BlockMode, previous: BlockMode) -> Self {
        Self { current, previous }
    }

    /// Mode currently in effect.
    #[must_use]
    pub const fn current(&self) -> BlockMode {
        self.current
    }

    /// Mode in effect before the last transition.
    #[must_use]
    pub const fn previous(&self) -> BlockMode {
        self.previous
    }

    /// Whether the enemy is steering around an obstruction.
    #[must_use]
    pub fn is_diverted(&self) -> bool {
        self.current != BlockMode::None
    }

    /// Enters `mode`, remembering the mode it replaces.
    pub fn record(&mut self, mode: BlockMode) {
        self.previous = self.current;
        self.current = mode;
    }
}
