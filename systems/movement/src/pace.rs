//! Timing policies deciding whether and how often an enemy steps.

use std::time::Duration;

use dodge_core::MovePace;

/// Default burst threshold of a quantum pace.
pub const DEFAULT_STEP_QUANTUM: u32 = 10;

const ACCELERATION: f64 = 0.8;
const DECELERATION: f64 = 1.12;

/// Pacing state of a single enemy.
///
/// Intervals are tracked in whole milliseconds and rounded after every
/// scaling step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pace {
    kind: MovePace,
    base_ms: u64,
    current_ms: u64,
    floor_ms: u64,
    ceiling_ms: u64,
    quantum: u32,
    counter: u32,
    bursting: bool,
}

impl Pace {
    /// Creates a pace of the provided kind at the provided base interval.
    #[must_use]
    pub fn new(kind: MovePace, base: Duration, quantum: u32) -> Self {
        let mut pace = Self {
            kind,
            base_ms: 0,
            current_ms: 0,
            floor_ms: 0,
            ceiling_ms: 0,
            quantum: quantum.max(1),
            counter: 0,
            bursting: false,
        };
        pace.set_base(base);
        pace
    }

    /// Restores the progress counter of a quantum pace.
    #[must_use]
    pub const fn with_counter(mut self, counter: u32) -> Self {
        self.counter = counter;
        self
    }

    /// Restores the burst phase of a quantum pace; other paces never burst.
    #[must_use]
    pub const fn with_burst(mut self, bursting: bool) -> Self {
        self.bursting = bursting && matches!(self.kind, MovePace::Quantum);
        self
    }

    /// Pacing policy.
    #[must_use]
    pub const fn kind(&self) -> MovePace {
        self.kind
    }

    /// Interval the enemy is configured with.
    #[must_use]
    pub const fn base_interval(&self) -> Duration {
        Duration::from_millis(self.base_ms)
    }

    /// Interval until the enemy's next tick.
    #[must_use]
    pub const fn current_interval(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    /// Burst threshold of a quantum pace.
    #[must_use]
    pub const fn quantum(&self) -> u32 {
        self.quantum
    }

    /// Progress counter of a quantum pace.
    #[must_use]
    pub const fn counter(&self) -> u32 {
        self.counter
    }

    /// Whether a quantum pace is moving once per tick.
    #[must_use]
    pub const fn is_bursting(&self) -> bool {
        self.bursting
    }

    /// Replaces the base interval and resets the floor and ceiling derived from it.
    pub fn set_base(&mut self, base: Duration) {
        let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX).max(1);
        self.base_ms = base_ms;
        self.current_ms = base_ms;
        match self.kind {
            MovePace::Accelerated => {
                self.ceiling_ms = base_ms;
                self.floor_ms = base_ms / 4;
            }
            MovePace::Decelerated => {
                self.floor_ms = base_ms;
                self.ceiling_ms = base_ms * 2;
            }
            MovePace::Constant | MovePace::Quantum => {
                self.floor_ms = base_ms;
                self.ceiling_ms = base_ms;
            }
        }
    }

    /// Advances the pacing state by one tick and reports whether the enemy moves.
    ///
    /// A quantum pace idles while its counter climbs; reaching a multiple of
    /// the threshold doubles the counter into a burst that moves once per
    /// tick until it drains. Accelerated and decelerated paces rescale the
    /// interval, snapping back to the base once they pass their bound.
    pub fn begin_step(&mut self) -> bool {
        match self.kind {
            MovePace::Constant => true,
            MovePace::Quantum => {
                if self.bursting {
                    self.counter = self.counter.saturating_sub(1);
                    if self.counter == 0 {
                        self.bursting = false;
                    }
                    true
                } else {
                    self.counter += 1;
                    if self.counter % self.quantum == 0 {
                        self.counter *= 2;
                        self.bursting = true;
                    }
                    false
                }
            }
            MovePace::Accelerated => {
                let next = scale(self.current_ms, ACCELERATION);
                self.current_ms = if next >= self.floor_ms {
                    next
                } else {
                    self.base_ms
                };
                true
            }
            MovePace::Decelerated => {
                let next = scale(self.current_ms, DECELERATION);
                self.current_ms = if next <= self.ceiling_ms {
                    next
                } else {
                    self.base_ms
                };
                true
            }
        }
    }
}

fn scale(interval_ms: u64, factor: f64) -> u64 {
    (interval_ms as f64 * factor).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantum_idles_then_bursts_for_twice_the_threshold() {
        let mut pace = Pace::new(MovePace::Quantum, Duration::from_millis(100), 4);
        let moves: Vec<bool> = (0..13).map(|_| pace.begin_step()).collect();

        assert_eq!(&moves[..4], &[false; 4]);
        assert_eq!(&moves[4..12], &[true; 8]);
        assert!(!moves[12]);
        assert_eq!(pace.counter(), 1);
    }

    #[test]
    fn restored_burst_continues_where_it_left_off() {
        let mut live = Pace::new(MovePace::Quantum, Duration::from_millis(100), 4);
        for _ in 0..6 {
            let _ = live.begin_step();
        }
        assert!(live.is_bursting());

        let mut restored = Pace::new(MovePace::Quantum, Duration::from_millis(100), 4)
            .with_counter(live.counter())
            .with_burst(live.is_bursting());

        let live_moves: Vec<bool> = (0..10).map(|_| live.begin_step()).collect();
        let restored_moves: Vec<bool> = (0..10).map(|_| restored.begin_step()).collect();
        assert_eq!(restored_moves, live_moves);
        assert_eq!(&live_moves[..6], &[true; 6]);
        assert!(!live_moves[6]);
    }

    #[test]
    fn only_quantum_paces_restore_a_burst() {
        let pace = Pace::new(MovePace::Constant, Duration::from_millis(100), 4).with_burst(true);
        assert!(!pace.is_bursting());
    }

    #[test]
    fn acceleration_shrinks_until_floor_then_resets() {
        let mut pace = Pace::new(MovePace::Accelerated, Duration::from_millis(100), 1);
        let intervals: Vec<u64> = (0..8)
            .map(|_| {
                assert!(pace.begin_step());
                pace.current_interval().as_millis() as u64
            })
            .collect();
        assert_eq!(intervals, vec![80, 64, 51, 41, 33, 26, 100, 80]);
    }

    #[test]
    fn deceleration_grows_until_ceiling_then_resets() {
        let mut pace = Pace::new(MovePace::Decelerated, Duration::from_millis(100), 1);
        let intervals: Vec<u64> = (0..8)
            .map(|_| {
                assert!(pace.begin_step());
                pace.current_interval().as_millis() as u64
            })
            .collect();
        assert_eq!(intervals, vec![112, 125, 140, 157, 176, 197, 100, 112]);
    }

    #[test]
    fn changing_base_resets_bounds() {
        let mut pace = Pace::new(MovePace::Accelerated, Duration::from_millis(100), 1);
        assert!(pace.begin_step());
        pace.set_base(Duration::from_millis(20));
        assert_eq!(pace.current_interval(), Duration::from_millis(20));
        assert!(pace.begin_step());
        assert_eq!(pace.current_interval(), Duration::from_millis(16));
        assert_eq!(pace.base_interval(), Duration::from_millis(20));
    }

    #[test]
    fn constant_pace_always_moves_at_base() {
        let mut pace = Pace::new(MovePace::Constant, Duration::from_millis(4), 1);
        for _ in 0..5 {
            assert!(pace.begin_step());
        }
        assert_eq!(pace.current_interval(), Duration::from_millis(4));
    }
}
