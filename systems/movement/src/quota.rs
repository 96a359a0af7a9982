//! Soft bounds on how many enemies chase the player.

use dodge_core::MovePattern;
use rand::Rng;

/// Smallest number of following enemies a full population aims for.
pub const MIN_FOLLOWING: u32 = 6;

/// Largest number of following enemies a population may contain.
pub const MAX_FOLLOWING: u32 = 8;

/// Tracks following enemies while a population is being sampled.
///
/// Sampling redraws when the maximum is already reached, and forces the
/// following pattern once too few enemies remain for the minimum to be met.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FollowingQuota {
    min: u32,
    max: u32,
    following: u32,
    remaining: u32,
}

impl FollowingQuota {
    /// Creates a quota with the provided bounds and no pending enemies.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max,
            following: 0,
            remaining: 0,
        }
    }

    /// Starts a new population of `enemies` enemies.
    pub fn reset(&mut self, enemies: u32) {
        self.following = 0;
        self.remaining = enemies;
    }

    /// Number of following enemies sampled since the last reset.
    #[must_use]
    pub const fn following(&self) -> u32 {
        self.following
    }

    /// Lower bound of the quota.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Upper bound of the quota.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Draws the pattern for the next enemy of the population.
    pub fn sample<R>(&mut self, rng: &mut R) -> MovePattern
    where
        R: Rng + ?Sized,
    {
        let saturated = self.following >= self.max;
        let drawn = loop {
            let candidate = MovePattern::ALL[rng.gen_range(0..MovePattern::ALL.len())];
            if candidate == MovePattern::FollowingPlayer && saturated {
                continue;
            }
            break candidate;
        };

        let missing = self.min.saturating_sub(self.following);
        let forced = !saturated && missing > 0 && self.remaining <= missing;
        let pattern = if forced {
            MovePattern::FollowingPlayer
        } else {
            drawn
        };

        self.remaining = self.remaining.saturating_sub(1);
        if pattern == MovePattern::FollowingPlayer {
            self.following += 1;
        }
        pattern
    }
}

impl Default for FollowingQuota {
    fn default() -> Self {
        Self::new(MIN_FOLLOWING, MAX_FOLLOWING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn count_following(quota: &mut FollowingQuota, enemies: u32, seed: u64) -> u32 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        quota.reset(enemies);
        (0..enemies)
            .filter(|_| quota.sample(&mut rng) == MovePattern::FollowingPlayer)
            .count() as u32
    }

    #[test]
    fn large_populations_respect_both_bounds() {
        for seed in 0..50 {
            let mut quota = FollowingQuota::default();
            let following = count_following(&mut quota, 20, seed);
            assert!((MIN_FOLLOWING..=MAX_FOLLOWING).contains(&following));
            assert_eq!(quota.following(), following);
        }
    }

    #[test]
    fn small_populations_all_follow() {
        let mut quota = FollowingQuota::default();
        assert_eq!(count_following(&mut quota, 4, 9), 4);
    }

    #[test]
    fn zero_maximum_never_follows() {
        let mut quota = FollowingQuota::new(0, 0);
        assert_eq!(count_following(&mut quota, 30, 1), 0);
    }
}
