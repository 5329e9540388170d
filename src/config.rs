//! # Global runtime configuration.
//!
//! Provides [`Config`], the centralized settings for the table runtime.
//!
//! Config is used in two ways:
//! 1. **Supervisor creation**: `Supervisor::new(config, subscribers, tracker)`
//! 2. **Actor parameters**: each philosopher copies the timing knobs it needs
//!
//! ## Sentinel values
//! - `contention_timeout = 0s` → acquisition blocks without a deadline
//! - `status_interval = 0s` → no periodic snapshot reporter

use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::ThinkPolicy;

/// Global configuration for the table runtime.
///
/// Defines:
/// - **Topology**: number of seats on the ring, initial eating set
/// - **Protocol timing**: poll interval, pressure grace, pickup delay
/// - **Actor behavior**: think-time range
/// - **Runtime behavior**: settle delay before seeding, status reporting,
///   event bus capacity, shutdown grace
///
/// ## Field semantics
/// - `seats`: ring size N; seat *i* shares chopstick *i* with seat *i−1* and
///   chopstick *(i+1) mod N* with seat *i+1*
/// - `poll_interval`: fixed wake interval M for every actor's polling loops
/// - `extra_eat`: how long an eater keeps eating after first observing its
///   left neighbor raising ("finish the current bite")
/// - `contention_timeout`: optional cap on a single blocking acquire
///   (`0s` = block indefinitely, the baseline behavior)
///
/// ## Notes
/// All fields are public for flexibility. [`Config::validate`] must pass
/// before any actor starts; the supervisor enforces this.
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of seats (and chopsticks) on the ring.
    pub seats: usize,

    /// Fixed wake interval for hungry/eating polling loops.
    pub poll_interval: Duration,

    /// Extra eating time granted after first observing neighbor pressure.
    ///
    /// An eater that never observes its left neighbor raising never stops
    /// eating. Yielding is driven purely by contention.
    pub extra_eat: Duration,

    /// Randomized think-time range sampled before each hungry phase.
    pub think: ThinkPolicy,

    /// Brief pause between picking up the left and the right chopstick.
    ///
    /// Models the non-atomic two-step pickup; also the window bounding the
    /// only legal single-chopstick hold.
    pub pickup_delay: Duration,

    /// Seat indices seeded directly into the Eating state at startup.
    ///
    /// Must be pairwise non-adjacent on the ring so that seeding leaves at
    /// least one chopstick free and forward progress is possible.
    pub initial_eaters: Vec<usize>,

    /// Delay between spawning actors and performing the privileged seeding,
    /// letting every actor reach its steady polling state first.
    pub settle_delay: Duration,

    /// Interval between periodic global status snapshots (`0s` = disabled).
    pub status_interval: Duration,

    /// Optional timeout for a single blocking acquire (`0s` = no timeout).
    ///
    /// On expiry the actor reports contention to the observer, drops any
    /// half-held chopstick, and resumes polling. It never terminates.
    pub contention_timeout: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events
    /// observe `Lagged` and skip older items. Minimum value is 1 (clamped).
    pub bus_capacity: usize,

    /// Maximum time to wait for actors to exit after a shutdown signal.
    pub grace: Duration,
}

impl Config {
    /// Checks invariants that must hold before the supervisor may run.
    ///
    /// Fails fast with the first violation found:
    /// - `seats >= 2`
    /// - every initial eater is a valid seat index, listed once
    /// - no two initial eaters are adjacent on the ring
    /// - think range is not inverted
    /// - poll interval is non-zero
    /// - when seeding, `settle_delay < think.min` (seeded seats must still be
    ///   thinking when the seeding runs)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats < 2 {
            return Err(ConfigError::RingTooSmall { seats: self.seats });
        }
        if self.poll_interval == Duration::ZERO {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.think.min > self.think.max {
            return Err(ConfigError::InvalidThinkRange {
                min: self.think.min,
                max: self.think.max,
            });
        }
        if !self.initial_eaters.is_empty() && self.settle_delay >= self.think.min {
            return Err(ConfigError::SettleAfterThink {
                settle: self.settle_delay,
                think_min: self.think.min,
            });
        }

        for (pos, &actor) in self.initial_eaters.iter().enumerate() {
            if actor >= self.seats {
                return Err(ConfigError::SeedOutOfRange {
                    actor,
                    seats: self.seats,
                });
            }
            for &other in &self.initial_eaters[..pos] {
                if other == actor {
                    return Err(ConfigError::DuplicateSeed { actor });
                }
                if self.adjacent(actor, other) {
                    return Err(ConfigError::AdjacentSeeds { a: other, b: actor });
                }
            }
        }
        Ok(())
    }

    /// True if seats `a` and `b` are neighbors on the ring.
    ///
    /// Only meaningful after the ring-size check in [`Config::validate`] has
    /// passed (`% self.seats` needs a non-empty ring).
    #[inline]
    fn adjacent(&self, a: usize, b: usize) -> bool {
        (a + 1) % self.seats == b || (b + 1) % self.seats == a
    }

    /// Returns the contention timeout as an `Option`.
    ///
    /// - `None` → acquire blocks without a deadline
    /// - `Some(d)` → acquire gives up after `d` and the actor resumes polling
    #[inline]
    pub fn contention_timeout(&self) -> Option<Duration> {
        if self.contention_timeout == Duration::ZERO {
            None
        } else {
            Some(self.contention_timeout)
        }
    }

    /// Returns the status reporting interval as an `Option` (`0s` = disabled).
    #[inline]
    pub fn status_interval(&self) -> Option<Duration> {
        if self.status_interval == Duration::ZERO {
            None
        } else {
            Some(self.status_interval)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `seats = 5`, `initial_eaters = [0, 2]` (one chopstick left free)
    /// - `poll_interval = 500ms`
    /// - `extra_eat = 4s`
    /// - `think = uniform 3s..8s`
    /// - `pickup_delay = 10ms`
    /// - `settle_delay = 2s`
    /// - `status_interval = 10s`
    /// - `contention_timeout = 0s` (acquire blocks indefinitely)
    /// - `bus_capacity = 1024`
    /// - `grace = 5s`
    fn default() -> Self {
        Self {
            seats: 5,
            poll_interval: Duration::from_millis(500),
            extra_eat: Duration::from_secs(4),
            think: ThinkPolicy::default(),
            pickup_delay: Duration::from_millis(10),
            initial_eaters: vec![0, 2],
            settle_delay: Duration::from_secs(2),
            status_interval: Duration::from_secs(10),
            contention_timeout: Duration::ZERO,
            bus_capacity: 1024,
            grace: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_single_seat() {
        let cfg = Config {
            seats: 1,
            initial_eaters: vec![],
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::RingTooSmall { seats: 1 }));
    }

    #[test]
    fn test_rejects_empty_ring_with_seeds() {
        // The size check must fire before any ring arithmetic touches the
        // seed list.
        let cfg = Config {
            seats: 0,
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::RingTooSmall { seats: 0 }));
    }

    #[test]
    fn test_rejects_seed_out_of_range() {
        let cfg = Config {
            initial_eaters: vec![0, 7],
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::SeedOutOfRange { actor: 7, seats: 5 })
        );
    }

    #[test]
    fn test_rejects_adjacent_seeds() {
        let cfg = Config {
            initial_eaters: vec![0, 1],
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::AdjacentSeeds { a: 0, b: 1 }));
    }

    #[test]
    fn test_rejects_wraparound_adjacency() {
        // Seat 4 and seat 0 are neighbors on a 5-ring.
        let cfg = Config {
            initial_eaters: vec![0, 4],
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::AdjacentSeeds { a: 0, b: 4 }));
    }

    #[test]
    fn test_rejects_duplicate_seed() {
        let cfg = Config {
            initial_eaters: vec![2, 2],
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::DuplicateSeed { actor: 2 }));
    }

    #[test]
    fn test_rejects_inverted_think_range() {
        let cfg = Config {
            think: ThinkPolicy {
                min: Duration::from_secs(8),
                max: Duration::from_secs(3),
            },
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidThinkRange { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let cfg = Config {
            poll_interval: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPollInterval));
    }

    #[test]
    fn test_rejects_settle_past_think_minimum() {
        // A seeded seat that can go hungry before the seeding runs would
        // contend with its own privileged acquires.
        let cfg = Config {
            settle_delay: Duration::from_secs(3),
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::SettleAfterThink {
                settle: Duration::from_secs(3),
                think_min: Duration::from_secs(3),
            })
        );
    }

    #[test]
    fn test_settle_past_think_allowed_without_seeds() {
        let cfg = Config {
            settle_delay: Duration::from_secs(10),
            initial_eaters: vec![],
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_empty_seed_set_is_valid() {
        let cfg = Config {
            initial_eaters: vec![],
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_sentinel_accessors() {
        let mut cfg = Config::default();
        assert_eq!(cfg.contention_timeout(), None);
        assert_eq!(cfg.status_interval(), Some(Duration::from_secs(10)));

        cfg.contention_timeout = Duration::from_secs(1);
        cfg.status_interval = Duration::ZERO;
        assert_eq!(cfg.contention_timeout(), Some(Duration::from_secs(1)));
        assert_eq!(cfg.status_interval(), None);
    }
}
