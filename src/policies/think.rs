//! # Think-time policy.
//!
//! [`ThinkPolicy`] controls how long an actor thinks before going hungry:
//! a fresh uniform sample from `[min, max]` per episode. Randomizing the
//! think time desynchronizes the ring so hunger arrives staggered instead of
//! as a thundering herd.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use ringfeast::ThinkPolicy;
//!
//! let think = ThinkPolicy {
//!     min: Duration::from_secs(3),
//!     max: Duration::from_secs(8),
//! };
//! let d = think.next();
//! assert!(d >= think.min && d <= think.max);
//! ```

use std::time::Duration;

use rand::Rng;

/// Uniform random think-time range.
#[derive(Clone, Copy, Debug)]
pub struct ThinkPolicy {
    /// Shortest possible think time.
    pub min: Duration,
    /// Longest possible think time.
    pub max: Duration,
}

impl Default for ThinkPolicy {
    /// Returns the 3–8 second range.
    fn default() -> Self {
        Self {
            min: Duration::from_secs(3),
            max: Duration::from_secs(8),
        }
    }
}

impl ThinkPolicy {
    /// Samples the next think duration.
    ///
    /// A degenerate range (`min == max`) yields the constant duration.
    /// An inverted range yields `min`; [`Config::validate`](crate::Config::validate)
    /// rejects inverted ranges before any actor runs, so this is a safety
    /// floor, not a supported mode.
    pub fn next(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let span = (self.max - self.min).as_secs_f64();
        let offset = rand::rng().random_range(0.0..=span);
        self.min + Duration::from_secs_f64(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_range() {
        let think = ThinkPolicy {
            min: Duration::from_millis(300),
            max: Duration::from_millis(800),
        };
        for _ in 0..200 {
            let d = think.next();
            assert!(d >= think.min, "sample {d:?} below min");
            assert!(d <= think.max, "sample {d:?} above max");
        }
    }

    #[test]
    fn test_degenerate_range_is_constant() {
        let think = ThinkPolicy {
            min: Duration::from_secs(2),
            max: Duration::from_secs(2),
        };
        for _ in 0..10 {
            assert_eq!(think.next(), Duration::from_secs(2));
        }
    }

    #[test]
    fn test_samples_vary() {
        let think = ThinkPolicy {
            min: Duration::ZERO,
            max: Duration::from_secs(100),
        };
        let first = think.next();
        let varied = (0..50).any(|_| think.next() != first);
        assert!(varied, "50 samples over a 100s range never varied");
    }
}
