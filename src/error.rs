//! Error types used by the ringfeast runtime.
//!
//! This module defines three error enums:
//!
//! - [`ConfigError`] — invalid startup configuration, rejected before any actor starts.
//! - [`ProtocolError`] — chopstick ownership violations (logic defects, fail fast).
//! - [`RuntimeError`] — errors raised by the supervising runtime itself.
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging and
//! test assertions.

use std::time::Duration;
use thiserror::Error;

/// # Invalid startup configuration.
///
/// Every variant is fatal and non-recoverable: the supervisor validates the
/// [`Config`](crate::Config) before spawning a single actor and refuses to run
/// on the first violation found.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The ring needs at least two seats to have two distinct chopsticks.
    #[error("ring too small: {seats} seat(s), need at least 2")]
    RingTooSmall {
        /// Configured number of seats.
        seats: usize,
    },

    /// An initial eater index does not exist on the ring.
    #[error("initial eater {actor} out of range for {seats} seats")]
    SeedOutOfRange {
        /// Offending actor index.
        actor: usize,
        /// Configured number of seats.
        seats: usize,
    },

    /// The same actor was listed as an initial eater twice.
    #[error("initial eater {actor} listed more than once")]
    DuplicateSeed {
        /// Offending actor index.
        actor: usize,
    },

    /// Two initial eaters sit next to each other and would contend for one chopstick.
    #[error("initial eaters {a} and {b} are adjacent on the ring")]
    AdjacentSeeds {
        /// First actor index.
        a: usize,
        /// Second actor index.
        b: usize,
    },

    /// Think-time range with `min > max`.
    #[error("think range inverted: min {min:?} > max {max:?}")]
    InvalidThinkRange {
        /// Lower bound of the range.
        min: Duration,
        /// Upper bound of the range.
        max: Duration,
    },

    /// A zero poll interval would turn every actor into a busy loop.
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    /// Seeding is scheduled after the earliest possible hungry phase.
    ///
    /// The privileged seeding assumes every seeded seat is still thinking. A
    /// settle delay at or past `think.min` lets a seeded seat go hungry (or
    /// start eating) first, and the seeding acquires would contend with it.
    #[error("settle delay {settle:?} must be shorter than think minimum {think_min:?} when seeding")]
    SettleAfterThink {
        /// Configured delay before seeding.
        settle: Duration,
        /// Shortest possible think time.
        think_min: Duration,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs and tests.
    ///
    /// # Example
    /// ```
    /// use ringfeast::ConfigError;
    ///
    /// let err = ConfigError::RingTooSmall { seats: 1 };
    /// assert_eq!(err.as_label(), "config_ring_too_small");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::RingTooSmall { .. } => "config_ring_too_small",
            ConfigError::SeedOutOfRange { .. } => "config_seed_out_of_range",
            ConfigError::DuplicateSeed { .. } => "config_duplicate_seed",
            ConfigError::AdjacentSeeds { .. } => "config_adjacent_seeds",
            ConfigError::InvalidThinkRange { .. } => "config_invalid_think_range",
            ConfigError::ZeroPollInterval => "config_zero_poll_interval",
            ConfigError::SettleAfterThink { .. } => "config_settle_after_think",
        }
    }
}

/// # Chopstick ownership violations.
///
/// These indicate a defect in the acquisition/release discipline, not a
/// recoverable runtime condition. Silently tolerating them would mask real
/// races, so the actor that triggers one exits and the whole run is aborted.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    /// A release was attempted on a chopstick that is already free.
    #[error("actor {actor} released chopstick {chopstick} which is not held")]
    ReleaseWhileFree {
        /// Chopstick index.
        chopstick: usize,
        /// Actor that attempted the release.
        actor: usize,
    },

    /// A release was attempted by an actor that does not hold the chopstick.
    #[error("actor {actor} released chopstick {chopstick} held by actor {holder}")]
    ReleaseByNonHolder {
        /// Chopstick index.
        chopstick: usize,
        /// Actor that attempted the release.
        actor: usize,
        /// Actor that actually holds the chopstick.
        holder: usize,
    },
}

impl ProtocolError {
    /// Returns a short stable label (snake_case) for use in logs and tests.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProtocolError::ReleaseWhileFree { .. } => "protocol_release_while_free",
            ProtocolError::ReleaseByNonHolder { .. } => "protocol_release_by_non_holder",
        }
    }

    /// Returns a human-readable message with details about the violation.
    pub fn as_message(&self) -> String {
        match self {
            ProtocolError::ReleaseWhileFree { chopstick, actor } => {
                format!("double release: chopstick={chopstick} actor={actor}")
            }
            ProtocolError::ReleaseByNonHolder {
                chopstick,
                actor,
                holder,
            } => {
                format!("foreign release: chopstick={chopstick} actor={actor} holder={holder}")
            }
        }
    }
}

/// # Errors produced by the supervising runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Startup configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// An actor detected a protocol violation; the run was aborted.
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    /// Shutdown grace period was exceeded; some actors remained stuck.
    #[error("shutdown grace {grace:?} exceeded; still eating: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Seat indices that were still eating when the grace expired.
        stuck: Vec<usize>,
    },

    /// OS signal listener registration failed.
    #[error("signal registration failed: {0}")]
    Signal(#[from] std::io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs and tests.
    ///
    /// # Example
    /// ```
    /// use ringfeast::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::InvalidConfig(_) => "runtime_invalid_config",
            RuntimeError::Protocol(_) => "runtime_protocol_violation",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::Signal(_) => "runtime_signal",
        }
    }
}
