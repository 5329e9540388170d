//! # Protocol events emitted by actors and the supervisor.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Transition events**: the actor state machine (hungry, raised, eating,
//!   release scheduled, finished)
//! - **Runtime events**: seeding, periodic snapshots, contention reports
//! - **Shutdown events**: signal observed, grace outcome
//!
//! The [`Event`] struct carries metadata such as timestamps, seat indices,
//! chopstick indices, and delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use ringfeast::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ReleaseScheduled)
//!     .with_actor(0)
//!     .with_neighbor(4)
//!     .with_delay(Duration::from_secs(4));
//!
//! assert_eq!(ev.kind, EventKind::ReleaseScheduled);
//! assert_eq!(ev.actor, Some(0));
//! assert_eq!(ev.delay_ms, Some(4000));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of protocol events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Transition events ===
    /// Actor finished thinking and entered the hungry polling loop.
    ///
    /// Sets: `actor`, `at`, `seq`.
    ActorHungry,

    /// Hungry actor observed its left chopstick free and declared intent.
    ///
    /// Raising is a public signal, not a reservation; nothing is acquired yet.
    ///
    /// Sets: `actor`, `chopstick` (the left one), `at`, `seq`.
    ChopstickRaised,

    /// Actor acquired both chopsticks and started eating.
    ///
    /// Sets: `actor`, `holds` (left and right indices), `at`, `seq`.
    EatingStarted,

    /// Eating actor observed its left neighbor raising for the first time
    /// this episode and armed the release deadline.
    ///
    /// Sets: `actor`, `neighbor`, `delay_ms` (the grace), `at`, `seq`.
    ReleaseScheduled,

    /// Actor released both chopsticks and went back to thinking.
    ///
    /// Sets: `actor`, `holds` (the released pair), `at`, `seq`.
    EatingFinished,

    // === Runtime events ===
    /// Privileged initialization put this actor directly into Eating.
    ///
    /// Sets: `actor`, `holds`, `at`, `seq`.
    TableSeeded,

    /// Periodic global snapshot of the currently eating set.
    ///
    /// Sets: `eaters`, `at`, `seq`.
    StatusSnapshot,

    /// A blocking acquire exceeded the configured contention timeout.
    ///
    /// The actor drops any half-held chopstick and resumes polling; this is
    /// an observer-facing report, not a failure.
    ///
    /// Sets: `actor`, `chopstick`, `delay_ms` (the timeout), `at`, `seq`.
    ContentionTimeout,

    /// An actor hit a chopstick ownership violation and is aborting the run.
    ///
    /// Sets: `actor`, `reason`, `at`, `seq`.
    ProtocolViolation,

    // === Shutdown events ===
    /// Shutdown requested (OS signal observed).
    ///
    /// Sets: `at`, `seq`.
    ShutdownRequested,

    /// All actors exited within the configured grace period.
    ///
    /// Sets: `at`, `seq`.
    AllStoppedWithin,

    /// Grace period exceeded; some actors did not exit in time.
    ///
    /// Sets: `at`, `seq`.
    GraceExceeded,
}

/// Protocol event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Event classification.
    pub kind: EventKind,
    /// Seat index of the actor this event is about, if applicable.
    pub actor: Option<usize>,
    /// Single chopstick index (raised chopstick, contested chopstick).
    pub chopstick: Option<usize>,
    /// Left/right chopstick pair held or released together.
    pub holds: Option<(usize, usize)>,
    /// Seat index of the neighbor whose signal triggered this event.
    pub neighbor: Option<usize>,
    /// Delay or timeout in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Currently eating set, for snapshots.
    pub eaters: Option<Arc<[usize]>>,
    /// Human-readable reason (protocol violations).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            actor: None,
            chopstick: None,
            holds: None,
            neighbor: None,
            delay_ms: None,
            eaters: None,
            reason: None,
        }
    }

    /// Attaches the acting seat index.
    #[inline]
    pub fn with_actor(mut self, actor: usize) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attaches a single chopstick index.
    #[inline]
    pub fn with_chopstick(mut self, chopstick: usize) -> Self {
        self.chopstick = Some(chopstick);
        self
    }

    /// Attaches the held/released left-right pair.
    #[inline]
    pub fn with_holds(mut self, left: usize, right: usize) -> Self {
        self.holds = Some((left, right));
        self
    }

    /// Attaches the observed neighbor's seat index.
    #[inline]
    pub fn with_neighbor(mut self, neighbor: usize) -> Self {
        self.neighbor = Some(neighbor);
        self
    }

    /// Attaches a delay or timeout (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches the currently eating set.
    #[inline]
    pub fn with_eaters(mut self, eaters: impl Into<Arc<[usize]>>) -> Self {
        self.eaters = Some(eaters.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ActorHungry);
        let b = Event::new(EventKind::ActorHungry);
        let c = Event::new(EventKind::StatusSnapshot);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::EatingStarted)
            .with_actor(2)
            .with_holds(2, 3)
            .with_delay(Duration::from_millis(1500));
        assert_eq!(ev.actor, Some(2));
        assert_eq!(ev.holds, Some((2, 3)));
        assert_eq!(ev.delay_ms, Some(1500));
        assert_eq!(ev.neighbor, None);
    }

    #[test]
    fn test_eaters_snapshot_payload() {
        let ev = Event::new(EventKind::StatusSnapshot).with_eaters(vec![0, 2]);
        assert_eq!(ev.eaters.as_deref(), Some(&[0, 2][..]));
    }
}
