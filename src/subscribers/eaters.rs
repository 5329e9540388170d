//! # Stateful subscriber that tracks the currently eating set.
//!
//! [`EaterTracker`] maintains an in-memory set of eating seat indices by
//! listening to [`EventKind::EatingStarted`] / [`EventKind::TableSeeded`] /
//! [`EventKind::EatingFinished`] events.
//!
//! The supervisor uses it twice:
//! - the periodic status reporter publishes its snapshot as
//!   [`EventKind::StatusSnapshot`]
//! - on shutdown, a grace-period overrun is reported with the seats that were
//!   still eating
//!
//! ## Architecture
//! ```text
//!  Philosopher ── publish(Event) ──► Bus ──► SubscriberSet ──► EaterTracker
//!                                                                   │
//!            EatingStarted / TableSeeded ── insert(actor) ──────────┤
//!            EatingFinished ───────────── remove(actor) ────────────┘
//!
//! Supervisor: EaterTracker::snapshot() ──► sorted Vec<usize>
//! ```
//!
//! ## Consistency
//! Snapshots are **eventually consistent**: fan-out queues add bounded delay
//! between a transition and its visibility here. That matches the observer's
//! role; protocol decisions never read the tracker.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::Subscribe;

/// Tracks which seats are currently eating.
///
/// Thread-safe; share it via `Arc` between the subscriber set and the
/// supervisor's status reporter.
#[derive(Debug, Default)]
pub struct EaterTracker {
    eating: Mutex<BTreeSet<usize>>,
}

impl EaterTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sorted list of seats currently observed eating.
    pub fn snapshot(&self) -> Vec<usize> {
        self.set().iter().copied().collect()
    }

    /// True if the given seat is currently observed eating.
    pub fn is_eating(&self, actor: usize) -> bool {
        self.set().contains(&actor)
    }

    fn set(&self) -> std::sync::MutexGuard<'_, BTreeSet<usize>> {
        self.eating.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Subscribe for EaterTracker {
    async fn on_event(&self, event: &Event) {
        let actor = match event.actor {
            Some(a) => a,
            None => return,
        };
        match event.kind {
            EventKind::EatingStarted | EventKind::TableSeeded => {
                self.set().insert(actor);
            }
            EventKind::EatingFinished => {
                self.set().remove(&actor);
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "eater-tracker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracks_start_and_finish() {
        let tracker = EaterTracker::new();
        tracker
            .on_event(&Event::new(EventKind::TableSeeded).with_actor(0).with_holds(0, 1))
            .await;
        tracker
            .on_event(&Event::new(EventKind::EatingStarted).with_actor(2).with_holds(2, 3))
            .await;
        assert_eq!(tracker.snapshot(), vec![0, 2]);
        assert!(tracker.is_eating(2));

        tracker
            .on_event(&Event::new(EventKind::EatingFinished).with_actor(0).with_holds(0, 1))
            .await;
        assert_eq!(tracker.snapshot(), vec![2]);
        assert!(!tracker.is_eating(0));
    }

    #[tokio::test]
    async fn test_ignores_unrelated_events() {
        let tracker = EaterTracker::new();
        tracker
            .on_event(&Event::new(EventKind::ActorHungry).with_actor(4))
            .await;
        tracker
            .on_event(&Event::new(EventKind::ChopstickRaised).with_actor(4).with_chopstick(4))
            .await;
        assert!(tracker.snapshot().is_empty());
    }
}
