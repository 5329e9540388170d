//! # Per-seat signal flags and the read-only neighbor view.
//!
//! [`SeatState`] carries the two flags an actor publishes to the table:
//! - `raising` — "I intend to take my left chopstick and am waiting for my
//!   right one to free up"
//! - `eating` — mirrors being in the Eating phase; the sole externally
//!   observable trigger neighbors react to
//!
//! ## Single writer, many readers
//! Each seat's flags are written only by the owning actor (plus the one-time
//! privileged seeding), and read by neighbors through [`SeatView`], which
//! exposes no mutators. Reads of distinct flags are never snapshot-consistent
//! as a pair; the protocol tolerates interleaved updates by design.
//!
//! The flags are atomics with `SeqCst` ordering: cheap, and strong enough that
//! a neighbor's next poll after a write observes it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Mutable per-seat flags, owned by the seat's actor.
#[derive(Debug, Default)]
pub struct SeatState {
    raising: AtomicBool,
    eating: AtomicBool,
}

impl SeatState {
    /// Creates a seat with both flags cleared (phase = Thinking).
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// True while the actor intends to acquire its left chopstick.
    pub fn raising(&self) -> bool {
        self.raising.load(Ordering::SeqCst)
    }

    /// True while the actor is in the Eating phase.
    pub fn eating(&self) -> bool {
        self.eating.load(Ordering::SeqCst)
    }

    /// Publishes or withdraws the raising intent.
    pub fn set_raising(&self, raising: bool) {
        self.raising.store(raising, Ordering::SeqCst);
    }

    /// Marks the seat as eating or not.
    pub fn set_eating(&self, eating: bool) {
        self.eating.store(eating, Ordering::SeqCst);
    }

    /// Returns the read-only handle a neighbor holds onto this seat.
    pub fn view(self: &Arc<Self>) -> SeatView {
        SeatView {
            seat: Arc::clone(self),
        }
    }
}

/// Read-only observation handle for a neighbor's seat.
///
/// Deliberately exposes no mutators: the single-writer contract is enforced
/// by this type, not by convention.
#[derive(Clone, Debug)]
pub struct SeatView {
    seat: Arc<SeatState>,
}

impl SeatView {
    /// True while the observed seat declares raising intent.
    pub fn raising(&self) -> bool {
        self.seat.raising()
    }

    /// True while the observed seat is eating.
    pub fn eating(&self) -> bool {
        self.seat.eating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_thinking() {
        let seat = SeatState::new();
        assert!(!seat.raising());
        assert!(!seat.eating());
    }

    #[test]
    fn test_view_tracks_owner_writes() {
        let seat = SeatState::new();
        let view = seat.view();

        seat.set_raising(true);
        assert!(view.raising());
        assert!(!view.eating());

        seat.set_raising(false);
        seat.set_eating(true);
        assert!(!view.raising());
        assert!(view.eating());
    }
}
