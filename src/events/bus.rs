//! # Event bus for broadcasting protocol events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from multiple sources (philosophers, the
//! seeding routine, the supervisor).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                  Subscriber (one):
//!   Seat 0  ──┐
//!   Seat 1  ──┼──────► Bus ───────► subscriber_listener ────► SubscriberSet
//!   Seat N-1──┤  (broadcast chan)     (in Supervisor)
//!   Seeder  ──┘
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active subscribers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for protocol events.
///
/// Thin wrapper over [`tokio::sync::broadcast`] that provides a
/// `publish`/`subscribe` API. Multiple publishers can publish concurrently;
/// subscribers receive clones of each event.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    ///
    /// ### Notes
    /// - Capacity is **shared** across all receivers (not per-subscriber).
    /// - When receivers lag, they observe `RecvError::Lagged`.
    /// - The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// If there are no receivers, the event is dropped and this still returns
    /// immediately.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// - Each call creates an **independent** receiver.
    /// - A receiver only gets events **sent after** it subscribes.
    /// - Slow receivers get `RecvError::Lagged(n)` and skip over missed items.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_subscriber_receives_published_events() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventKind::ActorHungry).with_actor(3));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ActorHungry);
        assert_eq!(ev.actor, Some(3));
    }

    #[tokio::test]
    async fn test_publish_without_receivers_does_not_block() {
        let bus = Bus::new(1);
        bus.publish(Event::new(EventKind::ShutdownRequested));
        bus.publish(Event::new(EventKind::ShutdownRequested));
    }
}
