//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to protocol events emitted by philosophers, the seeding
//! routine, and the supervisor.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Philosopher` (state transitions), `seeding` (privileged
//!   initialization), `Supervisor` (snapshots, shutdown milestones).
//! - **Consumers**: `Supervisor::subscriber_listener()` which fans out to the
//!   `SubscriberSet` (log sink, eater tracker, user subscribers).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
