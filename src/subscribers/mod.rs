//! # Event subscribers for the ringfeast runtime.
//!
//! This module provides the [`Subscribe`] trait and the built-in subscribers
//! for handling events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Philosopher ── publish(Event) ──► Bus ──► subscriber_listener ──► SubscriberSet
//!                                                                         │
//!                                                              ┌──────────┼───────────┐
//!                                                              ▼          ▼           ▼
//!                                                          LogWriter  EaterTracker  Custom
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** observe and react (the [`LogWriter`] status sink)
//! - **Stateful subscribers** maintain state from events ([`EaterTracker`])
//!
//! ## Implementing custom subscribers
//! ```rust
//! use ringfeast::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct YieldCounter;
//!
//! #[async_trait]
//! impl Subscribe for YieldCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::EatingFinished {
//!             // increment a counter...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "yield-counter" }
//! }
//! ```

mod eaters;
mod log;
mod set;
mod subscribe;

pub use eaters::EaterTracker;
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
