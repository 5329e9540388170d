//! # ringfeast
//!
//! **Ringfeast** simulates N actors ("philosophers") on a ring who cyclically
//! think and eat, competing for the chopstick between each pair of neighbors.
//! The interesting part is the acquisition and yielding protocol: hungry
//! actors declare intent by *raising*, acquire both chopsticks only after
//! observing both free, and eating actors yield within a bounded grace period
//! once they observe pressure from their left neighbor. Coordination is pure
//! polling over shared state — no messages, no global lock.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                    ┌─────────────────────────────────────────────┐
//!                    │  Supervisor                                 │
//!                    │  - validates Config, builds Table + seats   │
//!                    │  - spawns one Philosopher per seat          │
//!                    │  - seeds initial eaters (one-time)          │
//!                    │  - periodic StatusSnapshot                  │
//!                    └──────┬──────────────┬──────────────┬────────┘
//!                           ▼              ▼              ▼
//!                    ┌───────────┐  ┌───────────┐  ┌───────────┐
//!                    │ Seat 0    │  │ Seat 1    │  │ Seat N-1  │
//!                    │ poll loop │  │ poll loop │  │ poll loop │
//!                    └─────┬─────┘  └─────┬─────┘  └─────┬─────┘
//!                          │              │              │
//!         reads/writes:    ▼              ▼              ▼
//!              ┌──────────────────────────────────────────────┐
//!              │  Table (chopstick ring) + SeatState flags    │
//!              │  chopstick k: seat k's left, seat k-1's right│
//!              └──────────────────────────────────────────────┘
//!                          │ publish(Event)
//!                          ▼
//!              Bus (broadcast) ──► SubscriberSet ──► LogWriter / EaterTracker / ...
//! ```
//!
//! ### Protocol
//! ```text
//! per seat, forever:
//!   Thinking: sleep uniform(think.min ..= think.max)
//!   Hungry:   every poll_interval:
//!               left observed free  → raising = true      (intent signal)
//!               raising && right observed free
//!                 → acquire left, pause, acquire right    (may block on a
//!                   raising = false, eating = true          lost race)
//!   Eating:   every poll_interval:
//!               left neighbor raising (first time)
//!                 → deadline = now + extra_eat            ("finish the bite")
//!               now >= deadline
//!                 → release left, release right, eating = false
//! ```
//!
//! No pressure, no yield: an eater whose left neighbor never raises eats
//! forever. Seeding two non-adjacent eaters at startup guarantees the first
//! hungry actor finds pressure to apply, and the eating pair then rotates
//! around the ring.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ringfeast::{Config, EaterTracker, LogWriter, Subscribe, Supervisor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ringfeast::RuntimeError> {
//!     let mut cfg = Config::default();
//!     cfg.poll_interval = Duration::from_millis(100);
//!     cfg.extra_eat = Duration::from_millis(500);
//!
//!     let eaters = Arc::new(EaterTracker::new());
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new()), eaters.clone()];
//!
//!     // Runs until SIGINT/SIGTERM.
//!     Supervisor::new(cfg, subs, eaters).run().await
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod table;

pub use config::Config;
pub use core::{seed_eaters, Philosopher, Supervisor};
pub use error::{ConfigError, ProtocolError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use policies::ThinkPolicy;
pub use subscribers::{EaterTracker, LogWriter, Subscribe, SubscriberSet};
pub use table::{Chopstick, SeatState, SeatView, Table};
