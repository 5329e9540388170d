//! # Supervisor: spawns the ring, seeds it, observes it, shuts it down.
//!
//! The [`Supervisor`] owns the event bus, a [`SubscriberSet`], and the global
//! configuration. It builds the shared table state, spawns one actor per
//! seat, performs the one-time privileged seeding, and then only observes.
//!
//! ## Key responsibilities
//! - validate [`Config`] before anything starts (fatal on violation)
//! - subscribe to the [`Bus`] and **fan-out** events via [`SubscriberSet`]
//! - spawn one [`Philosopher`] per seat with child cancellation tokens
//! - after [`Config::settle_delay`], seed the initial eaters
//! - periodically publish the eating set as [`EventKind::StatusSnapshot`]
//! - on OS signal perform graceful shutdown with a configurable [`Config::grace`]
//!
//! ## High-level architecture
//! ```text
//! run():
//!   cfg.validate()
//!   Table::new(seats) + SeatState per seat
//!   subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!
//! Spawn actors:
//!   Seat 0   Seat 1   ...  Seat N-1
//!     │        │              │
//!     └──► Philosopher::new(seat, ...)        (one per seat)
//!              └──► set.spawn(actor.run(runtime_token.child_token()))
//!
//! Seeder task (one-shot + reporter):
//!   sleep(settle_delay) ─► seed_eaters() ─► every status_interval:
//!                                              publish StatusSnapshot
//!
//! Shutdown path:
//!   shutdown::wait_for_shutdown_signal()
//!             └─► Bus.publish(ShutdownRequested)
//!             └─► runtime_token.cancel()   → propagates to child tokens
//!             └─► wait_all_with_grace(cfg.grace):
//!                    ├─ Ok (all joined)    → Bus.publish(AllStoppedWithin)
//!                    └─ Timeout exceeded   → Bus.publish(GraceExceeded)
//!                                            (EaterTracker.snapshot() = stuck seats)
//!
//! Fail fast:
//!   any actor returning ProtocolError → cancel everything → RuntimeError::Protocol
//! ```

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::{seed_eaters, shutdown, Philosopher};
use crate::error::{ProtocolError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{EaterTracker, Subscribe, SubscriberSet};
use crate::table::{SeatState, Table};

/// Coordinates the actor ring, event delivery, and graceful shutdown.
pub struct Supervisor {
    /// Global runtime configuration.
    pub cfg: Config,
    /// Event bus shared with all actors.
    pub bus: Bus,
    /// Fan-out set for subscribers.
    pub subs: Arc<SubscriberSet>,
    /// Handle to the eater tracker used for snapshots and the stuck report
    /// (the same instance is in `subs`).
    pub eaters: Arc<EaterTracker>,
}

impl Supervisor {
    /// Creates a new supervisor with the given config and subscribers.
    ///
    /// `eaters` **must** be the same instance as the one included in
    /// `subscribers` (it will be added if absent).
    pub fn new(
        cfg: Config,
        mut subscribers: Vec<Arc<dyn Subscribe>>,
        eaters: Arc<EaterTracker>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());

        let has_tracker = subscribers
            .iter()
            .any(|s| std::ptr::eq::<dyn Subscribe>(&**s as _, &*eaters as &dyn Subscribe));
        if !has_tracker {
            subscribers.push(eaters.clone());
        }

        let subs = Arc::new(SubscriberSet::new(subscribers));
        Self {
            cfg,
            bus,
            subs,
            eaters,
        }
    }

    /// Runs the simulation until a termination signal arrives (graceful
    /// shutdown) or an actor reports a protocol violation (abort).
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.cfg.validate()?;
        self.subscriber_listener();

        let table = Arc::new(Table::new(self.cfg.seats));
        let seats: Vec<Arc<SeatState>> = (0..self.cfg.seats).map(|_| SeatState::new()).collect();

        let token = CancellationToken::new();
        let mut set = JoinSet::new();
        self.spawn_philosophers(&mut set, &token, &table, &seats);
        self.spawn_seeder(&token, table, seats);
        self.drive_shutdown(&mut set, &token).await
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }

    /// Spawns one actor per seat into the join set.
    fn spawn_philosophers(
        &self,
        set: &mut JoinSet<Result<(), ProtocolError>>,
        runtime_token: &CancellationToken,
        table: &Arc<Table>,
        seats: &[Arc<SeatState>],
    ) {
        for seat in 0..self.cfg.seats {
            let neighbor = table.left_neighbor_of(seat);
            let actor = Philosopher::new(
                seat,
                &self.cfg,
                Arc::clone(table),
                Arc::clone(&seats[seat]),
                seats[neighbor].view(),
                self.bus.clone(),
            );
            let child = runtime_token.child_token();
            set.spawn(actor.run(child));
        }
    }

    /// Spawns the one-shot seeding task, which then doubles as the periodic
    /// status reporter.
    fn spawn_seeder(
        &self,
        runtime_token: &CancellationToken,
        table: Arc<Table>,
        seats: Vec<Arc<SeatState>>,
    ) {
        let cfg = self.cfg.clone();
        let bus = self.bus.clone();
        let eaters = Arc::clone(&self.eaters);
        let token = runtime_token.child_token();

        tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(cfg.settle_delay) => {}
                _ = token.cancelled() => return,
            }
            seed_eaters(&table, &seats, &cfg.initial_eaters, &bus, &token).await;

            let Some(every) = cfg.status_interval() else {
                return;
            };
            let mut tick = time::interval(every);
            loop {
                tokio::select! {
                    _ = tick.tick() => {}
                    _ = token.cancelled() => return,
                }
                bus.publish(Event::new(EventKind::StatusSnapshot).with_eaters(eaters.snapshot()));
            }
        });
    }

    /// Waits until either an actor fails or a shutdown signal is received.
    async fn drive_shutdown(
        &self,
        set: &mut JoinSet<Result<(), ProtocolError>>,
        runtime_token: &CancellationToken,
    ) -> Result<(), RuntimeError> {
        tokio::select! {
            sig = shutdown::wait_for_shutdown_signal() => {
                sig?;
                self.bus.publish(Event::new(EventKind::ShutdownRequested));
                runtime_token.cancel();
                self.wait_all_with_grace(set).await
            }
            failure = Self::first_failure(set) => {
                runtime_token.cancel();
                let graceful = self.wait_all_with_grace(set).await;
                match failure {
                    Some(e) => Err(RuntimeError::Protocol(e)),
                    None => graceful,
                }
            }
        }
    }

    /// Drains the join set until an actor returns a [`ProtocolError`] or all
    /// actors have exited.
    ///
    /// Actors have no normal exit while the runtime token is live, so a clean
    /// drain here means every actor was cancelled out from under us.
    async fn first_failure(set: &mut JoinSet<Result<(), ProtocolError>>) -> Option<ProtocolError> {
        while let Some(res) = set.join_next().await {
            match res {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => return Some(e),
                // A panicked actor is already gone; nothing to unwind here.
                Err(_join) => continue,
            }
        }
        None
    }

    /// Waits for all actors to finish within the configured grace period.
    ///
    /// Publishes [`EventKind::AllStoppedWithin`] on success, or
    /// [`EventKind::GraceExceeded`] on timeout and returns
    /// [`RuntimeError::GraceExceeded`] with the seats still eating.
    async fn wait_all_with_grace(
        &self,
        set: &mut JoinSet<Result<(), ProtocolError>>,
    ) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let done = async { while set.join_next().await.is_some() {} };
        let timed = time::timeout(grace, done).await;

        match timed {
            Ok(_) => {
                self.bus.publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                self.bus.publish(Event::new(EventKind::GraceExceeded));
                let stuck = self.eaters.snapshot();
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }
}
