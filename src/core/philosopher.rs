//! # Philosopher: the per-seat actor loop.
//!
//! Runs the state machine Thinking → Hungry → Eating → Thinking forever,
//! polling shared table state at a fixed interval. There is no message
//! passing: the only coordination is this loop reading chopstick free-hints
//! and the left neighbor's flags, and writing its own seat flags.
//!
//! ## State machine
//! ```text
//! Thinking ──(randomized sleep)──► Hungry
//!
//! Hungry, each poll:
//!   ├─ not raising && left observed free  → set raising  (intent, no acquire)
//!   └─ raising && right observed free     → acquire left
//!                                           pause (pickup_delay)
//!                                           acquire right
//!                                           clear raising, set eating → Eating
//! Eating, each poll:
//!   ├─ left neighbor raising (first time) → arm deadline = now + extra_eat
//!   └─ deadline reached                   → release left, release right
//!                                           clear eating → Thinking
//! ```
//!
//! ## Rules
//! - Acquisition is attempted only after **both** chopsticks were observed
//!   free, so no actor parks on one chopstick waiting forever for the other.
//!   The observation may go stale; the acquire then simply blocks. This race
//!   is part of the design, not a defect.
//! - Eating ends only under observed neighbor pressure. No pressure, no end.
//! - Cancellation is honored at every suspension point (think sleep, poll
//!   sleeps, acquires). A cancel or contention timeout between the two
//!   acquires releases the half-held left chopstick before backing out.
//! - A failed release is a protocol violation: publish, then abort the actor.

use std::sync::Arc;
use std::time::Duration;

use tokio::select;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::ProtocolError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::ThinkPolicy;
use crate::table::{SeatState, SeatView, Table};

/// Outcome of one two-step pickup attempt.
enum Pickup {
    /// Both chopsticks held; the actor is eating.
    Acquired,
    /// The runtime token fired; nothing is held.
    Cancelled,
    /// A contention timeout fired; nothing is held, keep polling.
    TimedOut,
}

/// Outcome of one blocking acquire.
enum Grab {
    Held,
    Cancelled,
    TimedOut,
}

/// Timing knobs copied out of [`Config`] at construction.
#[derive(Clone, Copy)]
struct Timing {
    poll: Duration,
    extra_eat: Duration,
    pickup_delay: Duration,
    think: ThinkPolicy,
    contention_timeout: Option<Duration>,
}

/// One seat's actor: owns its [`SeatState`], observes its left neighbor.
pub struct Philosopher {
    seat: usize,
    /// Left chopstick index (= seat).
    left: usize,
    /// Right chopstick index (= (seat + 1) mod N).
    right: usize,
    /// Seat index of the left neighbor, watched while eating.
    neighbor: usize,
    table: Arc<Table>,
    state: Arc<SeatState>,
    neighbor_view: SeatView,
    bus: Bus,
    timing: Timing,
}

impl Philosopher {
    /// Creates the actor for `seat`, wiring its ring positions from the table.
    ///
    /// `state` is this seat's own flags; `neighbor_view` must be the view of
    /// seat `(seat − 1) mod N`.
    pub fn new(
        seat: usize,
        cfg: &Config,
        table: Arc<Table>,
        state: Arc<SeatState>,
        neighbor_view: SeatView,
        bus: Bus,
    ) -> Self {
        Self {
            seat,
            left: table.left_of(seat),
            right: table.right_of(seat),
            neighbor: table.left_neighbor_of(seat),
            table,
            state,
            neighbor_view,
            bus,
            timing: Timing {
                poll: cfg.poll_interval,
                extra_eat: cfg.extra_eat,
                pickup_delay: cfg.pickup_delay,
                think: cfg.think,
                contention_timeout: cfg.contention_timeout(),
            },
        }
    }

    /// Seat index of this actor.
    pub fn seat(&self) -> usize {
        self.seat
    }

    /// Runs the actor until cancellation or a protocol violation.
    ///
    /// There is no normal termination: the loop cycles episodes forever. On a
    /// violation the actor publishes [`EventKind::ProtocolViolation`] and
    /// exits with the error so the supervisor can abort the run.
    pub async fn run(self, token: CancellationToken) -> Result<(), ProtocolError> {
        let res = self.episodes(&token).await;
        if let Err(e) = &res {
            self.bus.publish(
                Event::new(EventKind::ProtocolViolation)
                    .with_actor(self.seat)
                    .with_reason(e.as_message()),
            );
        }
        res
    }

    /// The episode loop. A seat whose `eating` flag was set by the privileged
    /// seeding skips straight to the eating phase.
    async fn episodes(&self, token: &CancellationToken) -> Result<(), ProtocolError> {
        loop {
            if token.is_cancelled() {
                return Ok(());
            }
            if !self.state.eating() {
                if !self.sleep_unless_cancelled(self.timing.think.next(), token).await {
                    return Ok(());
                }
                self.bus
                    .publish(Event::new(EventKind::ActorHungry).with_actor(self.seat));
                if !self.hungry(token).await? {
                    return Ok(());
                }
            }
            if !self.eat(token).await? {
                return Ok(());
            }
        }
    }

    /// Hungry phase: poll until both chopsticks are held (or we get seeded
    /// into eating externally). Returns `false` on cancellation.
    async fn hungry(&self, token: &CancellationToken) -> Result<bool, ProtocolError> {
        while !self.state.eating() {
            if !self.sleep_unless_cancelled(self.timing.poll, token).await {
                return Ok(false);
            }

            // Observed-free left chopstick: declare intent. A declaration,
            // not a reservation; the neighbor eating on it reacts on its own
            // next poll.
            if !self.state.raising() && self.table.is_free(self.left) {
                self.state.set_raising(true);
                self.bus.publish(
                    Event::new(EventKind::ChopstickRaised)
                        .with_actor(self.seat)
                        .with_chopstick(self.left),
                );
            }

            // Both observed free: commit to the two-step pickup.
            if self.state.raising() && self.table.is_free(self.right) {
                match self.pick_up_both(token).await? {
                    Pickup::Acquired => {
                        self.state.set_raising(false);
                        self.state.set_eating(true);
                        self.bus.publish(
                            Event::new(EventKind::EatingStarted)
                                .with_actor(self.seat)
                                .with_holds(self.left, self.right),
                        );
                    }
                    Pickup::Cancelled => return Ok(false),
                    // Reported already; raising stays set, keep polling.
                    Pickup::TimedOut => {}
                }
            }
        }
        Ok(true)
    }

    /// Eating phase: keep eating until neighbor pressure runs the grace down.
    /// Returns `false` on cancellation.
    async fn eat(&self, token: &CancellationToken) -> Result<bool, ProtocolError> {
        // A seat seeded into Eating mid-hungry may still carry its intent
        // flag; an eater exerts no pressure of its own.
        self.state.set_raising(false);

        let mut release_at: Option<Instant> = None;

        while self.state.eating() {
            if !self.sleep_unless_cancelled(self.timing.poll, token).await {
                return Ok(false);
            }

            if release_at.is_none() && self.neighbor_view.raising() {
                release_at = Some(Instant::now() + self.timing.extra_eat);
                self.bus.publish(
                    Event::new(EventKind::ReleaseScheduled)
                        .with_actor(self.seat)
                        .with_neighbor(self.neighbor)
                        .with_delay(self.timing.extra_eat),
                );
            }

            if let Some(at) = release_at {
                if Instant::now() >= at {
                    self.table.release(self.left, self.seat)?;
                    self.table.release(self.right, self.seat)?;
                    self.state.set_eating(false);
                    self.bus.publish(
                        Event::new(EventKind::EatingFinished)
                            .with_actor(self.seat)
                            .with_holds(self.left, self.right),
                    );
                }
            }
        }
        Ok(true)
    }

    /// The sequential two-step pickup: left, brief pause, right.
    ///
    /// Any exit other than `Acquired` leaves **nothing** held: the left
    /// chopstick is released before backing out, keeping single-chopstick
    /// holds bounded by the pickup window.
    async fn pick_up_both(&self, token: &CancellationToken) -> Result<Pickup, ProtocolError> {
        match self.acquire_one(self.left, token).await {
            Grab::Held => {}
            Grab::Cancelled => return Ok(Pickup::Cancelled),
            Grab::TimedOut => {
                self.report_contention(self.left);
                return Ok(Pickup::TimedOut);
            }
        }

        if !self.sleep_unless_cancelled(self.timing.pickup_delay, token).await {
            self.table.release(self.left, self.seat)?;
            return Ok(Pickup::Cancelled);
        }

        match self.acquire_one(self.right, token).await {
            Grab::Held => Ok(Pickup::Acquired),
            Grab::Cancelled => {
                self.table.release(self.left, self.seat)?;
                Ok(Pickup::Cancelled)
            }
            Grab::TimedOut => {
                self.report_contention(self.right);
                self.table.release(self.left, self.seat)?;
                Ok(Pickup::TimedOut)
            }
        }
    }

    /// One blocking acquire, bounded by cancellation and the optional
    /// contention timeout.
    ///
    /// The acquire future takes the chopstick only in the same poll that
    /// resolves it, so losing the race to the timeout or the token never
    /// leaks a hold.
    async fn acquire_one(&self, k: usize, token: &CancellationToken) -> Grab {
        let acquire = self.table.acquire(k, self.seat);
        tokio::pin!(acquire);

        match self.timing.contention_timeout {
            Some(limit) => {
                select! {
                    _ = &mut acquire => Grab::Held,
                    _ = time::sleep(limit) => Grab::TimedOut,
                    _ = token.cancelled() => Grab::Cancelled,
                }
            }
            None => {
                select! {
                    _ = &mut acquire => Grab::Held,
                    _ = token.cancelled() => Grab::Cancelled,
                }
            }
        }
    }

    fn report_contention(&self, k: usize) {
        if let Some(limit) = self.timing.contention_timeout {
            self.bus.publish(
                Event::new(EventKind::ContentionTimeout)
                    .with_actor(self.seat)
                    .with_chopstick(k)
                    .with_delay(limit),
            );
        }
    }

    /// Sleeps for `dur` unless the token fires first. `false` = cancelled.
    async fn sleep_unless_cancelled(&self, dur: Duration, token: &CancellationToken) -> bool {
        let sleep = time::sleep(dur);
        tokio::pin!(sleep);
        select! {
            _ = &mut sleep => true,
            _ = token.cancelled() => false,
        }
    }
}
