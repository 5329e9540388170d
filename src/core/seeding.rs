//! # Privileged table initialization.
//!
//! The emergent protocol can bootstrap contention on its own, but slowly and
//! without a guaranteed progress condition at t=0. The supervisor instead
//! performs a one-time privileged move: it puts the configured (pairwise
//! non-adjacent) seats directly into Eating by acquiring their chopsticks on
//! their behalf and setting their `eating` flags.
//!
//! With the default 5-seat ring and eaters {0, 2}, this leaves exactly one
//! chopstick free (4), so the first hungry non-seeded actor can start the
//! raise → pressure → yield rotation immediately.
//!
//! After seeding, nobody ever mutates foreign seat state again.

use std::sync::Arc;

use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};
use crate::table::{SeatState, Table};

/// Seeds the given seats into the Eating state.
///
/// For each seat: acquire its left then right chopstick **as that seat**
/// (the holder records match the actor, so its own later release is legal),
/// set its `eating` flag, and publish [`EventKind::TableSeeded`].
///
/// A seat already observed eating is skipped: it got there on its own and
/// already holds its pair, so the privileged acquires would block on it for
/// as long as it keeps eating. [`Config::validate`](crate::Config::validate)
/// keeps the supervised path out of that window (`settle_delay < think.min`),
/// and the skip covers direct callers.
///
/// Both acquires honor `token`; a cancellation between the two releases the
/// half-held left chopstick before returning.
pub async fn seed_eaters(
    table: &Table,
    seats: &[Arc<SeatState>],
    eaters: &[usize],
    bus: &Bus,
    token: &CancellationToken,
) {
    for &actor in eaters {
        if seats[actor].eating() {
            continue;
        }
        let left = table.left_of(actor);
        let right = table.right_of(actor);

        select! {
            _ = table.acquire(left, actor) => {}
            _ = token.cancelled() => return,
        }
        select! {
            _ = table.acquire(right, actor) => {}
            _ = token.cancelled() => {
                let _ = table.release(left, actor);
                return;
            }
        }
        seats[actor].set_eating(true);

        bus.publish(
            Event::new(EventKind::TableSeeded)
                .with_actor(actor)
                .with_holds(left, right),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ring(n: usize) -> (Table, Vec<Arc<SeatState>>) {
        (Table::new(n), (0..n).map(|_| SeatState::new()).collect())
    }

    #[tokio::test]
    async fn test_default_seeding_layout() {
        // N=5, eaters {0, 2}: chopsticks {0,1} to seat 0, {2,3} to seat 2,
        // chopstick 4 free, everyone else not eating.
        let (table, seats) = ring(5);
        let bus = Bus::new(16);

        seed_eaters(&table, &seats, &[0, 2], &bus, &CancellationToken::new()).await;

        assert_eq!(table.holder(0), Some(0));
        assert_eq!(table.holder(1), Some(0));
        assert_eq!(table.holder(2), Some(2));
        assert_eq!(table.holder(3), Some(2));
        assert_eq!(table.holder(4), None);

        assert!(seats[0].eating());
        assert!(seats[2].eating());
        for i in [1, 3, 4] {
            assert!(!seats[i].eating(), "seat {i} must not be eating");
            assert!(!seats[i].raising(), "seat {i} must not be raising");
        }
    }

    #[tokio::test]
    async fn test_seeding_publishes_one_event_per_eater() {
        let (table, seats) = ring(5);
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        seed_eaters(&table, &seats, &[0, 2], &bus, &CancellationToken::new()).await;

        for expected in [0usize, 2] {
            let ev = rx.recv().await.unwrap();
            assert_eq!(ev.kind, EventKind::TableSeeded);
            assert_eq!(ev.actor, Some(expected));
            assert_eq!(ev.holds, Some((expected, expected + 1)));
        }
    }

    #[tokio::test]
    async fn test_seeded_releases_are_legal() {
        // The holder records belong to the seeded actor, not the supervisor,
        // so the actor's own release path stays valid.
        let (table, seats) = ring(5);
        let bus = Bus::new(16);

        seed_eaters(&table, &seats, &[2], &bus, &CancellationToken::new()).await;
        assert!(table.release(2, 2).is_ok());
        assert!(table.release(3, 2).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skips_seat_already_eating() {
        // A seat that started eating on its own already holds its pair; the
        // seeding must pass it by instead of blocking on its chopsticks.
        let (table, seats) = ring(5);
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        table.acquire(0, 0).await;
        table.acquire(1, 0).await;
        seats[0].set_eating(true);

        let seeded = tokio::time::timeout(
            Duration::from_secs(60),
            seed_eaters(&table, &seats, &[0, 2], &bus, &CancellationToken::new()),
        )
        .await;
        assert!(seeded.is_ok(), "seeding blocked on a seat already eating");

        // Seat 2 is still seeded; seat 0's state is untouched.
        assert_eq!(table.holder(2), Some(2));
        assert_eq!(table.holder(3), Some(2));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::TableSeeded);
        assert_eq!(ev.actor, Some(2));
        assert!(rx.try_recv().is_err(), "skipped seat must publish nothing");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_seed_releases_half_hold() {
        // Chopstick 1 is held elsewhere, so the seeding of seat 0 blocks
        // between its two acquires. Cancelling must put chopstick 0 back.
        let table = Arc::new(Table::new(5));
        let seats: Vec<Arc<SeatState>> = (0..5).map(|_| SeatState::new()).collect();
        let bus = Bus::new(16);
        let token = CancellationToken::new();

        table.acquire(1, 9).await;

        let seeding = {
            let table = Arc::clone(&table);
            let seats = seats.clone();
            let bus = bus.clone();
            let token = token.clone();
            tokio::spawn(async move { seed_eaters(&table, &seats, &[0], &bus, &token).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!seeding.is_finished());
        token.cancel();
        seeding.await.unwrap();

        assert_eq!(table.holder(0), None, "half-hold leaked on cancellation");
        assert_eq!(table.holder(1), Some(9));
        assert!(!seats[0].eating());
    }
}
