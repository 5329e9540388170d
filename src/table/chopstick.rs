//! # Chopstick: exclusively-owned lockable resource, and the ring of them.
//!
//! A [`Chopstick`] is held by at most one actor at a time. The holder's seat
//! index is recorded for exactly one purpose: catching releases by a non-holder
//! (or of an already-free chopstick), which are logic defects and must fail
//! fast rather than be silently tolerated.
//!
//! ## Contract
//! - [`Chopstick::is_free`] is a non-mutating hint; it may be stale the moment
//!   it returns. The protocol treats it as a heuristic, never a reservation.
//! - [`Chopstick::acquire`] blocks until the chopstick is free. No timeout,
//!   no fairness guarantee; liveness discipline lives in the actor loop.
//! - [`Chopstick::release`] errors unless called by the current holder.
//!
//! ## Blocking without busy-waiting
//! `acquire` uses the wake-and-recheck pattern: create the `Notify` future
//! *before* checking the holder slot, so a release between the check and the
//! await still wakes us. Several woken waiters re-race for the slot; losers
//! loop back to waiting.

use std::sync::{Mutex, PoisonError};

use tokio::sync::Notify;

use crate::error::ProtocolError;

/// One exclusively-owned resource on the ring.
pub struct Chopstick {
    /// Ring position, used in error reports.
    id: usize,
    /// Seat index of the current holder, `None` when free.
    holder: Mutex<Option<usize>>,
    /// Wakes blocked acquirers on release.
    freed: Notify,
}

impl Chopstick {
    /// Creates a free chopstick at ring position `id`.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            holder: Mutex::new(None),
            freed: Notify::new(),
        }
    }

    /// Ring position of this chopstick.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Non-mutating check whether the chopstick is currently free.
    ///
    /// The answer may be stale immediately after return. Callers must
    /// tolerate losing the subsequent race and blocking inside
    /// [`acquire`](Self::acquire).
    pub fn is_free(&self) -> bool {
        self.slot().is_none()
    }

    /// Seat index of the current holder, if any.
    pub fn holder(&self) -> Option<usize> {
        *self.slot()
    }

    /// Attempts to take the chopstick without blocking.
    ///
    /// Returns `true` if `actor` now holds it.
    pub fn try_acquire(&self, actor: usize) -> bool {
        let mut slot = self.slot();
        if slot.is_none() {
            *slot = Some(actor);
            true
        } else {
            false
        }
    }

    /// Blocks until the chopstick is free, then records `actor` as holder.
    ///
    /// May block indefinitely while contested; the caller bounds this with
    /// its own timeout/cancellation if it needs to.
    pub async fn acquire(&self, actor: usize) {
        loop {
            let freed = self.freed.notified();
            if self.try_acquire(actor) {
                return;
            }
            freed.await;
        }
    }

    /// Releases the chopstick held by `actor` and wakes blocked acquirers.
    ///
    /// Fails with [`ProtocolError::ReleaseWhileFree`] if the chopstick is not
    /// held, or [`ProtocolError::ReleaseByNonHolder`] if it is held by
    /// someone else. Both indicate a broken acquisition discipline.
    pub fn release(&self, actor: usize) -> Result<(), ProtocolError> {
        {
            let mut slot = self.slot();
            match *slot {
                None => {
                    return Err(ProtocolError::ReleaseWhileFree {
                        chopstick: self.id,
                        actor,
                    });
                }
                Some(holder) if holder != actor => {
                    return Err(ProtocolError::ReleaseByNonHolder {
                        chopstick: self.id,
                        actor,
                        holder,
                    });
                }
                Some(_) => {
                    *slot = None;
                }
            }
        }
        self.freed.notify_waiters();
        Ok(())
    }

    /// Locks the holder slot, shrugging off poison (the slot is a plain
    /// `Option` and cannot be left in a torn state).
    fn slot(&self) -> std::sync::MutexGuard<'_, Option<usize>> {
        self.holder.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The ring of chopsticks.
///
/// Chopstick *k* sits between seat *k* and seat *k−1*: it is seat *k*'s left
/// chopstick and seat *k−1*'s right one. All access goes through ring indices;
/// no retries or timeouts exist at this layer.
pub struct Table {
    chopsticks: Vec<Chopstick>,
}

impl Table {
    /// Creates a table with `seats` free chopsticks.
    pub fn new(seats: usize) -> Self {
        Self {
            chopsticks: (0..seats).map(Chopstick::new).collect(),
        }
    }

    /// Number of seats (and chopsticks) on the ring.
    pub fn seats(&self) -> usize {
        self.chopsticks.len()
    }

    /// Index of the left chopstick of seat `i`.
    #[inline]
    pub fn left_of(&self, i: usize) -> usize {
        i
    }

    /// Index of the right chopstick of seat `i`.
    #[inline]
    pub fn right_of(&self, i: usize) -> usize {
        (i + 1) % self.seats()
    }

    /// Index of the left neighbor of seat `i` (the seat it watches while eating).
    #[inline]
    pub fn left_neighbor_of(&self, i: usize) -> usize {
        (i + self.seats() - 1) % self.seats()
    }

    /// Non-mutating free-hint for chopstick `k`. May be stale on return.
    pub fn is_free(&self, k: usize) -> bool {
        self.chopsticks[k].is_free()
    }

    /// Current holder of chopstick `k`, if any.
    pub fn holder(&self, k: usize) -> Option<usize> {
        self.chopsticks[k].holder()
    }

    /// Blocks until chopstick `k` is free, then marks it held by `actor`.
    pub async fn acquire(&self, k: usize, actor: usize) {
        self.chopsticks[k].acquire(actor).await
    }

    /// Releases chopstick `k` on behalf of `actor`.
    pub fn release(&self, k: usize, actor: usize) -> Result<(), ProtocolError> {
        self.chopsticks[k].release(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_exclusive_hold() {
        let c = Chopstick::new(0);
        assert!(c.try_acquire(1));
        assert!(!c.try_acquire(2));
        assert_eq!(c.holder(), Some(1));
        assert!(!c.is_free());
    }

    #[test]
    fn test_release_while_free_is_violation() {
        let c = Chopstick::new(3);
        assert_eq!(
            c.release(0),
            Err(ProtocolError::ReleaseWhileFree {
                chopstick: 3,
                actor: 0
            })
        );
    }

    #[test]
    fn test_release_by_non_holder_is_violation() {
        let c = Chopstick::new(1);
        assert!(c.try_acquire(4));
        assert_eq!(
            c.release(2),
            Err(ProtocolError::ReleaseByNonHolder {
                chopstick: 1,
                actor: 2,
                holder: 4
            })
        );
        // The hold survives the rejected release.
        assert_eq!(c.holder(), Some(4));
    }

    #[test]
    fn test_double_release_is_violation() {
        let c = Chopstick::new(2);
        assert!(c.try_acquire(0));
        assert!(c.release(0).is_ok());
        assert!(matches!(
            c.release(0),
            Err(ProtocolError::ReleaseWhileFree { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_blocks_until_release() {
        let c = Arc::new(Chopstick::new(0));
        assert!(c.try_acquire(0));

        let contender = {
            let c = Arc::clone(&c);
            tokio::spawn(async move {
                c.acquire(1).await;
            })
        };

        // The contender stays blocked while the chopstick is held.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!contender.is_finished());
        assert_eq!(c.holder(), Some(0));

        c.release(0).unwrap();
        contender.await.unwrap();
        assert_eq!(c.holder(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_hint_then_blocking_acquire() {
        // An observed-free hint that went stale must degrade into a clean
        // blocking acquire, not a failure.
        let c = Arc::new(Chopstick::new(0));
        assert!(c.is_free());
        assert!(c.try_acquire(9)); // someone else raced in

        let late = {
            let c = Arc::clone(&c);
            tokio::spawn(async move { c.acquire(1).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!late.is_finished());

        c.release(9).unwrap();
        late.await.unwrap();
        assert_eq!(c.holder(), Some(1));
    }

    #[test]
    fn test_ring_indexing() {
        let t = Table::new(5);
        assert_eq!(t.left_of(0), 0);
        assert_eq!(t.right_of(0), 1);
        assert_eq!(t.right_of(4), 0);
        assert_eq!(t.left_neighbor_of(0), 4);
        assert_eq!(t.left_neighbor_of(3), 2);
    }
}
