//! Shared table state: the chopstick ring and per-seat flags.
//!
//! This module contains the two pieces of state the protocol coordinates
//! through:
//! - [`Table`] / [`Chopstick`] — N exclusively-owned resources on a ring,
//!   acquired and released only by their holder
//! - [`SeatState`] / [`SeatView`] — per-actor signal flags, written only by
//!   the owning actor and observed read-only by its neighbor
//!
//! There is no message passing anywhere: coordination is polling over this
//! state, layered on top of the per-chopstick locks.

mod chopstick;
mod seat;

pub use chopstick::{Chopstick, Table};
pub use seat::{SeatState, SeatView};
