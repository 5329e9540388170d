//! Actor timing policies.
//!
//! ## Contents
//! - [`ThinkPolicy`] — how long an actor thinks between eating episodes
//!   (uniform random over a configured range)
//!
//! ## Quick wiring
//! ```text
//! Config { think: ThinkPolicy, .. }
//!      └─► core::philosopher::Philosopher samples think.next() before
//!          each hungry phase
//! ```

mod think;

pub use think::ThinkPolicy;
