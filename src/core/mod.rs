//! Runtime core: the actor state machine and its orchestration.
//!
//! Internal modules:
//! - [`philosopher`]: the per-seat polling loop (Thinking → Hungry → Eating)
//!   with the acquisition and pressure-driven release algorithms;
//! - [`seeding`]: one-time privileged initialization of the starting eaters;
//! - [`supervisor`]: spawns actors, seeds the table, reports status, handles
//!   shutdown;
//! - [`shutdown`]: cross-platform termination signal handling.

mod philosopher;
mod seeding;
mod shutdown;
mod supervisor;

pub use philosopher::Philosopher;
pub use seeding::seed_eaters;
pub use supervisor::Supervisor;
