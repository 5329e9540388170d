//! Ringfeast CLI.
//!
//! Runs the ring simulation with the given timing knobs until interrupted.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use ringfeast::{Config, EaterTracker, LogWriter, RuntimeError, Subscribe, Supervisor, ThinkPolicy};

#[derive(Parser)]
#[command(name = "ringfeast")]
#[command(about = "Ring-topology resource-contention simulator")]
struct Cli {
    /// Number of seats (and chopsticks) on the ring
    #[arg(long, default_value = "5")]
    seats: usize,

    /// Poll interval M in milliseconds
    #[arg(long, default_value = "500")]
    poll_ms: u64,

    /// Extra eating time after first observing neighbor pressure, in milliseconds
    #[arg(long, default_value = "4000")]
    extra_eat_ms: u64,

    /// Shortest think time in milliseconds
    #[arg(long, default_value = "3000")]
    think_min_ms: u64,

    /// Longest think time in milliseconds
    #[arg(long, default_value = "8000")]
    think_max_ms: u64,

    /// Seats seeded directly into Eating at startup (comma-separated,
    /// pairwise non-adjacent)
    #[arg(long, value_delimiter = ',', default_value = "0,2")]
    eaters: Vec<usize>,

    /// Delay before the privileged seeding, in milliseconds (must stay below
    /// the shortest think time)
    #[arg(long, default_value = "2000")]
    settle_ms: u64,

    /// Seconds between periodic status snapshots (0 = disabled)
    #[arg(long, default_value = "10")]
    status_secs: u64,

    /// Optional cap on a single blocking acquire, in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    contention_timeout_ms: u64,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            seats: self.seats,
            poll_interval: Duration::from_millis(self.poll_ms),
            extra_eat: Duration::from_millis(self.extra_eat_ms),
            think: ThinkPolicy {
                min: Duration::from_millis(self.think_min_ms),
                max: Duration::from_millis(self.think_max_ms),
            },
            initial_eaters: self.eaters,
            settle_delay: Duration::from_millis(self.settle_ms),
            status_interval: Duration::from_secs(self.status_secs),
            contention_timeout: Duration::from_millis(self.contention_timeout_ms),
            ..Config::default()
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), RuntimeError> {
    let cfg = Cli::parse().into_config();

    let eaters = Arc::new(EaterTracker::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new()), eaters.clone()];

    let supervisor = Supervisor::new(cfg, subs, eaters);
    match supervisor.run().await {
        Ok(()) => {
            println!("simulation stopped gracefully");
            Ok(())
        }
        Err(e) => {
            eprintln!("simulation stopped with error: {e}");
            Err(e)
        }
    }
}
