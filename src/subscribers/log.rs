//! # Timestamped status-line sink.
//!
//! [`LogWriter`] prints one human-readable line per protocol event to stdout,
//! prefixed with the run-relative timestamp. It is the observer capability of
//! the system: a pure side-effect channel, not part of protocol correctness.
//!
//! ## Output format
//! ```text
//! [   2.0s] [seeded] actor=0 holds=0&1
//! [   6.5s] [hungry] actor=1
//! [   7.0s] [raised] actor=1 chopstick=1
//! [   7.5s] [yield-scheduled] actor=0 neighbor=4 in=4000ms
//! [  11.5s] [released] actor=0 holds=0&1
//! [  12.0s] [eating] actor=1 holds=1&2
//! [  20.0s] [status] eaters=[1, 3]
//! ```

use std::time::Instant;

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::Subscribe;

/// Stdout status-line subscriber.
///
/// Timestamps are relative to construction, which the supervisor's default
/// wiring performs at startup, so lines read as seconds into the run.
pub struct LogWriter {
    started: Instant,
}

impl LogWriter {
    /// Creates a sink whose timestamps start at zero now.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn stamp(&self) -> String {
        format!("[{:6.1}s]", self.started.elapsed().as_secs_f64())
    }

    /// Renders the status line for an event, without the timestamp prefix.
    ///
    /// Returns `None` for events missing their expected metadata; those are
    /// not printable as a well-formed line.
    fn render(e: &Event) -> Option<String> {
        let line = match e.kind {
            EventKind::ActorHungry => {
                let actor = e.actor?;
                format!("[hungry] actor={actor}")
            }
            EventKind::ChopstickRaised => {
                let (actor, chopstick) = (e.actor?, e.chopstick?);
                format!("[raised] actor={actor} chopstick={chopstick}")
            }
            EventKind::EatingStarted => {
                let (actor, (l, r)) = (e.actor?, e.holds?);
                format!("[eating] actor={actor} holds={l}&{r}")
            }
            EventKind::ReleaseScheduled => {
                let (actor, neighbor, ms) = (e.actor?, e.neighbor?, e.delay_ms?);
                format!("[yield-scheduled] actor={actor} neighbor={neighbor} in={ms}ms")
            }
            EventKind::EatingFinished => {
                let (actor, (l, r)) = (e.actor?, e.holds?);
                format!("[released] actor={actor} holds={l}&{r}")
            }
            EventKind::TableSeeded => {
                let (actor, (l, r)) = (e.actor?, e.holds?);
                format!("[seeded] actor={actor} holds={l}&{r}")
            }
            EventKind::StatusSnapshot => {
                let eaters = e.eaters.as_deref()?;
                format!("[status] eaters={eaters:?}")
            }
            EventKind::ContentionTimeout => {
                let (actor, chopstick, ms) = (e.actor?, e.chopstick?, e.delay_ms?);
                format!("[contended] actor={actor} chopstick={chopstick} timeout={ms}ms")
            }
            EventKind::ProtocolViolation => {
                let (actor, reason) = (e.actor?, e.reason.as_deref()?);
                format!("[violation] actor={actor} reason={reason}")
            }
            EventKind::ShutdownRequested => "[shutdown-requested]".to_string(),
            EventKind::AllStoppedWithin => "[all-stopped-within-grace]".to_string(),
            EventKind::GraceExceeded => "[grace-exceeded]".to_string(),
        };
        Some(line)
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        if let Some(line) = Self::render(e) {
            println!("{} {line}", self.stamp());
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_renders_documented_line_formats() {
        let cases = [
            (
                Event::new(EventKind::TableSeeded).with_actor(0).with_holds(0, 1),
                "[seeded] actor=0 holds=0&1",
            ),
            (
                Event::new(EventKind::ActorHungry).with_actor(1),
                "[hungry] actor=1",
            ),
            (
                Event::new(EventKind::ChopstickRaised).with_actor(1).with_chopstick(1),
                "[raised] actor=1 chopstick=1",
            ),
            (
                Event::new(EventKind::ReleaseScheduled)
                    .with_actor(0)
                    .with_neighbor(4)
                    .with_delay(Duration::from_secs(4)),
                "[yield-scheduled] actor=0 neighbor=4 in=4000ms",
            ),
            (
                Event::new(EventKind::EatingFinished).with_actor(0).with_holds(0, 1),
                "[released] actor=0 holds=0&1",
            ),
            (
                Event::new(EventKind::ContentionTimeout)
                    .with_actor(3)
                    .with_chopstick(4)
                    .with_delay(Duration::from_millis(250)),
                "[contended] actor=3 chopstick=4 timeout=250ms",
            ),
            (
                Event::new(EventKind::ProtocolViolation)
                    .with_actor(2)
                    .with_reason("released chopstick 2 which is not held"),
                "[violation] actor=2 reason=released chopstick 2 which is not held",
            ),
            (
                Event::new(EventKind::StatusSnapshot).with_eaters(vec![1, 3]),
                "[status] eaters=[1, 3]",
            ),
        ];

        for (ev, expected) in cases {
            assert_eq!(LogWriter::render(&ev).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_incomplete_event_renders_nothing() {
        // Missing metadata must not produce a malformed line.
        assert_eq!(LogWriter::render(&Event::new(EventKind::ReleaseScheduled)), None);
        assert_eq!(LogWriter::render(&Event::new(EventKind::ContentionTimeout)), None);
    }

    #[test]
    fn test_stamp_is_run_relative() {
        let w = LogWriter::new();
        let t = w.stamp();
        assert!(t.starts_with('[') && t.ends_with("s]"), "bad stamp: {t}");
    }
}
