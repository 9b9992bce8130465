// File: src/timer.rs
use std::time::{Duration, Instant};
use tracing::info;

/// A running measurement. Consumed by [`Stopwatch::stop`], so a stopwatch
/// cannot be stopped twice or stopped without being started.
#[derive(Debug)]
#[must_use = "a stopwatch measures nothing unless stopped"]
pub struct Stopwatch {
    label: &'static str,
    started: Instant,
}

impl Stopwatch {
    pub fn start(label: &'static str) -> Self {
        Self { label, started: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn stop(self) -> Duration {
        let elapsed = self.started.elapsed();
        info!(label = self.label, seconds = elapsed.as_secs_f64(), "timing");
        elapsed
    }
}
