//! Server process watchdog
//!
//! Polls the process table at a fixed interval and raises a clear signal on
//! the running -> not running edge only. The state starts as "running", so a
//! server that is already down fires once on the first tick; at that point
//! nothing is tracked yet and the clear is silent.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::events::{ClearReason, DropEvents};
use crate::process_monitor::ProcessProbe;

/// Edge detector over successive liveness observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivenessState {
    was_running: bool,
}

impl Default for LivenessState {
    fn default() -> Self {
        Self { was_running: true }
    }
}

impl LivenessState {
    /// Record an observation. Returns true when the process just stopped.
    /// `None` (probe failed) keeps the previous state.
    pub fn observe(&mut self, observed: Option<bool>) -> bool {
        let Some(running) = observed else {
            return false;
        };
        let stopped = self.was_running && !running;
        self.was_running = running;
        stopped
    }

    pub fn was_running(&self) -> bool {
        self.was_running
    }
}

pub struct ProcessWatchdog<H, P> {
    process_name: String,
    interval: Duration,
    events: Arc<H>,
    probe: P,
    state: LivenessState,
}

impl<H: DropEvents, P: ProcessProbe> ProcessWatchdog<H, P> {
    pub fn new(process_name: impl Into<String>, interval: Duration, events: Arc<H>, probe: P) -> Self {
        Self {
            process_name: process_name.into(),
            interval,
            events,
            probe,
            state: LivenessState::default(),
        }
    }

    /// Poll once, firing the clear signal on a stop edge
    pub async fn tick(&mut self) -> bool {
        let observed = self.probe.is_running(&self.process_name).await;
        if observed.is_none() {
            tracing::debug!(process = %self.process_name, "Process check failed, keeping previous state");
        }

        let was_running = self.state.was_running();
        let stopped = self.state.observe(observed);
        if stopped {
            tracing::info!(process = %self.process_name, "Server process stopped");
            self.events.clear(ClearReason::ProcessExited).await;
        } else if !was_running && self.state.was_running() {
            tracing::info!(process = %self.process_name, "Server process is running again");
        }
        stopped
    }

    /// Poll forever
    pub async fn run(mut self) {
        tracing::info!(
            process = %self.process_name,
            interval_secs = self.interval.as_secs_f64(),
            "Process watchdog started"
        );
        loop {
            self.tick().await;
            sleep(self.interval).await;
        }
    }
}
