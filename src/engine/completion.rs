//! Run-level completion state machine.
//!
//! `Running` → `Quiescing` when the active count drops to zero; back to `Running` if a scan is
//! launched before the debounce deadline; `Finalized` once the deadline passes with nothing
//! active, or immediately on interrupt. `Finalized` is terminal.

use log::debug;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Quiescing { deadline: Instant },
    Finalized,
}

#[derive(Debug)]
pub struct CompletionDetector {
    state: RunState,
    debounce: Duration,
}

impl CompletionDetector {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: RunState::Running,
            debounce,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == RunState::Finalized
    }

    /// Feed the current active count after any registry change.
    pub fn on_active_count(&mut self, active: usize, now: Instant) {
        match self.state {
            RunState::Running if active == 0 => {
                let deadline = now + self.debounce;
                debug!("No active scans; quiescing for {:?}", self.debounce);
                self.state = RunState::Quiescing { deadline };
            }
            RunState::Quiescing { .. } if active > 0 => {
                debug!("Scan launched while quiescing; back to running");
                self.state = RunState::Running;
            }
            _ => {}
        }
    }

    /// Debounce deadline while quiescing.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            RunState::Quiescing { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// True once the quiet period has fully elapsed.
    pub fn debounce_elapsed(&self, now: Instant) -> bool {
        matches!(self.state, RunState::Quiescing { deadline } if now >= deadline)
    }

    /// Enter `Finalized`. Returns true only for the first call; finalize must run exactly once.
    pub fn finalize(&mut self) -> bool {
        if self.is_finalized() {
            return false;
        }
        self.state = RunState::Finalized;
        true
    }
}
