//! Coordinator: the single event loop that turns scanner output into new scans and decides
//! when the whole run is done.
//!
//! Every event (file appended, file closed, interrupt) arrives on one channel and is handled
//! here, one at a time, so registry updates and finalization never race each other.

use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::aggregate::aggregate;
use crate::engine::completion::CompletionDetector;
use crate::engine::filter::consider;
use crate::engine::launcher::{ScanLauncher, Spawner};
use crate::engine::registry::ScanRegistry;
use crate::error::ScanError;
use crate::pipeline::events::ScanEvent;
use crate::pipeline::tail::OutputTail;
use crate::types::{RunSummary, ScanConfig};
use crate::utils::ScratchDir;
use crate::utils::config::TICK_INTERVAL;

/// Why the event loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopExit {
    Complete,
    Interrupted,
}

pub struct Coordinator<S: Spawner> {
    config: Arc<ScanConfig>,
    launcher: ScanLauncher<S>,
    detector: CompletionDetector,
    tail: OutputTail,
    scratch: ScratchDir,
    rx: Receiver<ScanEvent>,
    tick: Duration,
}

impl<S: Spawner> Coordinator<S> {
    pub fn new(
        config: Arc<ScanConfig>,
        spawner: S,
        scratch: ScratchDir,
        rx: Receiver<ScanEvent>,
    ) -> Self {
        let launcher = ScanLauncher::new(spawner, ScanRegistry::new(), scratch.path());
        Self {
            detector: CompletionDetector::new(config.debounce),
            config,
            launcher,
            tail: OutputTail::new(),
            scratch,
            rx,
            tick: TICK_INTERVAL,
        }
    }

    /// Override how often the loop wakes up to reap exited scanners.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn registry(&self) -> &ScanRegistry {
        self.launcher.registry()
    }

    /// Launch the root scan, process events until done or interrupted, then aggregate and
    /// clean up. Fatal errors still aggregate and clean up before being returned.
    pub fn run(mut self) -> Result<RunSummary> {
        let target = self.config.target.clone();
        let outcome = self
            .launcher
            .launch(&target)
            .and_then(|_| self.event_loop());

        let stopped_early = !matches!(outcome, Ok(LoopExit::Complete));
        if stopped_early {
            self.stop_scanners();
        }
        let summary = self.finalize(matches!(outcome, Ok(LoopExit::Interrupted)))?;
        match outcome {
            Ok(_) => Ok(summary),
            Err(e) => Err(e.into()),
        }
    }

    fn event_loop(&mut self) -> Result<LoopExit, ScanError> {
        loop {
            let wait = match self.detector.deadline() {
                Some(deadline) => deadline
                    .saturating_duration_since(Instant::now())
                    .min(self.tick),
                None => self.tick,
            };
            match self.rx.recv_timeout(wait) {
                Ok(ScanEvent::Interrupt) => {
                    info!("Interrupted; writing results collected so far");
                    return Ok(LoopExit::Interrupted);
                }
                Ok(ScanEvent::Appended(path)) => self.on_appended(&path)?,
                Ok(ScanEvent::Closed(path)) => self.on_closed(&path)?,
                Ok(ScanEvent::WatchError(msg)) => warn!("Watcher: {}", msg),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Event source closed; finishing early");
                    return Ok(LoopExit::Interrupted);
                }
            }

            for id in self.launcher.reap_exited() {
                self.complete(&id)?;
            }

            if self.detector.debounce_elapsed(Instant::now()) && self.rx.is_empty() {
                // Every scanner has closed its file, so one more pass sees every line.
                self.catch_up()?;
                if self.registry().active_count() == 0 {
                    info!("All scans complete. Cleaning up.");
                    return Ok(LoopExit::Complete);
                }
            }
        }
    }

    /// New lines in `path` may name directories worth scanning.
    fn on_appended(&mut self, path: &Path) -> Result<(), ScanError> {
        self.discover_from(path, false)
    }

    /// A closed output file means that scan is over. Lines written just before the close,
    /// including a last line without its newline, are consumed first.
    fn on_closed(&mut self, path: &Path) -> Result<(), ScanError> {
        let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(());
        };
        let id = id.to_string();
        self.discover_from(path, true)?;
        self.complete(&id)
    }

    /// Feed unread lines of `path` to discovery. `closed` also takes an unterminated last line.
    fn discover_from(&mut self, path: &Path, closed: bool) -> Result<(), ScanError> {
        let read = if closed {
            self.tail.read_remaining(path)
        } else {
            self.tail.read_new_lines(path)
        };
        let lines = match read {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                return Ok(());
            }
        };
        for line in lines {
            self.discover(&line)?;
        }
        Ok(())
    }

    fn discover(&mut self, line: &str) -> Result<(), ScanError> {
        let Some(child) = consider(line, &self.config.extensions) else {
            return Ok(());
        };
        if self.launcher.launch(&child)? {
            debug!("Discovered {}", child);
            let active = self.registry().active_count();
            self.detector.on_active_count(active, Instant::now());
        }
        Ok(())
    }

    fn complete(&mut self, id: &str) -> Result<(), ScanError> {
        self.registry().mark_complete(id)?;
        let active = self.registry().active_count();
        self.detector.on_active_count(active, Instant::now());
        Ok(())
    }

    /// Read whatever is left unread in every completed output file.
    fn catch_up(&mut self) -> Result<(), ScanError> {
        let outputs: Vec<_> = self
            .registry()
            .completed_ids()
            .into_iter()
            .map(|id| self.scratch.output_path(&id))
            .collect();
        for path in outputs {
            self.discover_from(&path, true)?;
        }
        Ok(())
    }

    fn stop_scanners(&mut self) {
        let running = self.registry().active_count();
        if running == 0 {
            return;
        }
        if self.config.kill_on_interrupt {
            let n = self.launcher.terminate_all();
            info!("Terminated {} running scanners", n);
        } else {
            info!("Leaving {} scanners running", running);
        }
    }

    /// Aggregate, remove the scratch dir, and report. Runs once; later calls are no-ops.
    fn finalize(&mut self, interrupted: bool) -> Result<RunSummary> {
        let scans_completed = self.registry().completed_count();
        if !self.detector.finalize() {
            return Ok(RunSummary {
                scans_completed,
                interrupted,
                ..RunSummary::default()
            });
        }
        let (report, lines) = aggregate(
            self.scratch.path(),
            &self.config.target,
            &self.config.report_dir,
        )?;
        self.scratch.remove()?;
        Ok(RunSummary {
            report,
            lines,
            scans_completed,
            interrupted,
        })
    }
}
