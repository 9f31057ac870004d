//! recursive-scan: recursive content discovery on top of an external directory brute-forcer.

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::ScanError;
pub use types::*;

use anyhow::Context;
use log::debug;
use std::sync::Arc;

use crate::engine::ScannerSpawner;
use crate::pipeline::{Coordinator, ScanEvent, ScratchWatcher};
use crate::utils::ScratchDir;

/// Result alias used by public recursive-scan API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: scan `config.target` recursively and write the merged report.
///
/// Locates the scanner and detects its mode first (a missing scanner fails before anything is
/// created), then watches a fresh scratch dir, installs the Ctrl+C handler, and runs the
/// coordinator until every scan is done or the user interrupts.
///
/// Installs a process-wide Ctrl+C handler, so call it at most once per process. Lib callers
/// who need their own signal handling can drive [`Coordinator`] directly.
pub fn scan(config: ScanConfig) -> Result<RunSummary> {
    let config = Arc::new(config);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        config
    );

    let spawner = ScannerSpawner::detect(Arc::clone(&config))?;
    let scratch = ScratchDir::create()?;
    debug!("Scratch dir: {}", scratch.path().display());

    let (tx, rx) = crossbeam_channel::unbounded::<ScanEvent>();
    let _watcher = ScratchWatcher::start(scratch.path(), tx.clone())?;
    ctrlc::set_handler(move || {
        let _ = tx.send(ScanEvent::Interrupt);
    })
    .context("set Ctrl+C handler")?;

    Coordinator::new(config, spawner, scratch, rx).run()
}
