//! Filesystem watcher on the scratch dir, feeding the coordinator channel.

use crossbeam_channel::Sender;
use log::debug;
use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;

use crate::error::ScanError;
use crate::pipeline::events::ScanEvent;

/// Map a raw notification to coordinator events. Only appends and close-after-write matter.
pub fn translate(event: &Event) -> Vec<ScanEvent> {
    let make: fn(std::path::PathBuf) -> ScanEvent = match event.kind {
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            ScanEvent::Appended
        }
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => ScanEvent::Closed,
        _ => return Vec::new(),
    };
    event.paths.iter().cloned().map(make).collect()
}

/// Keeps the OS watch alive; dropping it stops notifications.
pub struct ScratchWatcher {
    _watcher: RecommendedWatcher,
}

impl ScratchWatcher {
    /// Watch `dir` (non-recursive) and forward appends/closes into `tx`.
    pub fn start(dir: &Path, tx: Sender<ScanEvent>) -> Result<Self, ScanError> {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    for ev in translate(&event) {
                        let _ = tx.send(ev);
                    }
                }
                Err(e) => {
                    let _ = tx.send(ScanEvent::WatchError(e.to_string()));
                }
            }
        })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        debug!("Watching {}", dir.display());
        Ok(Self { _watcher: watcher })
    }
}
