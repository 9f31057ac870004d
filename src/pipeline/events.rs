//! Events consumed by the coordinator loop.

use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanEvent {
    /// A scanner appended to its output file.
    Appended(PathBuf),
    /// A scanner closed its output file (scan finished).
    Closed(PathBuf),
    /// User asked to stop (Ctrl+C).
    Interrupt,
    /// Watcher backend reported an error; logged, not fatal.
    WatchError(String),
}
