//! Pipeline components: event source, incremental output reader, coordinator loop.

pub mod coordinator;
pub mod events;
pub mod tail;
pub mod watcher;

pub use coordinator::Coordinator;
pub use events::ScanEvent;
pub use tail::OutputTail;
pub use watcher::{ScratchWatcher, translate};
