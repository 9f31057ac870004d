//! Engine: target naming, discovery filtering, registry, completion tracking and launching.

pub mod arg_parser;
pub mod cli;
pub mod completion;
pub mod filter;
pub mod launcher;
pub mod namer;
pub mod registry;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{build_config, handle_run};
pub use completion::{CompletionDetector, RunState};
pub use filter::{consider, has_excluded_extension};
pub use launcher::{
    ScanLauncher, ScanProcess, ScannerSpawner, Spawner, command_line, detect_mode,
    locate_scanner, mode_from_usage, scanner_args,
};
pub use namer::normalize;
pub use registry::ScanRegistry;
