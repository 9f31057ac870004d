//! Error taxonomy for the scan coordinator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// Scanner binary could not be resolved on PATH.
    #[error("scanner binary `{binary}` not found: {source}")]
    ScannerNotFound {
        binary: String,
        #[source]
        source: which::Error,
    },

    /// Scanner process could not be started.
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A target finished that the registry never saw as active. Means events were lost or duplicated.
    #[error("registry out of sync: `{id}` finished but was not active")]
    RegistryConsistency { id: String },

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// True for the LaunchError family (missing or unstartable scanner).
    pub fn is_launch_error(&self) -> bool {
        matches!(
            self,
            ScanError::ScannerNotFound { .. } | ScanError::Launch { .. }
        )
    }
}
