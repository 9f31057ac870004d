//! Scratch directory holding one output file per scan task.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::utils::config::SCRATCH_PREFIX;

pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    /// Create `rcrsv-scan*` under the system temp dir.
    pub fn create() -> Result<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    /// Create the scratch dir under `parent` (tests use their own temp dir).
    pub fn create_in(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(parent)
            .with_context(|| format!("create scratch dir in {}", parent.display()))?;
        let path = dir.path().to_path_buf();
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output file for a normalized target identifier.
    pub fn output_path(&self, id: &str) -> PathBuf {
        self.path.join(id)
    }

    /// Recursively delete the directory. No-op if already removed.
    pub fn remove(&mut self) -> Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        if !self.path.exists() {
            return Ok(());
        }
        dir.close()
            .with_context(|| format!("remove scratch dir {}", self.path.display()))
    }
}
