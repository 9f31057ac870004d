//! Application configuration constants.
//! Defaults and timing in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    report_prefix: String,
    config_filename: String,
    password_env: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                report_prefix: format!("{pkg}_"),
                config_filename: format!(".{pkg}.toml"),
                password_env: format!("{}_PASSWORD", pkg.replace('-', "_").to_uppercase()),
            }
        })
    }

    /// Report file name for a normalized root target: `recursive-scan_<id>.log`.
    pub fn report_filename(&self, normalized_root: &str) -> String {
        format!("{}{}.log", self.report_prefix, normalized_root)
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Env var consulted for the basic-auth password (`RECURSIVE_SCAN_PASSWORD`).
    pub fn password_env(&self) -> &str {
        &self.password_env
    }
}

// ---- Scanner defaults ----

pub const DEFAULT_SCANNER: &str = "gobuster";
pub const DEFAULT_THREADS: usize = 20;
pub const DEFAULT_WORDLIST: &str = "/usr/share/seclists/Discovery/Web-Content/common.txt";

/// Marker in the scanner's no-argument output that identifies the subcommand-style release.
pub const DIR_MODE_MARKER: &str = "Usage:";

/// Log target for echoed scanner command lines, rendered apart from the crate's own messages.
pub const SCANNER_LOG_TARGET: &str = "scanner";

// ---- Scratch ----

/// Prefix of the scratch directory created under the system temp dir.
pub const SCRATCH_PREFIX: &str = "rcrsv-scan";

// ---- Coordinator timing ----

/// Quiet period with zero active scans before completion is declared.
pub const DEBOUNCE: Duration = Duration::from_secs(3);

/// Upper bound on how long the event loop blocks before reaping exited scanners.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);
