//! Public and internal types for the recursive-scan API and coordinator.

use std::path::PathBuf;
use std::time::Duration;

use crate::utils::config::{DEBOUNCE, DEFAULT_SCANNER, DEFAULT_THREADS, DEFAULT_WORDLIST};

/// Basic-auth credentials passed to the scanner (dir mode only).
///
/// A password is only meaningful with a username; the scanner silently ignores `-P` without
/// `-U`, and so do we (see [`ScanConfig::with_auth`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    /// `Some("")` is a real (empty) password and is still passed.
    pub password: Option<String>,
}

/// How the scanner binary wants to be invoked, detected once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScannerMode {
    /// Modern scanner with subcommands: `dir` is prepended to every invocation.
    Dir,
    /// Older scanner without subcommands.
    Legacy,
}

/// Root configuration. Built once from CLI + config file, then shared read-only.
#[derive(Clone, Debug)]
pub struct ScanConfig {
    /// Original (root) target, e.g. `http://10.10.10.112/`.
    pub target: String,
    /// Wordlist passed to every scanner.
    pub wordlist: PathBuf,
    /// Thread count passed to every scanner.
    pub threads: usize,
    /// Extensions without the leading dot. Hits ending in one of these are files, never recursed into.
    pub extensions: Vec<String>,
    pub auth: Option<BasicAuth>,
    /// Proxy URL, `http(s)://host:port`.
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
    /// Scanner binary name or path.
    pub scanner: String,
    /// Send the scanner's stderr to /dev/null.
    pub devnull: bool,
    /// Quiet period with zero active scans before the run is declared complete.
    pub debounce: Duration,
    /// Directory the final report is written to.
    pub report_dir: PathBuf,
    /// Terminate still-running scanners when interrupted instead of leaving them orphaned.
    pub kill_on_interrupt: bool,
}

impl ScanConfig {
    /// Config for `target` with every other field at its default.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            wordlist: PathBuf::from(DEFAULT_WORDLIST),
            threads: DEFAULT_THREADS,
            extensions: Vec::new(),
            auth: None,
            proxy: None,
            user_agent: None,
            scanner: DEFAULT_SCANNER.to_string(),
            devnull: false,
            debounce: DEBOUNCE,
            report_dir: PathBuf::from("."),
            kill_on_interrupt: false,
        }
    }

    /// Set auth from optional user/password. A password without a user is dropped.
    pub fn with_auth(mut self, user: Option<String>, password: Option<String>) -> Self {
        self.auth = match user {
            Some(username) => Some(BasicAuth { username, password }),
            None => {
                if password.is_some() {
                    log::warn!("Password given without a user; ignoring it");
                }
                None
            }
        };
        self
    }

    /// Extensions joined back into the scanner's `-x` form, or `None` when empty.
    pub fn extensions_arg(&self) -> Option<String> {
        if self.extensions.is_empty() {
            None
        } else {
            Some(self.extensions.join(","))
        }
    }
}

/// Parse a comma-separated extension list: trims entries, strips a leading `.`, drops empties.
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// What a finished run produced.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Report path, or `None` when there was nothing to aggregate.
    pub report: Option<PathBuf>,
    /// Number of lines written to the report.
    pub lines: usize,
    /// Scans that reached completion.
    pub scans_completed: usize,
    /// True when the run ended because of an interrupt.
    pub interrupted: bool,
}
