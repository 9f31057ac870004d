//! Scanner launcher: builds scanner invocations, starts them, and tracks the running tasks.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;

use crate::engine::namer::normalize;
use crate::engine::registry::ScanRegistry;
use crate::error::ScanError;
use crate::types::{ScanConfig, ScannerMode};
use crate::utils::config::{DIR_MODE_MARKER, SCANNER_LOG_TARGET};

/// Handle on one running scanner.
pub trait ScanProcess: Send {
    /// True once the process has exited (reaping it if so).
    fn try_finished(&mut self) -> bool;
    /// Ask the process to stop.
    fn terminate(&mut self);
}

impl ScanProcess for Child {
    fn try_finished(&mut self) -> bool {
        !matches!(self.try_wait(), Ok(None))
    }

    #[cfg(unix)]
    fn terminate(&mut self) {
        // SIGTERM lets the scanner flush and close its output file.
        let pid = self.id() as libc::pid_t;
        if unsafe { libc::kill(pid, libc::SIGTERM) } != 0 {
            let _ = self.kill();
        }
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) {
        let _ = self.kill();
    }
}

/// Starts one scan of `target` writing to `output`. Must not block on the scan itself.
pub trait Spawner {
    fn spawn(&self, target: &str, output: &Path) -> Result<Box<dyn ScanProcess>, ScanError>;
}

/// Resolve the scanner binary on PATH (or as a path).
pub fn locate_scanner(name: &str) -> Result<PathBuf, ScanError> {
    which::which(name).map_err(|source| ScanError::ScannerNotFound {
        binary: name.to_string(),
        source,
    })
}

/// Mode from the scanner's no-argument output: subcommand-style releases print a usage line first.
pub fn mode_from_usage(stdout: &[u8]) -> ScannerMode {
    let first_line = stdout.split(|&b| b == b'\n').next().unwrap_or_default();
    if String::from_utf8_lossy(first_line).contains(DIR_MODE_MARKER) {
        ScannerMode::Dir
    } else {
        ScannerMode::Legacy
    }
}

/// Run the scanner once without arguments and inspect its usage output.
pub fn detect_mode(binary: &Path) -> Result<ScannerMode, ScanError> {
    let output = Command::new(binary)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| ScanError::Launch {
            command: binary.display().to_string(),
            source,
        })?;
    let mode = mode_from_usage(&output.stdout);
    debug!("Scanner {} runs in {:?} mode", binary.display(), mode);
    Ok(mode)
}

/// Arguments for one scan. The fixed flags (quiet, no status, expanded URLs, skip TLS verify)
/// shape the output lines the discovery filter parses; do not drop them.
pub fn scanner_args(
    config: &ScanConfig,
    mode: ScannerMode,
    target: &str,
    output: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    if mode == ScannerMode::Dir {
        args.push("dir".into());
    }
    args.extend(["-q", "-n", "-e", "-k"].map(String::from));
    args.extend([
        "-t".into(),
        config.threads.to_string(),
        "-u".into(),
        target.to_string(),
        "-w".into(),
        config.wordlist.display().to_string(),
        "-o".into(),
        output.display().to_string(),
    ]);
    if let Some(exts) = config.extensions_arg() {
        args.extend(["-x".into(), exts]);
    }
    if let Some(auth) = &config.auth {
        args.extend(["-U".into(), auth.username.clone()]);
        if let Some(password) = &auth.password {
            args.extend(["-P".into(), password.clone()]);
        }
    }
    if let Some(proxy) = &config.proxy {
        args.extend(["-p".into(), proxy.clone()]);
    }
    if let Some(agent) = &config.user_agent {
        args.extend(["-a".into(), agent.clone()]);
    }
    args
}

/// Command line as echoed to the user.
pub fn command_line(binary: &Path, args: &[String]) -> String {
    let mut line = binary.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Production spawner: runs the external scanner binary.
pub struct ScannerSpawner {
    binary: PathBuf,
    mode: ScannerMode,
    config: Arc<ScanConfig>,
}

impl ScannerSpawner {
    pub fn new(binary: PathBuf, mode: ScannerMode, config: Arc<ScanConfig>) -> Self {
        Self {
            binary,
            mode,
            config,
        }
    }

    /// Locate the configured scanner and detect its mode.
    pub fn detect(config: Arc<ScanConfig>) -> Result<Self, ScanError> {
        let binary = locate_scanner(&config.scanner)?;
        let mode = detect_mode(&binary)?;
        Ok(Self::new(binary, mode, config))
    }
}

impl Spawner for ScannerSpawner {
    fn spawn(&self, target: &str, output: &Path) -> Result<Box<dyn ScanProcess>, ScanError> {
        let args = scanner_args(&self.config, self.mode, target, output);
        let command = command_line(&self.binary, &args);
        info!(target: SCANNER_LOG_TARGET, "{}", command);
        let stderr = if self.config.devnull {
            Stdio::null()
        } else {
            Stdio::inherit()
        };
        let child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stderr(stderr)
            .spawn()
            .map_err(|source| ScanError::Launch { command, source })?;
        Ok(Box::new(child))
    }
}

/// One target being (or having been) scanned.
struct ScanTask {
    target: String,
    id: String,
    output: PathBuf,
    process: Option<Box<dyn ScanProcess>>,
}

/// Launches scans for new targets and owns their process handles.
pub struct ScanLauncher<S: Spawner> {
    spawner: S,
    registry: ScanRegistry,
    scratch: PathBuf,
    tasks: HashMap<String, ScanTask>,
}

impl<S: Spawner> ScanLauncher<S> {
    pub fn new(spawner: S, registry: ScanRegistry, scratch: &Path) -> Self {
        Self {
            spawner,
            registry,
            scratch: scratch.to_path_buf(),
            tasks: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &ScanRegistry {
        &self.registry
    }

    /// Start a scan of `target` unless it is already active or completed.
    /// Returns whether a scan was started. A spawn failure releases the reservation and is
    /// fatal for the run.
    pub fn launch(&mut self, target: &str) -> Result<bool, ScanError> {
        let id = normalize(target);
        if !self.registry.try_reserve(&id) {
            if let Some(other) = self.claimed_by(&id)
                && other != target
            {
                debug!("Skipping {}: shares identifier {} with {}", target, id, other);
            }
            return Ok(false);
        }
        let output = self.scratch.join(&id);
        let process = match self.spawner.spawn(target, &output) {
            Ok(process) => process,
            Err(e) => {
                self.registry.release(&id);
                return Err(e);
            }
        };
        self.tasks.insert(
            id.clone(),
            ScanTask {
                target: target.to_string(),
                id,
                output,
                process: Some(process),
            },
        );
        Ok(true)
    }

    /// Raw target that was launched under `id`, if any.
    pub fn claimed_by(&self, id: &str) -> Option<&str> {
        self.tasks.get(id).map(|task| task.target.as_str())
    }

    /// Reap exited processes. Returns ids of still-active tasks whose process is gone and whose
    /// output file never appeared: no close event will ever arrive for those.
    pub fn reap_exited(&mut self) -> Vec<String> {
        let mut vanished = Vec::new();
        for task in self.tasks.values_mut() {
            let finished = match task.process.as_mut() {
                Some(p) => p.try_finished(),
                None => true,
            };
            if !finished {
                continue;
            }
            task.process = None;
            if !task.output.exists() && self.registry.is_active(&task.id) {
                warn!(
                    "Scanner for {} exited without creating its output file",
                    task.target
                );
                vanished.push(task.id.clone());
            }
        }
        vanished.sort();
        vanished
    }

    /// Signal every scanner still running. Returns how many were signalled.
    pub fn terminate_all(&mut self) -> usize {
        let mut count = 0;
        for task in self.tasks.values_mut() {
            if let Some(p) = task.process.as_mut()
                && !p.try_finished()
            {
                debug!("Terminating scanner for {}", task.target);
                p.terminate();
                count += 1;
            }
        }
        count
    }
}
