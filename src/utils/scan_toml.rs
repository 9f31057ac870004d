//! Load `.recursive-scan.toml` from a directory (CLI only). Lib callers build `ScanConfig` directly.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::{ScanConfig, parse_extensions};
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct ScanToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    threads: Option<usize>,
    wordlist: Option<String>,
    extensions: Option<String>,
    proxy: Option<String>,
    user_agent: Option<String>,
    scanner: Option<String>,
    devnull: Option<bool>,
    debounce_secs: Option<u64>,
    kill_on_interrupt: Option<bool>,
}

/// Load the config file from `dir` if present. Returns None if missing, unreadable or malformed.
pub fn load_scan_toml(dir: &Path) -> Option<ScanToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_scan_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub fn parse_scan_toml(s: &str) -> Result<ScanToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite config field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $config:expr, $field:ident) => {
        if let Some(v) = $section.$field.clone() {
            $config.$field = v;
        }
    };
}

/// Apply file settings to config (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_config(file: &ScanToml, config: &mut ScanConfig) {
    let s = &file.settings;
    apply_file_opt!(s, config, threads);
    apply_file_opt!(s, config, scanner);
    apply_file_opt!(s, config, devnull);
    apply_file_opt!(s, config, kill_on_interrupt);
    if let Some(ref w) = s.wordlist {
        config.wordlist = PathBuf::from(w);
    }
    if let Some(ref x) = s.extensions {
        config.extensions = parse_extensions(x);
    }
    if s.proxy.is_some() {
        config.proxy = s.proxy.clone();
    }
    if s.user_agent.is_some() {
        config.user_agent = s.user_agent.clone();
    }
    if let Some(secs) = s.debounce_secs {
        config.debounce = Duration::from_secs(secs);
    }
}
