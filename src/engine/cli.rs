//! CLI command handler: build the run configuration and start the scan.

use anyhow::Result;
use log::info;
use std::path::Path;
use std::time::Duration;

use crate::engine::arg_parser::Cli;
use crate::types::{ScanConfig, parse_extensions};
use crate::utils::{apply_file_to_config, load_scan_toml, resolve_password, setup_logging};

/// Defaults < config file in `dir` < CLI flags.
pub fn build_config(cli: &Cli, dir: &Path) -> Result<ScanConfig> {
    let mut config = ScanConfig::new(cli.target.clone());
    if let Some(file) = load_scan_toml(dir) {
        apply_file_to_config(&file, &mut config);
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(ref w) = cli.wordlist {
        config.wordlist = w.clone();
    }
    if let Some(ref x) = cli.extensions {
        config.extensions = parse_extensions(x);
    }
    if cli.proxy.is_some() {
        config.proxy = cli.proxy.clone();
    }
    if cli.user_agent.is_some() {
        config.user_agent = cli.user_agent.clone();
    }
    if let Some(ref s) = cli.scanner {
        config.scanner = s.clone();
    }
    if let Some(secs) = cli.debounce {
        config.debounce = Duration::from_secs(secs);
    }
    if let Some(ref o) = cli.output_dir {
        config.report_dir = o.clone();
    }
    config.devnull |= cli.devnull;
    config.kill_on_interrupt |= cli.kill_on_interrupt;

    let password = match cli.user {
        Some(ref user) => resolve_password(user, cli.password.clone(), dir, cli.ask_password)?,
        None => cli.password.clone(),
    };
    Ok(config.with_auth(cli.user.clone(), password))
}

/// Run a full recursive scan from the CLI.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose);
    let config = build_config(cli, Path::new("."))?;
    let summary = crate::scan(config)?;
    match summary.report {
        Some(ref path) => info!(
            "{} results from {} scans in {}",
            summary.lines,
            summary.scans_completed,
            path.display()
        ),
        None => info!("No results"),
    }
    Ok(())
}
