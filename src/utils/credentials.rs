//! Basic-auth password loading: CLI → env var → .env in dir → optional secure prompt.

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::path::Path;

use crate::utils::config::PackagePaths;

fn try_env_then_dotenv(dir: &Path) -> Option<String> {
    let key = PackagePaths::get().password_env();
    if let Ok(s) = std::env::var(key) {
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        if let Ok(s) = std::env::var(key) {
            return Some(s);
        }
    }
    None
}

/// Resolve the password for `user`. `cli_password` wins; then env / `.env` in `dir`;
/// then a prompt when `ask` is set. Returns `None` when nothing was found (no `-P` is passed).
///
/// Empty strings are kept: the scanner receives `-P ""` in that case.
pub fn resolve_password(
    user: &str,
    cli_password: Option<String>,
    dir: &Path,
    ask: bool,
) -> Result<Option<String>> {
    if cli_password.is_some() {
        return Ok(cli_password);
    }
    if let Some(s) = try_env_then_dotenv(dir) {
        info!("Password for {} found in environment", user);
        return Ok(Some(s));
    }
    if !ask {
        return Ok(None);
    }
    let label = format!("[{}]", env!("CARGO_PKG_NAME")).cyan().bold();
    let pass = rpassword::prompt_password(format!("{} Password for {}: ", label, user))
        .context("read password")?;
    Ok(Some(pass))
}
