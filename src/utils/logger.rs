use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

use crate::utils::config::SCANNER_LOG_TARGET;

/// One log line. Scanner command lines get a `$` prompt so they stand apart from the
/// coordinator's own messages; warnings and errors carry their module path.
pub fn render_line(level: Level, target: &str, message: &str) -> String {
    let name = env!("CARGO_PKG_NAME").cyan();
    match level {
        Level::Error | Level::Warn => {
            let level_str = if level == Level::Warn {
                "WARN".yellow()
            } else {
                "ERROR".red()
            };
            format!("[{} {} {}] {}", name, level_str, target.white(), message)
        }
        _ if target == SCANNER_LOG_TARGET => format!("[{}] {} {}", name, "$".green(), message),
        _ => format!("[{}] {}", name, message),
    }
}

pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // try_init: tests and lib callers may have installed a logger already
    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_CRATE_NAME"), level)
        .filter_module(SCANNER_LOG_TARGET, LevelFilter::Info)
        .format(|buf, record| {
            let line = render_line(
                record.level(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{}", line)
        })
        .try_init();
}
