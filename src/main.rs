//! recursive-scan CLI: recursively brute-force directories under a target.

use anyhow::Result;
use clap::Parser;
use recursive_scan::engine::{Cli, handle_run};
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
