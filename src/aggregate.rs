//! Aggregation: merge every per-target output file into one sorted report.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::engine::namer::normalize;
use crate::utils::config::PackagePaths;

/// Report path for a root target inside `report_dir`.
pub fn report_path(report_dir: &Path, root_target: &str) -> PathBuf {
    report_dir.join(PackagePaths::get().report_filename(&normalize(root_target)))
}

/// All non-blank lines from every file directly under `dir`, sorted. Unreadable files are
/// skipped with a warning. `None` when `dir` is missing or holds no files.
pub fn collect_lines(dir: &Path) -> Option<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Nothing to aggregate in {}: {}", dir.display(), e);
            return None;
        }
    };

    let mut files = 0_usize;
    let mut lines = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        files += 1;
        match fs::read(&path) {
            Ok(bytes) => lines.extend(
                String::from_utf8_lossy(&bytes)
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .map(str::to_string),
            ),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }
    if files == 0 {
        return None;
    }
    lines.sort();
    Some(lines)
}

/// Write `lines` newline-terminated to `path`.
pub fn write_report(path: &Path, lines: &[String]) -> Result<()> {
    let mut file =
        fs::File::create(path).with_context(|| format!("create report {}", path.display()))?;
    let mut buf = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        buf.push_str(line);
        buf.push('\n');
    }
    file.write_all(buf.as_bytes())
        .with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}

/// Merge the scratch dir into the report for `root_target`. Returns `(report, line_count)`;
/// no report is written when there was nothing to aggregate. Does not remove the scratch dir.
pub fn aggregate(
    scratch: &Path,
    root_target: &str,
    report_dir: &Path,
) -> Result<(Option<PathBuf>, usize)> {
    let Some(lines) = collect_lines(scratch) else {
        info!("No scan output to aggregate");
        return Ok((None, 0));
    };
    let path = report_path(report_dir, root_target);
    write_report(&path, &lines)?;
    info!("Wrote {} results to {}", lines.len(), path.display());
    Ok((Some(path), lines.len()))
}
