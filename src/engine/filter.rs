//! Discovery filter: which scanner hits are worth recursing into.

/// Path part of a scanner line. Expanded-mode lines may carry annotations after the URL
/// (`http://x/a [Size: 12]`); only the first token is the hit.
fn hit_of(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// True if `hit` ends in `.<ext>` for one of `extensions`. Exact suffix, never substring:
/// `00.php` matches `php`, `00.phpx` and `00.php.bak` do not.
pub fn has_excluded_extension(hit: &str, extensions: &[String]) -> bool {
    extensions
        .iter()
        .any(|ext| hit.strip_suffix(ext.as_str()).is_some_and(|rest| rest.ends_with('.')))
}

/// Child target for one output line, or `None` when the line is blank or a file hit.
///
/// Directory-looking hits get a trailing `/` so the next scan runs underneath them.
pub fn consider(line: &str, extensions: &[String]) -> Option<String> {
    let hit = hit_of(line.trim())?;
    if has_excluded_extension(hit, extensions) {
        return None;
    }
    if hit.ends_with('/') {
        Some(hit.to_string())
    } else {
        Some(format!("{hit}/"))
    }
}
