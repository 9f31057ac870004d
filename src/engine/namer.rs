//! Target naming: raw target → filesystem-safe identifier.

/// Substitute for `/`, which cannot appear in a file name.
pub const SEPARATOR_SUBSTITUTE: char = '_';

/// Identifier for `target`, used as dedup key and output file name.
///
/// `http://10.10.10.112/images/` → `http:__10.10.10.112_images_`. Idempotent, and the result
/// never contains `/`.
pub fn normalize(target: &str) -> String {
    target.replace('/', &SEPARATOR_SUBSTITUTE.to_string())
}
