//! Incremental reader for scanner output files: hands out only lines not seen before.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Byte offset of the first unread byte, per file.
#[derive(Debug, Default)]
pub struct OutputTail {
    offsets: HashMap<PathBuf, u64>,
}

impl OutputTail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete lines appended to `path` since the last call. A trailing line without its
    /// newline is left for the next call. Missing file → no lines.
    pub fn read_new_lines(&mut self, path: &Path) -> io::Result<Vec<String>> {
        self.read_from_offset(path, false)
    }

    /// Everything still unread in `path`, including a last line with no newline. Only for
    /// files whose writer has closed them.
    pub fn read_remaining(&mut self, path: &Path) -> io::Result<Vec<String>> {
        self.read_from_offset(path, true)
    }

    fn read_from_offset(&mut self, path: &Path, include_partial: bool) -> io::Result<Vec<String>> {
        let mut file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let len = file.metadata()?.len();
        let offset = self.offsets.entry(path.to_path_buf()).or_insert(0);
        if len < *offset {
            // truncated or replaced
            *offset = 0;
        }
        if len == *offset {
            return Ok(Vec::new());
        }
        file.seek(SeekFrom::Start(*offset))?;
        let mut buf = Vec::with_capacity((len - *offset) as usize);
        file.read_to_end(&mut buf)?;

        let consumed = if include_partial {
            buf.len()
        } else {
            match buf.iter().rposition(|&b| b == b'\n') {
                Some(last_newline) => last_newline + 1,
                None => return Ok(Vec::new()),
            }
        };
        let taken = &buf[..consumed];
        *offset += taken.len() as u64;

        Ok(String::from_utf8_lossy(taken)
            .lines()
            .map(str::to_string)
            .collect())
    }
}
