//! Disk I/O helpers: load the preference document and write it back.
//!
//! Writes replace the whole document. The optional rename-over mode avoids a
//! half-written file if the process dies mid-write on most local file
//! systems; it is not a durability guarantee (no fsync, no locking).

use crate::error::{Error, Result};
use crate::serializer::Serializer;
use serde_json::{Map, Value};
use std::path::Path;

/// Outcome of reading the preference file.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// No file at the path yet. The normal first-run state.
    Missing,
    /// The file was read and parsed. An empty file reads as an empty mapping.
    Found(Map<String, Value>),
}

/// Reads and deserializes the file at `path`.
pub fn load<S: Serializer>(path: &Path, serializer: &S) -> Result<Loaded> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Loaded::Missing),
        Err(e) => return Err(Error::Io(format!("reading {}: {e}", path.display()))),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Loaded::Found(Map::new()));
    }
    serializer.deserialize(&bytes).map(Loaded::Found)
}

/// Write `bytes` to `path`, creating the parent directory when needed.
///
/// With `atomic` set the bytes go to `<path>.tmp` first and are renamed over
/// `path`.
pub fn write(path: &Path, bytes: &[u8], atomic: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::Io(format!("creating {}: {e}", parent.display())))?;
    }
    if !atomic {
        return std::fs::write(path, bytes)
            .map_err(|e| Error::Io(format!("writing {}: {e}", path.display())));
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, bytes)
        .map_err(|e| Error::Io(format!("writing {}: {e}", tmp.display())))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| Error::Io(format!("renaming onto {}: {e}", path.display())))?;
    Ok(())
}
