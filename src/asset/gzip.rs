//! Gzip siblings for persisted artifacts.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use flate2::{Compression, GzBuilder};

use super::error::{FinalizeError, Result};

/// Path of the `.gz` sibling: `app.js.map` → `app.js.map.gz`.
pub fn sibling_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".gz");
    PathBuf::from(os)
}

/// Compress `path` into its `.gz` sibling and return the sibling path.
///
/// The gzip header carries the source file's modification time and its
/// path as the original file name.
pub fn write_sibling(path: &Path) -> Result<PathBuf> {
    let target = sibling_path(path);

    let content = fs::read(path).map_err(|e| FinalizeError::io(path, e))?;
    let mtime = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| FinalizeError::io(path, e))?
        .duration_since(UNIX_EPOCH)
        .map(|d| u32::try_from(d.as_secs()).unwrap_or(u32::MAX))
        .unwrap_or(0);

    let file = File::create(&target).map_err(|e| FinalizeError::io(&target, e))?;
    let mut encoder = GzBuilder::new()
        .filename(path.to_string_lossy().as_bytes())
        .mtime(mtime)
        .write(BufWriter::new(file), Compression::best());
    encoder
        .write_all(&content)
        .map_err(|e| FinalizeError::io(&target, e))?;
    encoder
        .finish()
        .and_then(|mut w| w.flush())
        .map_err(|e| FinalizeError::io(&target, e))?;

    Ok(target)
}
