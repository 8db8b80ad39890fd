//! File system operations
//!
//! Writes land in a sibling temporary file and are renamed over the target,
//! so readers never observe a partially written file.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Temporary sibling used while a write is in flight
pub fn temp_path_for(target: &Path) -> PathBuf {
    target.with_extension(format!(
        "{}.tmp",
        target
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    ))
}

/// Replace `target` with `bytes`
pub fn write_atomically(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let temp = temp_path_for(target);
    let result = write_temp(&temp, bytes).and_then(|_| fs::rename(&temp, target));
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn write_temp(temp: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(temp)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_all()
}

/// Which side of a streamed copy failed
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("reading source: {0}")]
    Source(io::Error),

    #[error("writing target: {0}")]
    Target(io::Error),
}

/// Stream `source` into `target` in `buffer_size` chunks, returning the byte count
pub fn copy_atomically(
    source: &mut dyn Read,
    target: &Path,
    buffer_size: usize,
) -> Result<u64, CopyError> {
    let temp = temp_path_for(target);
    let result = copy_temp(source, &temp, buffer_size).and_then(|n| {
        fs::rename(&temp, target)
            .map(|_| n)
            .map_err(CopyError::Target)
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn copy_temp(source: &mut dyn Read, temp: &Path, buffer_size: usize) -> Result<u64, CopyError> {
    let mut file = File::create(temp).map_err(CopyError::Target)?;
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut total = 0u64;

    loop {
        let n = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Source(e)),
        };
        file.write_all(&buffer[..n]).map_err(CopyError::Target)?;
        total += n as u64;
    }

    file.flush().map_err(CopyError::Target)?;
    file.sync_all().map_err(CopyError::Target)?;
    Ok(total)
}
