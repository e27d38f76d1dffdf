// src/file.rs
//! Where the report lands on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::consts::{DEFAULT_FILE_STEM, REPORT_EXT};
use crate::core::sanitize::sanitize_address_filename;
use crate::error::{Error, Result};

/// `<out_dir>/<sanitized identity>.txt`
pub fn report_path(out_dir: &Path, identity: &str) -> PathBuf {
    let stem = sanitize_address_filename(identity, DEFAULT_FILE_STEM);
    out_dir.join(format!("{stem}.{REPORT_EXT}"))
}

/// Write `text` as UTF-8, creating `out_dir` if needed. Overwrites an earlier
/// report for the same address. Returns the path written.
pub fn write_report(out_dir: &Path, identity: &str, text: &str) -> Result<PathBuf> {
    ensure_directory(out_dir)?;
    let path = report_path(out_dir, identity);
    fs::write(&path, text).map_err(|source| Error::Io { path: path.clone(), source })?;
    Ok(path)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() { return Ok(()); }
    if dir.exists() && !dir.is_dir() {
        let source = std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory");
        return Err(Error::Io { path: dir.to_path_buf(), source });
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| Error::Io { path: dir.to_path_buf(), source })?;
    }
    Ok(())
}
