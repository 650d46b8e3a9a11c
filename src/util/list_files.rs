// src/util/list_files.rs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ListError {
    #[error("Path '{0}' does not exist.")]
    NotFound(PathBuf),
    #[error("No files found in '{0}'.")]
    Empty(PathBuf),
    #[error("listing '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Names of the plain files directly inside `dir`, sorted. Names that are
/// not valid UTF-8 are skipped, since they could not be joined back onto
/// `dir` from their displayed form.
pub fn list_files(dir: &Path) -> Result<Vec<String>, ListError> {
    if !dir.exists() {
        return Err(ListError::NotFound(dir.to_path_buf()));
    }
    let io_err = |source| ListError::Io { path: dir.to_path_buf(), source };

    let mut out = Vec::new();
    for ent in fs::read_dir(dir).map_err(io_err)? {
        let ent = ent.map_err(io_err)?;
        let p = ent.path();
        if !p.is_file() {
            continue;
        }
        match ent.file_name().into_string() {
            Ok(name) => out.push(name),
            Err(raw) => warn!(dir = %dir.display(), name = ?raw, "skipping file with non UTF-8 name"),
        }
    }
    if out.is_empty() {
        return Err(ListError::Empty(dir.to_path_buf()));
    }
    out.sort();
    Ok(out)
}
