//! Page archive module
//!
//! Fetched page bodies are written as flat files under the configured HTML
//! directory. First visits get a random name that is retried until it does
//! not collide with an existing file; re-visits overwrite the record's
//! existing file so `file_path` stays stable across refreshes.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Length of generated archive file names
const FILE_NAME_LEN: usize = 12;

/// Creates the archive directory if it does not exist
pub fn ensure_archive_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Writes a page body to the archive
///
/// With `existing = Some(path)` the body overwrites that file (a re-visit of
/// an already-archived record). Otherwise a fresh random name is generated,
/// retried until it names a path that did not exist before the call.
///
/// # Returns
///
/// The path the body was written to.
pub fn write_page(dir: &Path, body: &str, existing: Option<&Path>) -> io::Result<PathBuf> {
    if let Some(path) = existing {
        fs::write(path, body)?;
        return Ok(path.to_path_buf());
    }

    loop {
        let name: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(FILE_NAME_LEN)
            .map(char::from)
            .collect();
        let path = dir.join(name);
        if !path.exists() {
            fs::write(&path, body)?;
            return Ok(path);
        }
    }
}
