//! Output folder creation.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

const RULE: &str = "----------------------------------------------------------";

/// Outcome of [`ensure_folder`]; an existing folder is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderStatus {
    Created,
    AlreadyExists,
}

/// Ensure `<base>/<name>` exists as a directory, printing a status line either way.
///
/// Only the single folder is created; a missing `base` is an error.
pub fn ensure_folder(base: &Path, name: &str) -> Result<FolderStatus> {
    let path = base.join(name);
    let status = match fs::create_dir(&path) {
        Ok(()) => FolderStatus::Created,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {
            FolderStatus::AlreadyExists
        }
        Err(err) => {
            return Err(err).with_context(|| format!("creating folder {}", path.display()));
        }
    };

    println!("{RULE}");
    match status {
        FolderStatus::Created => println!("Created folder \"{name}\" in current directory."),
        FolderStatus::AlreadyExists => {
            println!("Folder \"{name}\" already exists in current directory.")
        }
    }
    println!("{RULE}");
    debug!(path = %path.display(), ?status, "output folder ready");
    Ok(status)
}

/// [`ensure_folder`] relative to the current working directory.
pub fn make_directory(name: &str) -> Result<FolderStatus> {
    let cwd: PathBuf = env::current_dir().context("resolving current directory")?;
    ensure_folder(&cwd, name)
}
