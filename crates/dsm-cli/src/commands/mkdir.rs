use anyhow::Result;
use dsm_io::helpers::{make_directory, FolderStatus};
use tracing::debug;

pub fn handle(name: &str) -> Result<()> {
    let status = make_directory(name)?;
    if status == FolderStatus::AlreadyExists {
        debug!(name, "folder left untouched");
    }
    Ok(())
}
