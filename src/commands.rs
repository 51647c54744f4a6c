use std::path::Path;

use crate::error::CheckError;

pub mod correlate_resources;
pub mod find_resources;
pub mod list_enterprise_beans;

/// Argument validation shared by the commands: every given path must be an
/// existing directory, checked before any work starts.
pub fn ensure_directory(path: &Path) -> Result<(), CheckError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CheckError::InvalidArgument(path.to_path_buf()))
    }
}
