//! Command implementations, one module per subcommand.

pub mod autoupload;
pub mod clone;
pub mod index;
pub mod progress;
pub mod query;
pub mod search;
pub mod unindex;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Absolutize a user-supplied repository path against the current
/// directory. Git and the autoupload registry both want absolute paths.
pub(crate) fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("Failed to determine the current directory")?
            .join(path))
    }
}
