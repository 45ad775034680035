//! CRUD over the autoupload registry living on the config document.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;

pub fn list(config: &Config) -> Result<()> {
    if config.autoupload.is_empty() {
        println!("No directories are flagged for automatic indexing.");
        println!("Flag one with `repodex autoupload add <path>`.");
        return Ok(());
    }

    println!("Directories flagged for automatic indexing:");
    for path in config.autoupload_paths() {
        println!("  {}", path);
    }
    Ok(())
}

pub fn add(config: &mut Config, path: &Path) -> Result<()> {
    let path = super::absolute(path)?.display().to_string();

    if config.autoupload_add(path.clone()) {
        config.save()?;
        println!("Flagged {} for automatic indexing.", path);
    } else {
        println!("{} is already flagged for automatic indexing.", path);
    }
    Ok(())
}

pub fn remove(config: &mut Config, path: &Path) -> Result<()> {
    let path = super::absolute(path)?.display().to_string();

    if config.autoupload_remove(&path).is_some() {
        config.save()?;
        println!("Unflagged {}.", path);
    } else {
        println!("{} was not flagged for automatic indexing.", path);
    }
    Ok(())
}
