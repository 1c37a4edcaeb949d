use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$PROJECTHUB_HOME`, else `~/.projecthub`.
pub fn projecthub_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PROJECTHUB_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".projecthub"))
}

pub fn ensure_projecthub_home() -> Result<PathBuf> {
    let dir = projecthub_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Where the file-backed store keeps `<project>.json` when none is configured.
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(projecthub_home()?.join("projects"))
}
