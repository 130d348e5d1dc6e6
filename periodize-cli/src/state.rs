use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$PERIODIZE_HOME`, or `~/.periodize`.
pub fn periodize_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PERIODIZE_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".periodize"))
}

pub fn ensure_periodize_home() -> Result<PathBuf> {
    let dir = periodize_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
