use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `$ENTROPY_HOME`, or `~/.entropy`.
pub fn entropy_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ENTROPY_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".entropy"))
}

pub fn ensure_entropy_home() -> Result<PathBuf> {
    let dir = entropy_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Row files are JSON unless they end in `.csv`.
pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}
