use anyhow::{Context, Result, bail};
use entropy_core::SessionMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{ensure_entropy_home, entropy_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Default session mode when `--mode` is not passed.
    pub mode: SessionMode,
    /// Default time budget in minutes; absent = unconstrained.
    pub time_available: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    pub timezone: String,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    /// Base URL of the hosted store, e.g. `https://<project>.supabase.co`.
    pub url: Option<String>,
    /// Env var holding the API key. The key itself never goes in the file.
    pub api_key_env: String,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            mode: SessionMode::DeepWork,
            time_available: None,
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            limit: 10,
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            url: None,
            api_key_env: "ENTROPY_STORE_KEY".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        entropy_core::time::parse_timezone(&self.display.timezone)
            .context("display.timezone")?;
        if self.engine.time_available == Some(0) {
            bail!("engine.time_available must be positive (omit it for no limit)");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(entropy_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).context("parse config.toml")?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = ensure_entropy_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
