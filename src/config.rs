use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{tlog_debug, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Override for the task tracker binary (defaults to `task`).
    pub task_bin: Option<String>,
    /// Names of actions to leave out of the pipeline.
    #[serde(default)]
    pub disabled_actions: Vec<String>,
}

impl Config {
    pub fn tend_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".tend"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::tend_dir()?.join("tend.toml"))
    }

    pub fn effective_task_bin(&self) -> &str {
        self.task_bin.as_deref().unwrap_or("task")
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        tlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            tlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        tlog_debug!(
            "Config loaded: task_bin={:?}, disabled_actions={:?}",
            config.task_bin,
            config.disabled_actions
        );
        Ok(config)
    }
}
