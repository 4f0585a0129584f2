use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::manifest::DEFAULT_MANIFEST;

const SKILLKIT_DIR: &str = ".skillkit";

/// User defaults from `~/.skillkit/config.toml`. Command-line flags win.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub manifest: PathBuf,
    pub force: bool,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            force: false,
            log_level: None,
        }
    }
}

pub fn get_skillkit_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SKILLKIT_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_skillkit_dir().join("config.toml")
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

impl Config {
    pub fn load_or_default() -> Result<Self> {
        if config_exists() {
            load_config(&get_config_path())
        } else {
            Ok(Config::default())
        }
    }
}

pub fn load_config(config_path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))
}
