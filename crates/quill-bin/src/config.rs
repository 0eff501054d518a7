//! Configuration loading and parsing (`quill.toml`).
//!
//! Discovery prefers a `quill.toml` in the working directory, then the
//! platform config dir. Unknown fields are ignored and a parse error falls
//! back to defaults, so a stale config never blocks startup.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize, Clone)]
pub struct ColorConfig {
    #[serde(default = "ColorConfig::default_enabled")]
    pub enabled: bool,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
        }
    }
}

impl ColorConfig {
    const fn default_enabled() -> bool {
        true
    }
}

/// Fixed terminal dimensions; unset means ask the terminal on every use.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TerminalConfig {
    #[serde(default)]
    pub width: Option<u16>,
    #[serde(default)]
    pub height: Option<u16>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub color: ColorConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
}

/// Best-effort config path following platform conventions.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("quill.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("quill").join("quill.toml");
    }
    PathBuf::from("quill.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<Config>(&content) {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                warn!(target: "config", ?e, file = %path.display(), "config_parse_error_using_defaults");
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}
