use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub mod helpers;

pub use helpers::EnvSettings;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings read from the TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub partial_replies: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Load the explicitly requested file, or the default one if it exists.
    /// A missing explicit file is an error; a missing default file is not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// ~/.pdfchat/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    pdfchat_logging::get_pdfchat_dir()
        .ok()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
}
