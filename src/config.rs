use anyhow::{Context, Result};
use appliance::{ApplianceConfig, ImageStreamerConfig};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("rackstate"))
}

/// Top-level configuration: the management appliance, plus an optional
/// image-streamer appliance for golden images.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub appliance: ApplianceConfig,
    #[serde(default)]
    pub image_streamer: Option<ImageStreamerConfig>,
}

impl Config {
    /// Load the config from an explicit path (tilde-expanded) or the
    /// default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(explicit) => {
                let expanded = shellexpand::tilde(&explicit.to_string_lossy().into_owned()).into_owned();
                PathBuf::from(expanded)
            }
            None => config_dir()?.join("config.toml"),
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
