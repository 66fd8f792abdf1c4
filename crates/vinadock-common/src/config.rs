//! Configuration loading for vinadock.
//! Reads vinadock.toml from the current directory or the path in the VINADOCK_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DockError, Result};

pub const CONFIG_ENV: &str = "VINADOCK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "vinadock.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsSection,
    #[serde(default)]
    pub docking: DockingSection,
}

/// External executables. `engine = None` means the platform default (`Linux-vina`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsSection {
    #[serde(default = "default_converter")]
    pub converter: String,
    #[serde(default)]
    pub engine: Option<String>,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            converter: default_converter(),
            engine: None,
        }
    }
}

fn default_converter() -> String { "obabel".to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockingSection {
    #[serde(default = "default_num_poses")]
    pub num_poses: u32,
    /// Angstrom margin added when the search box is derived from the receptor.
    #[serde(default = "default_buffer")]
    pub buffer: f64,
    #[serde(default)]
    pub exhaustiveness: Option<u32>,
    #[serde(default)]
    pub keep_workdir: bool,
    #[serde(default)]
    pub tool_timeout_secs: Option<u64>,
    /// Parent of the per-call scratch directories; the system temp dir when unset.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

impl Default for DockingSection {
    fn default() -> Self {
        Self {
            num_poses: default_num_poses(),
            buffer: default_buffer(),
            exhaustiveness: None,
            keep_workdir: false,
            tool_timeout_secs: None,
            scratch_dir: None,
        }
    }
}

fn default_num_poses() -> u32 { 20 }
fn default_buffer()    -> f64 { 10.0 }

impl Config {
    /// Load from `VINADOCK_CONFIG` or `./vinadock.toml`.
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        if !Path::new(&path).exists() {
            tracing::warn!("Config file not found: {}, using defaults", path);
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&content)?;
        tracing::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| DockError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.docking.num_poses == 0 {
            return Err(DockError::Config("docking.num_poses must be at least 1".to_string()));
        }
        if !self.docking.buffer.is_finite() || self.docking.buffer < 0.0 {
            return Err(DockError::Config(format!(
                "docking.buffer must be a non-negative number, got {}",
                self.docking.buffer
            )));
        }
        if self.tools.converter.trim().is_empty() {
            return Err(DockError::Config("tools.converter must not be empty".to_string()));
        }
        Ok(())
    }
}
