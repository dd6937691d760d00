use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::map::MAP_PADDING;

/// Project-level configuration, read from `.ranchero/config.toml` in the
/// working directory. Every field has a default so the file is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub write: WriteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Padding around the map bounds, in map units.
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_true")]
    pub show_labels: bool,
    #[serde(default)]
    pub show_grid: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            show_labels: default_true(),
            show_grid: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteConfig {
    /// Simulated latency for ticket writes, in milliseconds. Stands in for
    /// a future network backend; 0 disables the pause.
    #[serde(default = "default_latency_ms")]
    pub simulated_latency_ms: u64,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: default_latency_ms(),
        }
    }
}

/// User-level configuration from `<config_dir>/ranchero/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Preferred output mode name (`pretty`, `text`, `json`).
    #[serde(default)]
    pub output: Option<String>,
    /// Operator identity used for `created_by` when no flag/env is given.
    #[serde(default)]
    pub operator: Option<String>,
}

fn default_padding() -> f64 {
    MAP_PADDING
}

fn default_true() -> bool {
    true
}

fn default_latency_ms() -> u64 {
    1000
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".ranchero/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("ranchero/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
