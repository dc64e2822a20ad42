//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from
//! the project's `.mabs` directory.

use crate::config::merger::merge_configs;
use crate::config::schema::MabsConfig;
use crate::error::{MabsError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the project's configuration.
pub const CONFIG_DIR: &str = ".mabs";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. Project config (`.mabs/config.yml`)
/// 2. Local overrides (`.mabs/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .mabs/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .mabs/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(&self.project_local).collect()
    }

    /// Check if any project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Find the project root by walking up from `start`.
///
/// Looks for a `.mabs` directory.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_DIR).is_dir())
        .map(Path::to_path_buf)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MabsError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            MabsError::Io(e)
        }
    })
}

/// Load a single config file and parse it into [`MabsConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<MabsConfig> {
    parse_config(&read(path)?, path)
}

/// Parse YAML content into [`MabsConfig`]. An empty document yields defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<MabsConfig> {
    if content.trim().is_empty() {
        return Ok(MabsConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| MabsError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as raw YAML Value (for merging).
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = read(path)?;
    if content.trim().is_empty() {
        return Ok(serde_yaml::Value::Mapping(Default::default()));
    }
    serde_yaml::from_str(&content).map_err(|e| MabsError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge the project config with its local overrides.
///
/// # Errors
///
/// Returns `ConfigNotFound` if no project config exists.
/// Returns `ConfigParseError` if any config file is invalid.
pub fn load_merged_config(project_root: &Path) -> Result<MabsConfig> {
    let paths = ConfigPaths::discover(project_root);
    let project_path = project_root.join(CONFIG_DIR).join("config.yml");

    if !paths.has_project_config() {
        return Err(MabsError::ConfigNotFound { path: project_path });
    }

    let configs = paths
        .all_existing()
        .into_iter()
        .map(|path| {
            tracing::debug!("Loading config from {}", path.display());
            load_config_value(path)
        })
        .collect::<Result<Vec<_>>>()?;

    serde_yaml::from_value(merge_configs(&configs)).map_err(|e| MabsError::ConfigParseError {
        path: project_path,
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
/// Otherwise, discovers and merges the project's config files.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<MabsConfig> {
    match config_override {
        Some(path) => load_config_file(path),
        None => load_merged_config(project_root),
    }
}
