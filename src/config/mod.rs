//! Configuration loading, parsing, and validation for MABS.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use mabs::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let mabs_dir = temp.path().join(".mabs");
//! fs::create_dir_all(&mabs_dir).unwrap();
//! fs::write(
//!     mabs_dir.join("config.yml"),
//!     "repo: /srv/mabs/repo\nwiki:\n  server: https://wiki.example\n  sitename: Example\n",
//! )
//! .unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.api_url(), "https://wiki.example/api.php");
//! ```
//!
//! # Configuration File Locations
//!
//! MABS discovers and merges configuration in this order:
//! 1. Project config (`.mabs/config.yml`)
//! 2. Local overrides (`.mabs/config.local.yml`)

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

// Schema re-exports
pub use schema::{
    CredentialsConfig, ExportConfig, GitConfig, HttpConfig, ImportConfig, MabsConfig, Settings,
    WikiConfig,
};

// Loader re-exports
pub use loader::{
    find_project_root, load_config, load_config_file, load_config_value, load_merged_config,
    parse_config, ConfigPaths, CONFIG_DIR,
};

// Merger re-exports
pub use merger::{deep_merge, merge_configs};

// Validator re-exports
pub use validator::{validate, validate_config, ValidationError};
