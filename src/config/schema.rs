//! Configuration schema definitions for MABS.
//!
//! These structs map to `.mabs/config.yml`. Every section has defaults so
//! a minimal file only needs the repository path and the wiki.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `.mabs/config.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MabsConfig {
    /// Path of the bare repository the wizards manage.
    pub repo: PathBuf,

    /// The wiki the repository mirrors.
    pub wiki: WikiConfig,

    /// Wiki principal that owns the service credential.
    pub principal: String,

    /// Application id of the service credential.
    pub app_id: String,

    /// Grants given to a newly created service credential.
    pub grants: Vec<String>,

    /// Git settings
    pub git: GitConfig,

    /// HTTP settings
    pub http: HttpConfig,

    /// Credential store settings
    pub credentials: CredentialsConfig,

    /// Import wizard settings
    pub import: ImportConfig,

    /// Export wizard settings
    pub export: ExportConfig,

    /// Driver settings
    pub settings: Settings,
}

impl Default for MabsConfig {
    fn default() -> Self {
        Self {
            repo: PathBuf::new(),
            wiki: WikiConfig::default(),
            principal: "Admin".to_string(),
            app_id: "mabs".to_string(),
            grants: vec!["mabs".to_string()],
            git: GitConfig::default(),
            http: HttpConfig::default(),
            credentials: CredentialsConfig::default(),
            import: ImportConfig::default(),
            export: ExportConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl MabsConfig {
    /// The wiki's `api.php` endpoint.
    pub fn api_url(&self) -> String {
        format!(
            "{}{}/api.php",
            self.wiki.server.trim_end_matches('/'),
            self.wiki.script_path.trim_end_matches('/')
        )
    }
}

/// Where the wiki lives and what it calls itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Server URL, e.g. `https://wiki.example`.
    pub server: String,

    /// Script path under the server, e.g. `/w`.
    pub script_path: String,

    /// Site name the API must report.
    pub sitename: String,
}

/// Git settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// The git executable.
    pub binary: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: "git".to_string(),
        }
    }
}

/// HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Credential store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Credential file, relative to the project root unless absolute.
    pub store: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            store: PathBuf::from(".mabs").join("credentials.yml"),
        }
    }
}

/// Import wizard settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// End the import by pushing local commits back to the wiki.
    pub push: bool,
}

/// Export wizard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name of the remote the export pushes to.
    pub remote: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            remote: "other".to_string(),
        }
    }
}

/// Driver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cap on requests in one `mabs run`.
    pub max_turns: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self { max_turns: 50 }
    }
}
