//! Per-request state threaded through every step handler.

use std::path::{Path, PathBuf};

use crate::config::MabsConfig;
use crate::credentials::CredentialStore;
use crate::git::GitClient;
use crate::http::HttpClient;
use crate::probe::PathProbe;

/// URL scheme prefix of the git remote helper that talks to a wiki.
pub const REMOTE_SCHEME: &str = "mediawiki::";

/// Resolved values the handlers need, independent of where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSettings {
    /// Path of the bare repository.
    pub repo: PathBuf,
    /// Wiki server, e.g. `https://wiki.example`.
    pub server: String,
    /// Script path under the server, e.g. `/w`.
    pub script_path: String,
    /// Site name the wiki's API must report.
    pub sitename: String,
    /// Wiki principal that owns the service credential.
    pub principal: String,
    /// Application id of the service credential.
    pub app_id: String,
    /// Grants given to a newly created credential.
    pub grants: Vec<String>,
    /// The git executable.
    pub git_binary: String,
    /// Whether the import wizard ends with a push back to the wiki.
    pub import_push: bool,
    /// Name of the remote the export wizard pushes to.
    pub export_remote: String,
}

impl WizardSettings {
    /// Settings with the stock credential and remote defaults.
    pub fn new(
        repo: impl Into<PathBuf>,
        server: impl Into<String>,
        script_path: impl Into<String>,
        sitename: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            server: server.into(),
            script_path: script_path.into(),
            sitename: sitename.into(),
            principal: "Admin".to_string(),
            app_id: "mabs".to_string(),
            grants: vec!["mabs".to_string()],
            git_binary: "git".to_string(),
            import_push: false,
            export_remote: "other".to_string(),
        }
    }

    /// The wiki's `api.php` endpoint.
    pub fn api_url(&self) -> String {
        format!(
            "{}{}/api.php",
            self.server.trim_end_matches('/'),
            self.script_path.trim_end_matches('/')
        )
    }

    /// URL of the remote that points back at the wiki.
    pub fn remote_url(&self) -> String {
        format!("{REMOTE_SCHEME}{}", self.api_url())
    }

    /// The repository's git `config` file.
    pub fn config_file(&self) -> PathBuf {
        self.repo.join("config")
    }

    /// Git config key holding the cached credential username.
    pub fn username_key(&self) -> String {
        format!("credential.{}.username", self.api_url())
    }

    /// Git config key holding the cached credential password.
    pub fn password_key(&self) -> String {
        format!("credential.{}.password", self.api_url())
    }
}

impl From<&MabsConfig> for WizardSettings {
    fn from(config: &MabsConfig) -> Self {
        Self {
            repo: config.repo.clone(),
            server: config.wiki.server.clone(),
            script_path: config.wiki.script_path.clone(),
            sitename: config.wiki.sitename.clone(),
            principal: config.principal.clone(),
            app_id: config.app_id.clone(),
            grants: config.grants.clone(),
            git_binary: config.git.binary.clone(),
            import_push: config.import.push,
            export_remote: config.export.remote.clone(),
        }
    }
}

/// Settings plus the collaborators, borrowed for one request.
#[derive(Clone, Copy)]
pub struct WizardContext<'a> {
    /// Resolved settings.
    pub settings: &'a WizardSettings,
    /// Git plumbing for the repository.
    pub git: &'a dyn GitClient,
    /// HTTP access to the wiki.
    pub http: &'a dyn HttpClient,
    /// Service credential storage.
    pub credentials: &'a dyn CredentialStore,
    /// Filesystem checks.
    pub fs: &'a dyn PathProbe,
}

impl<'a> WizardContext<'a> {
    /// Bundle settings and collaborators.
    pub fn new(
        settings: &'a WizardSettings,
        git: &'a dyn GitClient,
        http: &'a dyn HttpClient,
        credentials: &'a dyn CredentialStore,
        fs: &'a dyn PathProbe,
    ) -> Self {
        Self {
            settings,
            git,
            http,
            credentials,
            fs,
        }
    }

    /// Path of the bare repository.
    pub fn repo(&self) -> &Path {
        &self.settings.repo
    }
}
