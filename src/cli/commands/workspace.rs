//! Loading the configuration and building the production collaborators.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{load_config, validate, MabsConfig};
use crate::credentials::FileCredentialStore;
use crate::error::{MabsError, Result};
use crate::git::GitCli;
use crate::http::ReqwestClient;
use crate::probe::LocalProbe;
use crate::tasks::builtin_engine;
use crate::ui::UserInterface;
use crate::wizard::{WizardContext, WizardEngine, WizardSettings};

use super::dispatcher::CommandResult;

/// Exit code when no configuration exists.
pub const EXIT_CONFIG_MISSING: i32 = 2;

/// Global options every command needs to find its configuration.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceOptions {
    /// Project root holding `.mabs/`.
    pub project_root: PathBuf,
    /// Explicit config file.
    pub config: Option<PathBuf>,
    /// Repository path override.
    pub repo: Option<PathBuf>,
}

impl WorkspaceOptions {
    /// Options for `project_root` with no overrides.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Default::default()
        }
    }

    /// Load and validate the configuration, applying overrides.
    pub fn load_config(&self) -> Result<MabsConfig> {
        let mut config = load_config(&self.project_root, self.config.as_deref())?;
        if let Some(repo) = &self.repo {
            config.repo = repo.clone();
        }
        config.repo = self.resolve(&config.repo);
        validate(&config)?;
        Ok(config)
    }

    /// Like [`load_config`](Self::load_config), but reports a missing
    /// configuration to the user and returns the exit code instead.
    pub fn load_or_report(
        &self,
        ui: &mut dyn UserInterface,
    ) -> Result<std::result::Result<Workspace, CommandResult>> {
        match self.load_config() {
            Ok(config) => Workspace::new(self, config).map(Ok),
            Err(MabsError::ConfigNotFound { path }) => {
                ui.error(&format!("No configuration found at {}.", path.display()));
                ui.show_hint("Create .mabs/config.yml with `repo` and `wiki` settings.");
                Ok(Err(CommandResult::failure(EXIT_CONFIG_MISSING)))
            }
            Err(e) => Err(e),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() && !path.as_os_str().is_empty() {
            self.project_root.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// Resolved settings plus the real git, HTTP, credential and filesystem
/// collaborators.
pub struct Workspace {
    /// The loaded configuration.
    pub config: MabsConfig,
    /// Settings derived from the configuration.
    pub settings: WizardSettings,
    git: GitCli,
    http: ReqwestClient,
    credentials: FileCredentialStore,
    fs: LocalProbe,
}

impl Workspace {
    /// Build the collaborators for `config`.
    pub fn new(options: &WorkspaceOptions, config: MabsConfig) -> Result<Self> {
        let settings = WizardSettings::from(&config);
        let git = GitCli::new(&config.git.binary, &config.repo);
        let http = ReqwestClient::with_timeout(Duration::from_secs(config.http.timeout_secs))?;
        let credentials = FileCredentialStore::new(options.resolve(&config.credentials.store));
        tracing::debug!(
            "Repository {}, wiki API {}, credentials {}",
            config.repo.display(),
            settings.api_url(),
            credentials.path().display()
        );

        Ok(Self {
            config,
            settings,
            git,
            http,
            credentials,
            fs: LocalProbe,
        })
    }

    /// Context handed to the step handlers.
    pub fn context(&self) -> WizardContext<'_> {
        WizardContext::new(
            &self.settings,
            &self.git,
            &self.http,
            &self.credentials,
            &self.fs,
        )
    }

    /// Engine with the built-in wizards for these settings.
    pub fn engine(&self) -> Result<WizardEngine> {
        builtin_engine(&self.settings)
    }
}
