//! Shared test scaffolding: settings plus in-memory collaborators.

use crate::credentials::MemoryCredentialStore;
use crate::git::MockGit;
use crate::http::{siteinfo_url, MockHttp};
use crate::probe::MemoryProbe;

use super::context::{WizardContext, WizardSettings};

pub const REPO: &str = "/srv/mabs/repo";
pub const API: &str = "https://wiki.example/w/api.php";

pub struct Fixture {
    pub settings: WizardSettings,
    pub git: MockGit,
    pub http: MockHttp,
    pub credentials: MemoryCredentialStore,
    pub fs: MemoryProbe,
}

impl Fixture {
    /// A wiki at `https://wiki.example/w` with nothing set up yet.
    pub fn new() -> Self {
        Self {
            settings: WizardSettings::new(REPO, "https://wiki.example", "/w", "Example Wiki"),
            git: MockGit::new(),
            http: MockHttp::new(),
            credentials: MemoryCredentialStore::new(),
            fs: MemoryProbe::new(),
        }
    }

    /// Repository directory and config file exist and are writable.
    pub fn with_repo(self) -> Self {
        self.fs.add_dir(REPO, true);
        self.fs.add_file(self.settings.config_file(), true);
        self
    }

    /// The wiki answers its API and siteinfo queries as `sitename`.
    pub fn serving(mut self, sitename: &str) -> Self {
        let body = format!(r#"{{"query":{{"general":{{"sitename":"{sitename}"}}}}}}"#);
        self.http.respond(API, 200, "");
        self.http.respond(&siteinfo_url(API), 200, &body);
        self
    }

    pub fn ctx(&self) -> WizardContext<'_> {
        WizardContext::new(
            &self.settings,
            &self.git,
            &self.http,
            &self.credentials,
            &self.fs,
        )
    }
}
