//! Message catalogue.
//!
//! Every user-visible string is addressed by a key (`mabs-config-create`)
//! and may carry positional parameters substituted for `$1`, `$2`, ...
//! Handlers deal only in [`Message`] values; rendering to text happens at
//! the UI edge so tests can assert on keys.

use std::fmt;

/// A message key plus interpolation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Catalogue key.
    pub key: String,
    /// Positional parameters for `$1..$n`.
    pub params: Vec<String>,
}

impl Message {
    /// Create a message with no parameters.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter.
    pub fn param(mut self, value: impl Into<String>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Render the message as English text.
    ///
    /// Unknown keys render as `⧼key⧽` so missing catalogue entries stay
    /// visible instead of silently disappearing.
    pub fn text(&self) -> String {
        match lookup(&self.key) {
            Some(template) => interpolate(template, &self.params),
            None => format!("⧼{}⧽", self.key),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Replace `$1`..`$9` with the matching parameter.
fn interpolate(template: &str, params: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' {
            if let Some(d) = chars.peek().and_then(|n| n.to_digit(10)) {
                if d >= 1 {
                    chars.next();
                    match params.get(d as usize - 1) {
                        Some(p) => out.push_str(p),
                        None => {
                            out.push('$');
                            out.push_str(&d.to_string());
                        }
                    }
                    continue;
                }
            }
        }
        out.push(c);
    }

    out
}

fn lookup(key: &str) -> Option<&'static str> {
    CATALOGUE
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| *text)
}

const CATALOGUE: &[(&str, &str)] = &[
    // Task titles
    ("mabs-setup", "Repository setup"),
    ("mabs-import", "Import wiki content"),
    ("mabs-export", "Export to another repository"),
    // Sections
    ("mabs-config-dependency-section", "Software dependencies"),
    ("mabs-config-prepare-section", "Repository directory"),
    ("mabs-config-initialize-section", "Initialize repository"),
    ("mabs-config-complete-section", "Setup complete"),
    ("mabs-config-verify-section", "Verify previous steps"),
    ("mabs-config-setuser-section", "Service credentials"),
    ("mabs-config-setremote-section", "Wiki remote"),
    ("mabs-config-fetch-section", "Fetch wiki history"),
    ("mabs-config-push-section", "Push changes"),
    // Buttons
    ("mabs-config-try-again", "Try again"),
    ("mabs-config-create", "Create"),
    ("mabs-config-continue", "Continue"),
    ("mabs-config-set-user", "Set up credentials"),
    ("mabs-config-set-remote", "Add remote"),
    ("mabs-config-import", "Import"),
    ("mabs-config-push", "Push"),
    ("mabs-config-export-push", "Export"),
    // Setup
    (
        "mabs-dependency-gitlib",
        "The git command line client ($1) could not be run.",
    ),
    (
        "mabs-config-fix-problems",
        "Fix the problem described above and try again.",
    ),
    ("mabs-config-please-fix-exists", "The directory $1 does not exist."),
    (
        "mabs-config-please-fix-directory",
        "$1 exists but is not a directory.",
    ),
    (
        "mabs-config-please-fix-writable",
        "The directory $1 is not writable.",
    ),
    (
        "mabs-config-gitdir-not-writable",
        "The git directory $1 is not writable.",
    ),
    (
        "mabs-config-not-writable",
        "The git configuration file $2 is not writable.",
    ),
    (
        "mabs-config-not-exists",
        "No git repository exists at $1 yet. A bare repository will be created.",
    ),
    (
        "mabs-config-init-repo",
        "Creating the git repository failed: $1",
    ),
    (
        "mabs-config-complete",
        "The repository is ready. Continue to import the wiki's history.",
    ),
    // Import
    (
        "mabs-config-start-over",
        "The repository has not been set up yet. Start over from the setup wizard.",
    ),
    (
        "mabs-config-reset-password",
        "The credentials for $1 no longer work. Reset the password?",
    ),
    (
        "mabs-config-setup-user",
        "A service account will be created so that git can talk to the wiki.",
    ),
    ("mabs-login-failed", "Login failed for $1."),
    (
        "mabs-failure-saving-user",
        "The service credential could not be saved.",
    ),
    (
        "mabs-failure-updating-password",
        "The service credential's password could not be updated.",
    ),
    (
        "mabs-failure-takeover-needed",
        "Tick the box to reset the existing credential.",
    ),
    (
        "mabs-not-an-actual-destination",
        "The submitted form does not describe a valid destination.",
    ),
    (
        "mabs-config-credential-error",
        "Storing the credential in the git configuration failed: $1",
    ),
    ("mabs-config-remote", "Remote URL"),
    ("mabs-config-origin-branch", "Remote name"),
    (
        "mabs-config-cannot-reach-self",
        "The wiki could not reach its own API: $1",
    ),
    (
        "mabs-config-bad-response-status",
        "The wiki's API returned an error: $1",
    ),
    (
        "mabs-config-invalid-json-response",
        "The wiki's API did not return valid JSON: $1",
    ),
    (
        "mabs-config-sitename-mismatch",
        "The API belongs to \"$1\", not to this wiki (\"$2\").",
    ),
    (
        "mabs-config-add-remote-error",
        "Adding the git remote failed: $1",
    ),
    (
        "mabs-config-import-ready",
        "The repository is empty. Import the wiki's history now?",
    ),
    (
        "mabs-config-import-fetch-error",
        "Fetching from the wiki failed: $1",
    ),
    (
        "mabs-config-count-objects-error",
        "Inspecting the repository failed: $1",
    ),
    (
        "mabs-config-push-ready",
        "Local changes are waiting to be pushed to the wiki.",
    ),
    ("mabs-config-push-error", "Pushing to the wiki failed: $1"),
    (
        "mabs-config-push-rejected",
        "The wiki refused $1. Fetch and merge its newer revisions first.",
    ),
    (
        "mabs-config-remote-list-error",
        "Listing git remotes failed: $1",
    ),
    // Export
    (
        "mabs-config-import-not-done",
        "Nothing has been imported yet. Start over from the setup wizard.",
    ),
    ("mabs-config-export-remote-url", "Destination URL"),
    ("mabs-config-export-username", "Username"),
    ("mabs-config-export-password", "Password"),
    ("mabs-config-export-other-branch", "Remote name"),
    (
        "mabs-config-export-remote-needed",
        "A destination URL is required.",
    ),
    (
        "mabs-config-export-remote-invalid",
        "The destination URL $1 is not valid.",
    ),
    (
        "mabs-config-export-name-needed",
        "A remote name is required.",
    ),
    (
        "mabs-config-export-push-rejected",
        "The destination refused $1. Choose another destination or reconcile it first.",
    ),
    (
        "mabs-config-export-push-error",
        "Pushing to the destination failed: $1",
    ),
    (
        "mabs-export-complete",
        "The wiki's history has been exported.",
    ),
];
