//! Import wizard: give git a way to log in to the wiki, point `origin`
//! at the wiki and fetch its history.

use crate::credentials::{CredentialError, SaveMode};
use crate::git::{parse_remotes, PushStatus};
use crate::http::{parse_sitename, siteinfo_url};
use crate::messages::Message;
use crate::wizard::{
    Field, FormDescriptor, FormValues, Outcome, Reason, StepForm, StepHandler, StepState,
    WizardContext, REMOTE_SCHEME,
};

use super::{info_form, object_count, start_over};

/// Remote that points at the wiki.
pub const ORIGIN: &str = "origin";

/// Sends every local branch to the wiki branch of the same name.
pub const IMPORT_PUSH_REFSPEC: &str = "refs/heads/*:refs/heads/*";

/// The setup wizard must have produced a repository.
pub struct VerifyRepoStep;

impl StepHandler for VerifyRepoStep {
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState {
        let repo = ctx.repo();
        if ctx.fs.exists(repo)
            && ctx.fs.is_dir(repo)
            && ctx.fs.exists(&ctx.settings.config_file())
        {
            return StepState::Satisfied;
        }

        StepState::NeedsInput(info_form(
            "verify",
            Message::new("mabs-config-start-over"),
            "mabs-config-try-again",
        ))
    }

    fn submit(&self, _ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
        start_over()
    }
}

/// Username and password cached in the repository's git config.
fn cached_login(ctx: &WizardContext<'_>) -> (String, String) {
    let read = |key: String| match ctx.git.config_get(&key) {
        Ok(value) => value.map(|v| v.trim().to_string()).unwrap_or_default(),
        Err(e) => {
            tracing::debug!("Cannot read {}: {}", key, e);
            String::new()
        }
    };
    (
        read(ctx.settings.username_key()),
        read(ctx.settings.password_key()),
    )
}

/// A service credential must exist and the copy in git config must work.
pub struct SetUserStep;

impl SetUserStep {
    fn take_over_form(ctx: &WizardContext<'_>, user: &str) -> StepForm {
        StepForm::new(
            FormDescriptor::for_step("setuser")
                .field(
                    "takeOverUser",
                    Field::checkbox(
                        Message::new("mabs-config-reset-password").param(user),
                        false,
                    ),
                )
                .field("user", Field::hidden(&ctx.settings.app_id)),
            Message::new("mabs-config-set-user"),
        )
    }

    fn from_scratch_form(ctx: &WizardContext<'_>) -> StepForm {
        StepForm::new(
            FormDescriptor::for_step("setuser")
                .field("info", Field::info(Message::new("mabs-config-setup-user")))
                .field("fromScratch", Field::hidden(&ctx.settings.app_id)),
            Message::new("mabs-config-set-user"),
        )
    }

    /// Store a fresh password for `app_id`, then cache it in git config.
    fn issue(ctx: &WizardContext<'_>, app_id: &str, takeover: bool) -> Outcome {
        let settings = ctx.settings;
        let store = ctx.credentials;

        let existing = if takeover {
            match store.find(&settings.principal, app_id) {
                Ok(found) => found,
                Err(e) => return credential_failure(takeover, &e),
            }
        } else {
            None
        };
        let (credential, mode) = match existing {
            Some(credential) => (credential, SaveMode::Update),
            None => (
                store.create_unsaved(&settings.principal, app_id, &settings.grants),
                SaveMode::Insert,
            ),
        };

        let password = store.generate_password();
        if let Err(e) = store.save(&credential, mode, &store.hash(&password)) {
            return credential_failure(takeover, &e);
        }

        let username = credential.username();
        tracing::info!("Saved service credential {}", username);

        let cached = ctx
            .git
            .config_set(&settings.username_key(), &username)
            .and_then(|()| ctx.git.config_set(&settings.password_key(), &password));
        match cached {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::Fatal(
                Message::new("mabs-config-credential-error").param(e.to_string()),
            ),
        }
    }
}

fn credential_failure(takeover: bool, error: &CredentialError) -> Outcome {
    tracing::warn!("{}", error);
    Outcome::retry(if takeover {
        "mabs-failure-updating-password"
    } else {
        "mabs-failure-saving-user"
    })
}

impl StepHandler for SetUserStep {
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState {
        let (user, pass) = cached_login(ctx);

        if !user.is_empty() && !pass.is_empty() {
            match ctx.credentials.login(&user, &pass) {
                Ok(()) => return StepState::Satisfied,
                Err(e) => tracing::info!("{}", e),
            }
        }

        if user.is_empty() {
            StepState::NeedsInput(Self::from_scratch_form(ctx))
        } else {
            StepState::NeedsInput(Self::take_over_form(ctx, &user))
        }
    }

    fn submit(&self, ctx: &WizardContext<'_>, values: &FormValues) -> Outcome {
        if let Some(app_id) = values.text("fromScratch") {
            Self::issue(ctx, app_id, false)
        } else if values.contains("takeOverUser") {
            if !values.flag("takeOverUser") {
                return Outcome::retry("mabs-failure-takeover-needed");
            }
            let app_id = values.text("user").unwrap_or(ctx.settings.app_id.as_str());
            Self::issue(ctx, app_id, true)
        } else {
            Outcome::fatal("mabs-not-an-actual-destination")
        }
    }
}

/// `origin` must point at this wiki through the remote helper.
pub struct SetRemoteStep;

impl SetRemoteStep {
    /// The URL must answer, and its siteinfo must name this wiki.
    fn verify_api(ctx: &WizardContext<'_>, api: &str) -> Result<(), Reason> {
        let response = ctx
            .http
            .get(api)
            .map_err(|e| e.to_string())
            .and_then(|r| if r.ok { Ok(r) } else { Err(r.message) })
            .map_err(|detail| Message::new("mabs-config-cannot-reach-self").param(detail))?;
        tracing::debug!("{} answered {}", api, response.status);

        let response = ctx
            .http
            .get(&siteinfo_url(api))
            .map_err(|e| e.to_string())
            .and_then(|r| if r.ok { Ok(r) } else { Err(r.message) })
            .map_err(|detail| Message::new("mabs-config-bad-response-status").param(detail))?;

        let sitename = parse_sitename(&response.body).map_err(|e| {
            Message::new("mabs-config-invalid-json-response").param(e.to_string())
        })?;

        let expected = &ctx.settings.sitename;
        if sitename.as_deref() != Some(expected.as_str()) {
            return Err(Message::new("mabs-config-sitename-mismatch")
                .param(sitename.unwrap_or_default())
                .param(expected));
        }
        Ok(())
    }
}

impl StepHandler for SetRemoteStep {
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState {
        let url = ctx.settings.remote_url();
        let remotes = match ctx.git.remote(&["-v"]) {
            Ok(output) => parse_remotes(&output),
            Err(e) => {
                return StepState::Fatal(
                    Message::new("mabs-config-remote-list-error").param(e.to_string()),
                )
            }
        };

        if remotes.get(ORIGIN) == Some(&url) {
            return StepState::Satisfied;
        }

        StepState::NeedsInput(StepForm::new(
            FormDescriptor::for_step("setremote")
                .field(
                    "remote",
                    Field::url(Message::new("mabs-config-remote"))
                        .with_default(url)
                        .read_only(),
                )
                .field(
                    "name",
                    Field::text(Message::new("mabs-config-origin-branch"))
                        .with_default(ORIGIN)
                        .read_only(),
                ),
            Message::new("mabs-config-set-remote"),
        ))
    }

    fn submit(&self, ctx: &WizardContext<'_>, values: &FormValues) -> Outcome {
        let remote = values.text("remote").unwrap_or_default();
        let Some(api) = remote.strip_prefix(REMOTE_SCHEME) else {
            return Outcome::fatal("mabs-not-an-actual-destination");
        };

        if let Err(reason) = Self::verify_api(ctx, api) {
            return Outcome::Retry(reason);
        }

        let name = values.text("name").unwrap_or(ORIGIN);
        let exists = ctx
            .git
            .remote(&["-v"])
            .map(|output| parse_remotes(&output).contains_key(name))
            .unwrap_or(false);
        let result = if exists {
            ctx.git.remote(&["set-url", name, remote])
        } else {
            ctx.git.remote(&["add", name, remote])
        };

        match result {
            Ok(_) => {
                tracing::info!("Remote {} now points at {}", name, remote);
                Outcome::Success
            }
            Err(e) => Outcome::Fatal(
                Message::new("mabs-config-add-remote-error").param(e.to_string()),
            ),
        }
    }
}

/// The repository must hold the wiki's history.
pub struct FetchStep;

impl StepHandler for FetchStep {
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState {
        match object_count(ctx) {
            Ok(0) => StepState::NeedsInput(info_form(
                "fetch",
                Message::new("mabs-config-import-ready"),
                "mabs-config-import",
            )),
            Ok(_) => StepState::Satisfied,
            Err(reason) => StepState::Fatal(reason),
        }
    }

    fn submit(&self, ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
        match ctx.git.fetch(ORIGIN) {
            Ok(_) => {
                tracing::info!("Fetched wiki history into {}", ctx.repo().display());
                Outcome::Success
            }
            Err(e) => {
                Outcome::Fatal(Message::new("mabs-config-import-fetch-error").param(e.to_string()))
            }
        }
    }
}

/// Local commits must have been pushed back to the wiki.
pub struct ImportPushStep;

fn push_error(e: impl ToString) -> Reason {
    Message::new("mabs-config-push-error").param(e.to_string())
}

impl StepHandler for ImportPushStep {
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState {
        match ctx.git.push_status(ORIGIN, Some(IMPORT_PUSH_REFSPEC)) {
            Ok(PushStatus::Pending) => StepState::NeedsInput(info_form(
                "push",
                Message::new("mabs-config-push-ready"),
                "mabs-config-push",
            )),
            Ok(PushStatus::UpToDate) => StepState::Satisfied,
            Ok(PushStatus::Rejected(summary)) => {
                StepState::Fatal(Message::new("mabs-config-push-rejected").param(summary))
            }
            Err(e) => StepState::Fatal(push_error(e)),
        }
    }

    fn submit(&self, ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
        match ctx.git.push(ORIGIN, Some(IMPORT_PUSH_REFSPEC)) {
            Ok(_) => Outcome::Success,
            Err(e) => Outcome::Fatal(push_error(e)),
        }
    }
}
