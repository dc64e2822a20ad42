//! Export wizard: push the imported history to another git repository.

use crate::git::{parse_remotes, PushStatus};
use crate::messages::Message;
use crate::wizard::{
    Field, FormDescriptor, FormValues, Outcome, Reason, StepForm, StepHandler, StepState,
    WizardContext,
};

use super::{info_form, object_count, start_over};

/// Publishes every branch fetched from the wiki as a branch of the destination.
pub const EXPORT_REFSPEC: &str = "refs/remotes/origin/*:refs/heads/*";

/// Something must have been imported before it can be exported.
pub struct VerifyImportStep;

impl StepHandler for VerifyImportStep {
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState {
        match object_count(ctx) {
            Ok(0) => StepState::NeedsInput(info_form(
                "verify",
                Message::new("mabs-config-import-not-done"),
                "mabs-config-try-again",
            )),
            Ok(_) => StepState::Satisfied,
            Err(reason) => StepState::Fatal(reason),
        }
    }

    fn submit(&self, _ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
        start_over()
    }
}

fn push_error(e: impl ToString) -> Reason {
    Message::new("mabs-config-export-push-error").param(e.to_string())
}

fn credential_key(url: &str, field: &str) -> String {
    format!("credential.{url}.{field}")
}

/// The destination remote must exist and be up to date.
pub struct ExportPushStep;

impl ExportPushStep {
    fn form(
        ctx: &WizardContext<'_>,
        existing_url: Option<&str>,
        notice: Option<Message>,
    ) -> StepForm {
        let mut remote = Field::url(Message::new("mabs-config-export-remote-url"));
        let mut user_default = String::new();
        if let Some(url) = existing_url {
            remote = remote.with_default(url);
            user_default = ctx
                .git
                .config_get(&credential_key(url, "username"))
                .ok()
                .flatten()
                .unwrap_or_default();
        }

        let mut descriptor = FormDescriptor::for_step("push");
        if let Some(notice) = notice {
            descriptor = descriptor.field("notice", Field::info(notice));
        }

        StepForm::new(
            descriptor
                .field("remote", remote)
                .field(
                    "user",
                    Field::text(Message::new("mabs-config-export-username"))
                        .with_default(user_default),
                )
                .field(
                    "pass",
                    Field::password(Message::new("mabs-config-export-password")),
                )
                .field(
                    "name",
                    Field::text(Message::new("mabs-config-export-other-branch"))
                        .with_default(&ctx.settings.export_remote),
                ),
            Message::new("mabs-config-export-push"),
        )
    }

    fn push(ctx: &WizardContext<'_>, name: &str, url: &str, values: &FormValues) -> Outcome {
        let git = ctx.git;
        let exists = match git.remote(&["-v"]) {
            Ok(output) => parse_remotes(&output).contains_key(name),
            Err(e) => return Outcome::Fatal(push_error(e)),
        };
        let configured = if exists {
            git.remote(&["set-url", name, url])
        } else {
            git.remote(&["add", name, url])
        };
        if let Err(e) = configured {
            return Outcome::Fatal(push_error(e));
        }

        let credentials = [
            ("username", values.text("user")),
            ("password", values.get("pass").filter(|p| !p.is_empty())),
        ];
        for (field, value) in credentials {
            if let Some(value) = value {
                if let Err(e) = git.config_set(&credential_key(url, field), value) {
                    return Outcome::Fatal(push_error(e));
                }
            }
        }

        match git.push(name, Some(EXPORT_REFSPEC)) {
            Ok(_) => {
                tracing::info!("Exported wiki history to {} ({})", name, url);
                Outcome::Success
            }
            Err(e) => Outcome::Fatal(push_error(e)),
        }
    }
}

impl StepHandler for ExportPushStep {
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState {
        let name = &ctx.settings.export_remote;
        let remotes = match ctx.git.remote(&["-v"]) {
            Ok(output) => parse_remotes(&output),
            Err(e) => {
                return StepState::Fatal(
                    Message::new("mabs-config-remote-list-error").param(e.to_string()),
                )
            }
        };

        let Some(url) = remotes.get(name) else {
            return StepState::NeedsInput(Self::form(ctx, None, None));
        };

        match ctx.git.push_status(name, Some(EXPORT_REFSPEC)) {
            Ok(PushStatus::UpToDate) => StepState::Satisfied,
            Ok(PushStatus::Pending) => {
                StepState::NeedsInput(Self::form(ctx, Some(url.as_str()), None))
            }
            Ok(PushStatus::Rejected(summary)) => {
                tracing::warn!("{} would reject the export: {}", name, summary);
                let notice = Message::new("mabs-config-export-push-rejected").param(summary);
                StepState::NeedsInput(Self::form(ctx, Some(url.as_str()), Some(notice)))
            }
            Err(e) => StepState::Fatal(push_error(e)),
        }
    }

    fn submit(&self, ctx: &WizardContext<'_>, values: &FormValues) -> Outcome {
        let Some(url) = values.text("remote") else {
            return Outcome::retry("mabs-config-export-remote-needed");
        };
        if let Err(e) = reqwest::Url::parse(url) {
            tracing::debug!("Rejected export URL {}: {}", url, e);
            return Outcome::Retry(Message::new("mabs-config-export-remote-invalid").param(url));
        }
        let Some(name) = values.text("name") else {
            return Outcome::retry("mabs-config-export-name-needed");
        };

        Self::push(ctx, name, url, values)
    }
}
