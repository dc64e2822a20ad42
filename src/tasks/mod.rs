//! The built-in wizards.
//!
//! - [`setup`] - create and initialize the bare repository
//! - [`import`] - connect it to the wiki and fetch the wiki's history
//! - [`export`] - push that history to another repository
//!
//! [`builtin_engine`] wires all three into a [`WizardEngine`]:
//! setup redirects to import, import redirects to export, and export
//! ends with a completion message.

pub mod export;
pub mod import;
pub mod setup;

use crate::error::Result;
use crate::git::parse_object_count;
use crate::messages::Message;
use crate::route::{Route, TaskName};
use crate::wizard::{
    Field, FormDescriptor, HandlerRegistry, Outcome, Reason, StepForm, SuccessAction,
    TaskDefinition, WizardContext, WizardEngine, WizardSettings,
};

/// Registry with a handler for every built-in step.
pub fn builtin_registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .with(TaskName::Setup, "dependency", setup::DependencyStep)
        .with(TaskName::Setup, "prepare", setup::PrepareStep)
        .with(TaskName::Setup, "initialize", setup::InitializeStep)
        .with(TaskName::Setup, "complete", setup::CompleteStep)
        .with(TaskName::Import, "verify", import::VerifyRepoStep)
        .with(TaskName::Import, "setuser", import::SetUserStep)
        .with(TaskName::Import, "setremote", import::SetRemoteStep)
        .with(TaskName::Import, "fetch", import::FetchStep)
        .with(TaskName::Import, "push", import::ImportPushStep)
        .with(TaskName::Export, "verify", export::VerifyImportStep)
        .with(TaskName::Export, "push", export::ExportPushStep)
}

/// Definitions of the three wizards.
///
/// The import wizard only pushes back to the wiki when
/// [`WizardSettings::import_push`] is set.
pub fn builtin_tasks(settings: &WizardSettings) -> Vec<TaskDefinition> {
    let mut import_steps = vec!["verify", "setuser", "setremote", "fetch"];
    if settings.import_push {
        import_steps.push("push");
    }

    vec![
        TaskDefinition::new(
            TaskName::Setup,
            ["dependency", "prepare", "initialize", "complete"],
            SuccessAction::Redirect(Route::task(TaskName::Import)),
        ),
        TaskDefinition::new(
            TaskName::Import,
            import_steps,
            SuccessAction::Redirect(Route::task(TaskName::Export)),
        ),
        TaskDefinition::new(
            TaskName::Export,
            ["verify", "push"],
            SuccessAction::Render(Message::new("mabs-export-complete")),
        ),
    ]
}

/// Engine with the built-in wizards.
pub fn builtin_engine(settings: &WizardSettings) -> Result<WizardEngine> {
    WizardEngine::new(&builtin_tasks(settings), &builtin_registry())
}

/// A form that only shows `text` under the step's section.
pub(crate) fn info_form(step: &str, text: Message, submit_key: &str) -> StepForm {
    StepForm::new(
        FormDescriptor::for_step(step).field("info", Field::info(text)),
        Message::new(submit_key),
    )
}

/// Like [`info_form`], with the "fix the problem" hint attached.
pub(crate) fn problem_form(step: &str, text: Message) -> StepForm {
    StepForm::new(
        FormDescriptor::for_step(step).field(
            "info",
            Field::info(text).with_help(Message::new("mabs-config-fix-problems")),
        ),
        Message::new("mabs-config-try-again"),
    )
}

/// Send the user back to the beginning of the setup wizard.
pub(crate) fn start_over() -> Outcome {
    Outcome::Redirect(Route::task(TaskName::Setup))
}

/// Number of objects in the repository.
pub(crate) fn object_count(ctx: &WizardContext<'_>) -> std::result::Result<u64, Reason> {
    let failed = |detail: String| Message::new("mabs-config-count-objects-error").param(detail);
    let output = ctx.git.count_objects().map_err(|e| failed(e.to_string()))?;
    parse_object_count(&output).ok_or_else(|| failed(output.trim().to_string()))
}
