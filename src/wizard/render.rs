//! Turning pending forms into prompts.

use crate::error::Result;
use crate::messages::Message;
use crate::route::{Route, TaskName};
use crate::ui::{Prompt, PromptType, SpinnerHandle, UserInterface};

use super::engine::PendingForm;
use super::form::{is_truthy, Field, FieldKind, FormValues};

/// Prompt key of the final "submit this form?" confirmation.
pub const SUBMIT_KEY: &str = "submit";

/// Shows forms and wizard results to the user.
pub trait FormRenderer {
    /// Show a form and collect values; `None` when the user declines to submit.
    fn render(&mut self, pending: &PendingForm) -> Result<Option<FormValues>>;

    /// Called right before the submission runs.
    fn begin_submit(&mut self, pending: &PendingForm) -> Box<dyn SpinnerHandle>;

    /// The wizard finished.
    fn complete(&mut self, message: &Message);

    /// The wizard stopped on an error.
    fn fatal(&mut self, reason: &Message);

    /// The wizard moved on to another route.
    fn redirect(&mut self, _route: &Route) {}
}

/// [`FormRenderer`] on top of a [`UserInterface`].
pub struct UiFormRenderer<'a> {
    ui: &'a mut dyn UserInterface,
    current_task: Option<TaskName>,
}

impl<'a> UiFormRenderer<'a> {
    /// Render through `ui`.
    pub fn new(ui: &'a mut dyn UserInterface) -> Self {
        Self {
            ui,
            current_task: None,
        }
    }

    fn enter_task(&mut self, task: TaskName) {
        if self.current_task != Some(task) {
            self.ui.show_header(&Message::new(task.title_key()).text());
            self.current_task = Some(task);
        }
    }

    fn field(&mut self, name: &str, field: &Field, values: &mut FormValues) -> Result<()> {
        let label = field.label.as_ref().map(Message::text).unwrap_or_default();

        match field.kind {
            FieldKind::Info => {
                if !label.is_empty() {
                    self.ui.message(&label);
                }
            }
            FieldKind::Hidden => {
                if let Some(value) = &field.default {
                    values.insert(name, value.clone());
                }
            }
            _ if field.read_only => {
                let value = field.default.clone().unwrap_or_default();
                self.ui.message(&format!("{label}: {value}"));
                values.insert(name, value);
            }
            FieldKind::Text | FieldKind::Url | FieldKind::Password | FieldKind::Checkbox => {
                let prompt_type = match field.kind {
                    FieldKind::Password => PromptType::Password,
                    FieldKind::Checkbox => PromptType::Confirm,
                    _ => PromptType::Input,
                };
                let answer = self.ui.prompt(&Prompt {
                    key: name.to_string(),
                    question: label,
                    prompt_type,
                    default: field.default.clone(),
                })?;
                let value = match prompt_type {
                    PromptType::Confirm => is_truthy(&answer.as_string()).to_string(),
                    _ => answer.as_string(),
                };
                values.insert(name, value);
            }
        }

        if let Some(help) = &field.help {
            self.ui.show_hint(&help.text());
        }
        Ok(())
    }
}

impl FormRenderer for UiFormRenderer<'_> {
    fn render(&mut self, pending: &PendingForm) -> Result<Option<FormValues>> {
        self.enter_task(pending.task);

        let descriptor = &pending.form.descriptor;
        if let Some(section) = descriptor.section() {
            self.ui.message(&section.text());
        }
        if let Some(error) = &pending.error {
            self.ui.error(&error.text());
        }

        let mut values = FormValues::new();
        for (name, field) in descriptor.fields() {
            self.field(name, field, &mut values)?;
        }

        let confirm = self.ui.prompt(&Prompt {
            key: SUBMIT_KEY.to_string(),
            question: format!("{}?", pending.form.submit_label.text()),
            prompt_type: PromptType::Confirm,
            default: Some("true".to_string()),
        })?;

        if is_truthy(&confirm.as_string()) {
            Ok(Some(values))
        } else {
            Ok(None)
        }
    }

    fn begin_submit(&mut self, pending: &PendingForm) -> Box<dyn SpinnerHandle> {
        self.ui.start_spinner(&pending.form.submit_label.text())
    }

    fn complete(&mut self, message: &Message) {
        self.ui.success(&message.text());
    }

    fn fatal(&mut self, reason: &Message) {
        self.ui.error(&reason.text());
    }

    fn redirect(&mut self, route: &Route) {
        tracing::debug!("Following redirect to {}", route);
        if self.ui.output_mode().shows_redirects() {
            self.ui.message(&format!("→ {route}"));
        }
    }
}
