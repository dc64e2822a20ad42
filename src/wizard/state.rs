//! Step evaluation and submission results.

use crate::messages::Message;
use crate::route::Route;

use super::form::StepForm;

/// Why a step could not proceed: a message key plus parameters.
pub type Reason = Message;

/// Result of inspecting a step against live system state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepState {
    /// Nothing to do, move on to the next step.
    Satisfied,
    /// The step needs the user to look at (and usually submit) a form.
    NeedsInput(StepForm),
    /// The step cannot even be evaluated.
    Fatal(Reason),
}

impl StepState {
    /// Build the state for an optional form: no form, or an empty one,
    /// means the step is satisfied.
    pub fn from_form(form: Option<StepForm>) -> Self {
        match form {
            Some(form) if !form.descriptor.is_empty() => StepState::NeedsInput(form),
            _ => StepState::Satisfied,
        }
    }

    /// Fold a form without fields into `Satisfied`.
    pub fn normalized(self) -> Self {
        match self {
            StepState::NeedsInput(form) => StepState::from_form(Some(form)),
            other => other,
        }
    }

    /// Whether the step has nothing to do.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, StepState::Satisfied)
    }
}

/// Result of a step's submit callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Submission worked; re-scan the task from the top.
    Success,
    /// Submitted data failed validation; show the same step again.
    Retry(Reason),
    /// A collaborator failed; abort the wizard.
    Fatal(Reason),
    /// Leave this task for another route.
    Redirect(Route),
}

impl Outcome {
    /// Shorthand for a retry with a bare message key.
    pub fn retry(key: &str) -> Self {
        Outcome::Retry(Message::new(key))
    }

    /// Shorthand for a fatal outcome with a bare message key.
    pub fn fatal(key: &str) -> Self {
        Outcome::Fatal(Message::new(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::form::{Field, FormDescriptor};

    #[test]
    fn no_form_is_satisfied() {
        assert!(StepState::from_form(None).is_satisfied());
    }

    #[test]
    fn empty_form_is_satisfied() {
        let form = StepForm::new(FormDescriptor::new(), Message::new("mabs-config-try-again"));
        assert!(StepState::from_form(Some(form)).is_satisfied());
    }

    #[test]
    fn normalized_folds_fieldless_forms() {
        let empty = StepForm::new(FormDescriptor::new(), Message::new("mabs-config-continue"));
        assert!(StepState::NeedsInput(empty).normalized().is_satisfied());

        let fatal = StepState::Fatal(Message::new("mabs-config-push-error"));
        assert_eq!(fatal.clone().normalized(), fatal);
    }

    #[test]
    fn form_with_fields_needs_input() {
        let form = StepForm::new(
            FormDescriptor::new().field("info", Field::info(Message::new("mabs-config-complete"))),
            Message::new("mabs-config-continue"),
        );
        assert!(matches!(
            StepState::from_form(Some(form)),
            StepState::NeedsInput(_)
        ));
    }
}
