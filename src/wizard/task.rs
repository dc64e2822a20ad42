//! Task definitions and their resolution against a handler registry.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{MabsError, Result};
use crate::messages::Message;
use crate::route::{Route, TaskName};

use super::handler::{HandlerRegistry, StepHandler};

/// What happens once every step of a task is satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessAction {
    /// Show a completion message and stop.
    Render(Message),
    /// Send the user to another route.
    Redirect(Route),
    /// Start scanning another task within the same request.
    Continue(TaskName),
}

/// A task as written down: a name, step names and a success action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    /// Task name.
    pub name: TaskName,
    /// Step names in scan order.
    pub steps: Vec<String>,
    /// Action once all steps are satisfied.
    pub on_success: SuccessAction,
}

impl TaskDefinition {
    /// Create a definition.
    pub fn new<S: Into<String>>(
        name: TaskName,
        steps: impl IntoIterator<Item = S>,
        on_success: SuccessAction,
    ) -> Self {
        Self {
            name,
            steps: steps.into_iter().map(Into::into).collect(),
            on_success,
        }
    }

    /// Bind every step to its handler.
    ///
    /// Fails when the step list is empty, a step name repeats, or a step
    /// has no registered handler.
    pub fn resolve(&self, registry: &HandlerRegistry) -> Result<Task> {
        if self.steps.is_empty() {
            return Err(MabsError::configuration(format!(
                "task '{}' has no steps",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        let mut steps = Vec::with_capacity(self.steps.len());
        for name in &self.steps {
            if !seen.insert(name.as_str()) {
                return Err(MabsError::configuration(format!(
                    "task '{}' lists step '{}' twice",
                    self.name, name
                )));
            }
            let handler = registry.get(self.name, name).ok_or_else(|| {
                MabsError::configuration(format!(
                    "step '{}' of task '{}' has no handler",
                    name, self.name
                ))
            })?;
            steps.push(Step {
                name: name.clone(),
                handler,
            });
        }

        Ok(Task {
            name: self.name,
            steps,
            on_success: self.on_success.clone(),
        })
    }
}

/// A step bound to its handler.
#[derive(Clone)]
pub struct Step {
    /// Step name, unique within its task.
    pub name: String,
    /// The handler.
    pub handler: Arc<dyn StepHandler>,
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// A resolved task, ready for the engine.
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name.
    pub name: TaskName,
    /// Steps in scan order; never empty.
    pub steps: Vec<Step>,
    /// Action once all steps are satisfied.
    pub on_success: SuccessAction,
}

impl Task {
    /// Position and binding of a step by name.
    pub fn step(&self, name: &str) -> Result<(usize, &Step)> {
        self.steps
            .iter()
            .enumerate()
            .find(|(_, s)| s.name == name)
            .ok_or_else(|| {
                MabsError::configuration(format!(
                    "task '{}' has no step '{}'",
                    self.name, name
                ))
            })
    }

    /// Step names in order.
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::context::WizardContext;
    use crate::wizard::form::FormValues;
    use crate::wizard::state::{Outcome, StepState};

    struct Noop;

    impl StepHandler for Noop {
        fn evaluate(&self, _ctx: &WizardContext<'_>) -> StepState {
            StepState::Satisfied
        }
        fn submit(&self, _ctx: &WizardContext<'_>, _values: &FormValues) -> Outcome {
            Outcome::Success
        }
    }

    fn registry() -> HandlerRegistry {
        HandlerRegistry::new()
            .with(TaskName::Export, "verify", Noop)
            .with(TaskName::Export, "push", Noop)
    }

    fn done() -> SuccessAction {
        SuccessAction::Render(Message::new("mabs-export-complete"))
    }

    #[test]
    fn resolves_in_order() {
        let task = TaskDefinition::new(TaskName::Export, ["verify", "push"], done())
            .resolve(&registry())
            .unwrap();
        assert_eq!(task.step_names().collect::<Vec<_>>(), ["verify", "push"]);
        assert_eq!(task.step("push").unwrap().0, 1);
    }

    #[test]
    fn missing_handler_fails_at_construction() {
        let err = TaskDefinition::new(TaskName::Export, ["verify", "frobnicate"], done())
            .resolve(&registry())
            .unwrap_err();
        assert!(matches!(err, MabsError::Configuration { .. }));
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn empty_step_list_fails() {
        let err = TaskDefinition::new(TaskName::Export, Vec::<String>::new(), done())
            .resolve(&registry())
            .unwrap_err();
        assert!(err.to_string().contains("no steps"));
    }

    #[test]
    fn duplicate_step_fails() {
        let err = TaskDefinition::new(TaskName::Export, ["verify", "verify"], done())
            .resolve(&registry())
            .unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn handlers_are_per_task() {
        let err = TaskDefinition::new(TaskName::Import, ["verify"], done())
            .resolve(&registry())
            .unwrap_err();
        assert!(matches!(err, MabsError::Configuration { .. }));
    }

    #[test]
    fn unknown_step_lookup_fails() {
        let task = TaskDefinition::new(TaskName::Export, ["verify"], done())
            .resolve(&registry())
            .unwrap();
        assert!(task.step("push").is_err());
    }
}
