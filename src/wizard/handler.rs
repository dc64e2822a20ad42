//! Step handlers and the registry that maps steps to them.
//!
//! - [`StepHandler`] - what every step implements
//! - [`HandlerRegistry`] - lookup table keyed by task and step name

use std::collections::HashMap;
use std::sync::Arc;

use crate::route::TaskName;

use super::context::WizardContext;
use super::form::FormValues;
use super::state::{Outcome, StepState};

/// One step of a wizard.
///
/// `evaluate` must be idempotent: the engine calls it on every request
/// for every step up to the first unsatisfied one.
pub trait StepHandler: Send + Sync {
    /// Inspect live state and decide whether the step needs input.
    fn evaluate(&self, ctx: &WizardContext<'_>) -> StepState;

    /// Act on the values submitted for the step's form.
    fn submit(&self, ctx: &WizardContext<'_>, values: &FormValues) -> Outcome;
}

/// Handlers by `(task, step)`.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<(TaskName, String), Arc<dyn StepHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for a step, replacing any earlier one.
    pub fn register(
        &mut self,
        task: TaskName,
        step: impl Into<String>,
        handler: Arc<dyn StepHandler>,
    ) {
        self.handlers.insert((task, step.into()), handler);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(
        mut self,
        task: TaskName,
        step: impl Into<String>,
        handler: impl StepHandler + 'static,
    ) -> Self {
        self.register(task, step, Arc::new(handler));
        self
    }

    /// Handler for a step, if one is registered.
    pub fn get(&self, task: TaskName, step: &str) -> Option<Arc<dyn StepHandler>> {
        self.handlers.get(&(task, step.to_string())).cloned()
    }
}
