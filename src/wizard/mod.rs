//! The step wizard.
//!
//! A wizard is a [`Task`]: an ordered list of steps, each backed by a
//! [`StepHandler`]. On every request the [`WizardEngine`] evaluates the
//! steps in order and stops at the first one that needs input, so the
//! user always lands on the earliest unfinished step. Submitting that
//! step's form runs the handler's `submit` and scans again.
//!
//! - [`form`] - form descriptors and submitted values
//! - [`state`] - step states and submission outcomes
//! - [`context`] - settings and collaborators handed to handlers
//! - [`handler`] - the handler trait and registry
//! - [`task`] - task definitions and their resolved form
//! - [`engine`] - one request at a time
//! - [`render`] - showing forms through the terminal UI
//! - [`driver`] - a full run across requests and redirects

pub mod context;
pub mod driver;
pub mod engine;
pub mod form;
pub mod handler;
pub mod render;
pub mod state;
pub mod task;

#[cfg(test)]
pub(crate) mod fixture;

pub use context::{WizardContext, WizardSettings, REMOTE_SCHEME};
pub use driver::{RunResult, WizardDriver, DEFAULT_MAX_TURNS};
pub use engine::{PendingForm, Request, StepStatus, Turn, WizardEngine};
pub use form::{is_truthy, Field, FieldKind, FormDescriptor, FormValues, StepForm};
pub use handler::{HandlerRegistry, StepHandler};
pub use render::{FormRenderer, UiFormRenderer, SUBMIT_KEY};
pub use state::{Outcome, Reason, StepState};
pub use task::{Step, SuccessAction, Task, TaskDefinition};
