//! Declarative form descriptions.
//!
//! A step that needs user input describes the form it wants shown; the
//! [`FormRenderer`](super::FormRenderer) turns it into prompts and hands
//! the submitted values back as [`FormValues`].

use std::collections::BTreeMap;

use crate::messages::Message;

/// Kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form text.
    Text,
    /// A URL.
    Url,
    /// Text that must not be echoed.
    Password,
    /// Yes/no toggle.
    Checkbox,
    /// Value carried through the form without being shown.
    Hidden,
    /// Informational text, no input.
    Info,
}

/// A single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// What kind of field this is.
    pub kind: FieldKind,
    /// Label, or the displayed text for [`FieldKind::Info`].
    pub label: Option<Message>,
    /// Value used when nothing is entered.
    pub default: Option<String>,
    /// Shown but not editable.
    pub read_only: bool,
    /// Extra guidance shown under the field.
    pub help: Option<Message>,
}

impl Field {
    fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            label: None,
            default: None,
            read_only: false,
            help: None,
        }
    }

    /// Informational text.
    pub fn info(text: Message) -> Self {
        Self {
            label: Some(text),
            ..Self::new(FieldKind::Info)
        }
    }

    /// Hidden value.
    pub fn hidden(value: impl Into<String>) -> Self {
        Self {
            default: Some(value.into()),
            ..Self::new(FieldKind::Hidden)
        }
    }

    /// Text input.
    pub fn text(label: Message) -> Self {
        Self {
            label: Some(label),
            ..Self::new(FieldKind::Text)
        }
    }

    /// URL input.
    pub fn url(label: Message) -> Self {
        Self {
            label: Some(label),
            ..Self::new(FieldKind::Url)
        }
    }

    /// Password input.
    pub fn password(label: Message) -> Self {
        Self {
            label: Some(label),
            ..Self::new(FieldKind::Password)
        }
    }

    /// Checkbox.
    pub fn checkbox(label: Message, checked: bool) -> Self {
        Self {
            label: Some(label),
            default: Some(checked.to_string()),
            ..Self::new(FieldKind::Checkbox)
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the field read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Attach help text.
    pub fn with_help(mut self, help: Message) -> Self {
        self.help = Some(help);
        self
    }
}

/// An ordered set of named fields under one section heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDescriptor {
    section: Option<Message>,
    fields: Vec<(String, Field)>,
}

impl FormDescriptor {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty form headed by the section for `step`.
    pub fn for_step(step: &str) -> Self {
        Self {
            section: Some(Message::new(format!("mabs-config-{step}-section"))),
            fields: Vec::new(),
        }
    }

    /// Add a field. A later field with the same name replaces the earlier one.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = field;
        } else {
            self.fields.push((name, field));
        }
        self
    }

    /// Section heading.
    pub fn section(&self) -> Option<&Message> {
        self.section.as_ref()
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    /// Iterate over fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// A form with no fields means the step has nothing to ask.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// What a step shows when it needs input: the form and its submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepForm {
    /// The fields.
    pub descriptor: FormDescriptor,
    /// Label of the submit button.
    pub submit_label: Message,
}

impl StepForm {
    /// Create a step form.
    pub fn new(descriptor: FormDescriptor, submit_label: Message) -> Self {
        Self {
            descriptor,
            submit_label,
        }
    }
}

/// Values submitted for a form, by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// Create an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Values a form would submit untouched: every field's default.
    pub fn defaults_of(form: &FormDescriptor) -> Self {
        let mut values = Self::new();
        for (name, field) in form.fields() {
            if let Some(default) = &field.default {
                values.insert(name, default.clone());
            }
        }
        values
    }

    /// Set a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Raw value of a field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Trimmed value of a field, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Whether a field was submitted at all.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Interpret a field as a checkbox.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(is_truthy)
    }
}

/// Checkbox and confirmation values accepted as "yes".
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "on"
    )
}
