//! Abstract render instructions returned to the presentation layer.
//!
//! The core never renders UI. Every wizard call answers with a
//! `RenderInstruction` describing the next prompt: a title, either a choice
//! list or a form, and whether a back affordance applies. The chat-platform
//! layer turns this into whatever widgetry it has.

use serde::{Deserialize, Serialize};

use crate::session::StepTag;

/// One selectable option in a choice step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Human-readable label shown to the user.
    pub label: String,
    /// Opaque value echoed back via `submit_selection`.
    pub value: String,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label and value are the same string.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: text.clone(),
            value: text,
        }
    }
}

/// One input field in a form step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub field_id: String,
    pub label: String,
    pub required: bool,
    pub max_length: usize,
}

/// What the presentation layer should show next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderInstruction {
    /// The step this prompt belongs to. Selections must echo it back so
    /// stale submissions from a previous render can be rejected.
    pub step: StepTag,
    pub title: String,
    pub description: Option<String>,
    /// Choice options; empty for form and terminal steps.
    pub options: Vec<ChoiceOption>,
    /// Form fields; empty for choice and terminal steps.
    pub fields: Vec<FormField>,
    /// Whether a back affordance should be shown.
    pub show_back: bool,
}

impl RenderInstruction {
    /// A choice-list prompt.
    pub fn choices(
        step: StepTag,
        title: impl Into<String>,
        options: Vec<ChoiceOption>,
        show_back: bool,
    ) -> Self {
        Self {
            step,
            title: title.into(),
            description: None,
            options,
            fields: Vec::new(),
            show_back,
        }
    }

    /// A form prompt.
    pub fn form(
        step: StepTag,
        title: impl Into<String>,
        fields: Vec<FormField>,
        show_back: bool,
    ) -> Self {
        Self {
            step,
            title: title.into(),
            description: None,
            options: Vec::new(),
            fields,
            show_back,
        }
    }

    /// A terminal confirmation with nothing to select.
    pub fn message(step: StepTag, title: impl Into<String>) -> Self {
        Self {
            step,
            title: title.into(),
            description: None,
            options: Vec::new(),
            fields: Vec::new(),
            show_back: false,
        }
    }

    /// Attach a description line.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
