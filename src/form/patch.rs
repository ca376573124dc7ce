//! Partial updates for elements and settings.
//!
//! A patch only names the fields it changes. Fields that the target
//! element's variant does not have are ignored when the patch is applied.

use super::document::FormSettings;
use super::element::{ChoiceOption, ColumnSpan, ElementProps, FormElement};

/// `defaultValue` is a string on most variants and a list on checkboxes.
#[derive(Clone, Debug, PartialEq)]
pub enum DefaultValue {
    Single(String),
    Many(Vec<String>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementPatch {
    pub label: Option<String>,
    pub required: Option<bool>,
    pub column_span: Option<ColumnSpan>,
    pub placeholder: Option<String>,
    pub default_value: Option<DefaultValue>,
    /// `Some(None)` clears the bound.
    pub min_length: Option<Option<u32>>,
    pub max_length: Option<Option<u32>>,
    pub options: Option<Vec<ChoiceOption>>,
    pub multiple: Option<bool>,
    pub accept: Option<String>,
    pub content: Option<String>,
}

impl ElementPatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn column_span(mut self, span: ColumnSpan) -> Self {
        self.column_span = Some(span);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn default_text(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(DefaultValue::Single(value.into()));
        self
    }

    pub fn default_values(mut self, values: Vec<String>) -> Self {
        self.default_value = Some(DefaultValue::Many(values));
        self
    }

    pub fn min_length(mut self, min: Option<u32>) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: Option<u32>) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn options(mut self, options: Vec<ChoiceOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = Some(multiple);
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &ElementPatch::default()
    }

    /// Merge this patch into `element`. The id and type tag never change.
    pub fn apply_to(self, element: &mut FormElement) {
        if let Some(label) = self.label {
            element.label = label;
        }
        if let Some(required) = self.required {
            element.required = required;
        }
        if let Some(span) = self.column_span {
            element.column_span = span;
        }

        match &mut element.props {
            ElementProps::Text(p)
            | ElementProps::Textarea(p)
            | ElementProps::Number(p)
            | ElementProps::Email(p)
            | ElementProps::Password(p) => {
                if let Some(placeholder) = self.placeholder {
                    p.placeholder = placeholder;
                }
                if let Some(DefaultValue::Single(v)) = self.default_value {
                    p.default_value = v;
                }
                if let Some(min) = self.min_length {
                    p.min_length = min;
                }
                if let Some(max) = self.max_length {
                    p.max_length = max;
                }
            }
            ElementProps::Checkbox(p) => {
                if let Some(options) = self.options {
                    p.options = options;
                }
                if let Some(DefaultValue::Many(v)) = self.default_value {
                    p.default_value = v;
                }
            }
            ElementProps::Radio(p) => {
                if let Some(options) = self.options {
                    p.options = options;
                }
                if let Some(DefaultValue::Single(v)) = self.default_value {
                    p.default_value = v;
                }
            }
            ElementProps::Select(p) => {
                if let Some(options) = self.options {
                    p.options = options;
                }
                if let Some(DefaultValue::Single(v)) = self.default_value {
                    p.default_value = v;
                }
                if let Some(multiple) = self.multiple {
                    p.multiple = multiple;
                }
            }
            ElementProps::Date(p) | ElementProps::Time(p) => {
                if let Some(DefaultValue::Single(v)) = self.default_value {
                    p.default_value = v;
                }
            }
            ElementProps::File(p) => {
                if let Some(accept) = self.accept {
                    p.accept = accept;
                }
                if let Some(multiple) = self.multiple {
                    p.multiple = multiple;
                }
            }
            ElementProps::Heading(p)
            | ElementProps::Paragraph(p)
            | ElementProps::Divider(p)
            | ElementProps::Spacer(p) => {
                if let Some(content) = self.content {
                    p.content = content;
                }
            }
            ElementProps::Unrecognized(_) => {}
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutPatch {
    pub columns: Option<ColumnSpan>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub submit_button_text: Option<String>,
    pub success_message: Option<String>,
    pub layout: Option<LayoutPatch>,
}

impl SettingsPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn submit_button_text(mut self, text: impl Into<String>) -> Self {
        self.submit_button_text = Some(text.into());
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn columns(mut self, columns: ColumnSpan) -> Self {
        self.layout = Some(LayoutPatch {
            columns: Some(columns),
        });
        self
    }

    /// Shallow merge, except `layout` which is merged key by key so an empty
    /// layout patch leaves the current columns alone.
    pub fn apply_to(self, settings: &mut FormSettings) {
        if let Some(title) = self.title {
            settings.title = title;
        }
        if let Some(description) = self.description {
            settings.description = description;
        }
        if let Some(text) = self.submit_button_text {
            settings.submit_button_text = text;
        }
        if let Some(message) = self.success_message {
            settings.success_message = message;
        }
        if let Some(layout) = self.layout {
            if let Some(columns) = layout.columns {
                settings.layout.columns = columns;
            }
        }
    }
}
