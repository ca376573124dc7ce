//! Static registry of the field types the palette can create.

use super::element::{
    CheckboxProps, ChoiceOption, ColumnSpan, DateTimeProps, ElementProps, FileProps, NewElement,
    RadioProps, SelectProps, StaticProps, TextFieldProps,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Textarea,
    Number,
    Email,
    Password,
    Checkbox,
    Radio,
    Select,
    Date,
    Time,
    File,
    Heading,
    Paragraph,
    Divider,
    Spacer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    BasicInputs,
    SelectionInputs,
    AdvancedInputs,
    LayoutElements,
}

impl ElementCategory {
    pub const ALL: [ElementCategory; 4] = [
        ElementCategory::BasicInputs,
        ElementCategory::SelectionInputs,
        ElementCategory::AdvancedInputs,
        ElementCategory::LayoutElements,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ElementCategory::BasicInputs => "Basic Inputs",
            ElementCategory::SelectionInputs => "Selection Inputs",
            ElementCategory::AdvancedInputs => "Advanced Inputs",
            ElementCategory::LayoutElements => "Layout Elements",
        }
    }

    /// Kinds listed under this category, in palette order.
    pub fn kinds(self) -> impl Iterator<Item = ElementKind> {
        ElementKind::ALL
            .into_iter()
            .filter(move |k| k.category() == self)
    }
}

impl ElementKind {
    pub const ALL: [ElementKind; 15] = [
        ElementKind::Text,
        ElementKind::Textarea,
        ElementKind::Number,
        ElementKind::Email,
        ElementKind::Password,
        ElementKind::Checkbox,
        ElementKind::Radio,
        ElementKind::Select,
        ElementKind::Date,
        ElementKind::Time,
        ElementKind::File,
        ElementKind::Heading,
        ElementKind::Paragraph,
        ElementKind::Divider,
        ElementKind::Spacer,
    ];

    /// The `type` tag used in persisted documents.
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Textarea => "textarea",
            ElementKind::Number => "number",
            ElementKind::Email => "email",
            ElementKind::Password => "password",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Radio => "radio",
            ElementKind::Select => "select",
            ElementKind::Date => "date",
            ElementKind::Time => "time",
            ElementKind::File => "file",
            ElementKind::Heading => "heading",
            ElementKind::Paragraph => "paragraph",
            ElementKind::Divider => "divider",
            ElementKind::Spacer => "spacer",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Name shown in the palette; also the initial label of a new element.
    pub fn palette_label(self) -> &'static str {
        match self {
            ElementKind::Text => "Text Input",
            ElementKind::Textarea => "Multi-line Text",
            ElementKind::Number => "Number",
            ElementKind::Email => "Email",
            ElementKind::Password => "Password",
            ElementKind::Checkbox => "Checkboxes",
            ElementKind::Radio => "Radio Buttons",
            ElementKind::Select => "Dropdown",
            ElementKind::Date => "Date Picker",
            ElementKind::Time => "Time Picker",
            ElementKind::File => "File Upload",
            ElementKind::Heading => "Heading",
            ElementKind::Paragraph => "Paragraph",
            ElementKind::Divider => "Divider",
            ElementKind::Spacer => "Spacer",
        }
    }

    pub fn category(self) -> ElementCategory {
        match self {
            ElementKind::Text
            | ElementKind::Textarea
            | ElementKind::Number
            | ElementKind::Email
            | ElementKind::Password => ElementCategory::BasicInputs,
            ElementKind::Checkbox | ElementKind::Radio | ElementKind::Select => {
                ElementCategory::SelectionInputs
            }
            ElementKind::Date | ElementKind::Time | ElementKind::File => {
                ElementCategory::AdvancedInputs
            }
            ElementKind::Heading
            | ElementKind::Paragraph
            | ElementKind::Divider
            | ElementKind::Spacer => ElementCategory::LayoutElements,
        }
    }

    /// Glyph used in the palette and on element cards.
    pub fn icon(self) -> &'static str {
        match self {
            ElementKind::Text | ElementKind::Email | ElementKind::Password | ElementKind::Number => {
                "🔤"
            }
            ElementKind::Textarea => "📄",
            ElementKind::Checkbox => "☑",
            ElementKind::Radio => "🔘",
            ElementKind::Select => "🔽",
            ElementKind::Date => "📅",
            ElementKind::Time => "🕑",
            ElementKind::File => "📎",
            ElementKind::Heading => "🇹",
            ElementKind::Paragraph => "📝",
            ElementKind::Divider => "➖",
            ElementKind::Spacer => "⬜",
        }
    }

    /// Default payload the palette hands to the store for this kind.
    pub fn default_element(self) -> NewElement {
        let label = self.palette_label();
        NewElement {
            label: label.to_string(),
            required: false,
            column_span: ColumnSpan::ONE,
            props: self.default_props(label),
        }
    }

    fn default_props(self, label: &str) -> ElementProps {
        let text = || TextFieldProps {
            placeholder: format!("Enter {}", label.to_lowercase()),
            default_value: String::new(),
            min_length: None,
            max_length: None,
        };
        let content = |s: &str| StaticProps {
            content: s.to_string(),
        };
        match self {
            ElementKind::Text => ElementProps::Text(text()),
            ElementKind::Textarea => ElementProps::Textarea(text()),
            ElementKind::Number => ElementProps::Number(text()),
            ElementKind::Email => ElementProps::Email(text()),
            ElementKind::Password => ElementProps::Password(text()),
            ElementKind::Checkbox => ElementProps::Checkbox(CheckboxProps {
                options: default_options(),
                default_value: Vec::new(),
            }),
            ElementKind::Radio => ElementProps::Radio(RadioProps {
                options: default_options(),
                default_value: String::new(),
            }),
            ElementKind::Select => ElementProps::Select(SelectProps {
                options: default_options(),
                default_value: String::new(),
                multiple: false,
            }),
            ElementKind::Date => ElementProps::Date(DateTimeProps::default()),
            ElementKind::Time => ElementProps::Time(DateTimeProps::default()),
            ElementKind::File => ElementProps::File(FileProps {
                accept: "*/*".to_string(),
                multiple: false,
            }),
            ElementKind::Heading => ElementProps::Heading(content("Section Heading")),
            ElementKind::Paragraph => ElementProps::Paragraph(content("This is a paragraph of text.")),
            ElementKind::Divider => ElementProps::Divider(content("")),
            ElementKind::Spacer => ElementProps::Spacer(content("")),
        }
    }
}

fn default_options() -> Vec<ChoiceOption> {
    (1..=3)
        .map(|n| ChoiceOption::new(format!("Option {}", n), format!("option{}", n)))
        .collect()
}
