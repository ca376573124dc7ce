//! Maps an element to the visual it should show.
//!
//! `render` is a pure function of the element and the mode. In edit mode
//! every control is disabled so the canvas is a layout preview; in preview
//! mode controls are live and seeded from the element's defaults. Painting
//! the result with egui is `element_view`'s job.

use crate::form::{ChoiceOption, ElementProps, FormElement};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Edit,
    Preview,
}

impl RenderMode {
    pub fn interactive(self) -> bool {
        matches!(self, RenderMode::Preview)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
    Password,
    Number,
    Date,
    Time,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceStyle {
    Checkbox,
    Radio,
}

/// One option of a choice control with its initial state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
    pub checked: bool,
}

/// Field caption shared by every input visual.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
    /// Draw the red required marker after the text.
    pub required: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Input {
        caption: Caption,
        input_type: InputType,
        placeholder: String,
        value: String,
        enabled: bool,
    },
    TextArea {
        caption: Caption,
        placeholder: String,
        value: String,
        rows: usize,
        enabled: bool,
    },
    ChoiceGroup {
        caption: Caption,
        style: ChoiceStyle,
        /// Groups radios; the element id.
        group: String,
        choices: Vec<Choice>,
        enabled: bool,
    },
    Dropdown {
        caption: Caption,
        choices: Vec<Choice>,
        multiple: bool,
        enabled: bool,
    },
    FilePicker {
        caption: Caption,
        accept: String,
        multiple: bool,
        helper: String,
        enabled: bool,
    },
    Heading(String),
    Paragraph(String),
    Divider,
    Spacer {
        height: f32,
    },
    Unrecognized,
}

pub const TEXTAREA_ROWS: usize = 4;
pub const SPACER_HEIGHT: f32 = 32.0;
pub const FILE_HELPER_TEXT: &str = "Upload files";
pub const UNRECOGNIZED_TEXT: &str = "Unknown element type";

fn choices(options: &[ChoiceOption], is_checked: impl Fn(&str) -> bool) -> Vec<Choice> {
    options
        .iter()
        .map(|o| Choice {
            label: o.label.clone(),
            value: o.value.clone(),
            checked: is_checked(&o.value),
        })
        .collect()
}

pub fn render(element: &FormElement, mode: RenderMode) -> Visual {
    let enabled = mode.interactive();
    let caption = Caption {
        text: element.label.clone(),
        required: element.required,
    };
    let input = |input_type: InputType, placeholder: &str, value: &str| Visual::Input {
        caption: caption.clone(),
        input_type,
        placeholder: placeholder.to_string(),
        value: value.to_string(),
        enabled,
    };

    match &element.props {
        ElementProps::Text(p) => input(InputType::Text, &p.placeholder, &p.default_value),
        ElementProps::Email(p) => input(InputType::Email, &p.placeholder, &p.default_value),
        ElementProps::Password(p) => input(InputType::Password, &p.placeholder, &p.default_value),
        ElementProps::Number(p) => input(InputType::Number, &p.placeholder, &p.default_value),
        ElementProps::Textarea(p) => Visual::TextArea {
            caption: caption.clone(),
            placeholder: p.placeholder.clone(),
            value: p.default_value.clone(),
            rows: TEXTAREA_ROWS,
            enabled,
        },
        ElementProps::Checkbox(p) => Visual::ChoiceGroup {
            caption: caption.clone(),
            style: ChoiceStyle::Checkbox,
            group: element.id.to_string(),
            choices: choices(&p.options, |v| p.default_value.iter().any(|d| d == v)),
            enabled,
        },
        ElementProps::Radio(p) => Visual::ChoiceGroup {
            caption: caption.clone(),
            style: ChoiceStyle::Radio,
            group: element.id.to_string(),
            choices: choices(&p.options, |v| p.default_value == v),
            enabled,
        },
        ElementProps::Select(p) => Visual::Dropdown {
            caption: caption.clone(),
            choices: choices(&p.options, |v| p.default_value == v),
            multiple: p.multiple,
            enabled,
        },
        ElementProps::Date(p) => input(InputType::Date, "", &p.default_value),
        ElementProps::Time(p) => input(InputType::Time, "", &p.default_value),
        ElementProps::File(p) => Visual::FilePicker {
            caption: caption.clone(),
            accept: p.accept.clone(),
            multiple: p.multiple,
            helper: FILE_HELPER_TEXT.to_string(),
            enabled,
        },
        ElementProps::Heading(p) => Visual::Heading(p.content.clone()),
        ElementProps::Paragraph(p) => Visual::Paragraph(p.content.clone()),
        ElementProps::Divider(_) => Visual::Divider,
        ElementProps::Spacer(_) => Visual::Spacer {
            height: SPACER_HEIGHT,
        },
        ElementProps::Unrecognized(_) => Visual::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{ElementId, ElementKind, ElementPatch};

    fn element(kind: ElementKind) -> FormElement {
        FormElement::from_new(ElementId::from("el"), kind.default_element())
    }

    fn is_enabled(visual: &Visual) -> bool {
        match visual {
            Visual::Input { enabled, .. }
            | Visual::TextArea { enabled, .. }
            | Visual::ChoiceGroup { enabled, .. }
            | Visual::Dropdown { enabled, .. }
            | Visual::FilePicker { enabled, .. } => *enabled,
            _ => false,
        }
    }

    #[test]
    fn every_kind_renders_and_edit_mode_is_inert() {
        for kind in ElementKind::ALL {
            let el = element(kind);
            let edit = render(&el, RenderMode::Edit);
            assert_ne!(edit, Visual::Unrecognized, "{:?}", kind);
            assert!(!is_enabled(&edit), "{:?} should be disabled in edit mode", kind);
        }
    }

    #[test]
    fn preview_mode_enables_inputs() {
        let el = element(ElementKind::Email);
        match render(&el, RenderMode::Preview) {
            Visual::Input {
                input_type,
                placeholder,
                enabled,
                ..
            } => {
                assert_eq!(input_type, InputType::Email);
                assert_eq!(placeholder, "Enter email");
                assert!(enabled);
            }
            other => panic!("unexpected visual {:?}", other),
        }
    }

    #[test]
    fn checkbox_defaults_become_checked_choices() {
        let mut el = element(ElementKind::Checkbox);
        ElementPatch::default()
            .default_values(vec!["option1".into(), "option3".into()])
            .required(true)
            .apply_to(&mut el);
        match render(&el, RenderMode::Preview) {
            Visual::ChoiceGroup {
                caption,
                style,
                choices,
                ..
            } => {
                assert!(caption.required);
                assert_eq!(style, ChoiceStyle::Checkbox);
                let checked: Vec<bool> = choices.iter().map(|c| c.checked).collect();
                assert_eq!(checked, vec![true, false, true]);
            }
            other => panic!("unexpected visual {:?}", other),
        }
    }

    #[test]
    fn radio_with_empty_default_has_nothing_selected() {
        let el = element(ElementKind::Radio);
        match render(&el, RenderMode::Preview) {
            Visual::ChoiceGroup { choices, group, .. } => {
                assert!(choices.iter().all(|c| !c.checked));
                assert_eq!(group, "el");
            }
            other => panic!("unexpected visual {:?}", other),
        }
    }

    #[test]
    fn static_kinds_map_to_text_and_rules() {
        assert_eq!(
            render(&element(ElementKind::Heading), RenderMode::Edit),
            Visual::Heading("Section Heading".into())
        );
        assert_eq!(
            render(&element(ElementKind::Divider), RenderMode::Preview),
            Visual::Divider
        );
        assert_eq!(
            render(&element(ElementKind::Spacer), RenderMode::Preview),
            Visual::Spacer { height: 32.0 }
        );
        match render(&element(ElementKind::Textarea), RenderMode::Edit) {
            Visual::TextArea { rows, .. } => assert_eq!(rows, 4),
            other => panic!("unexpected visual {:?}", other),
        }
    }

    #[test]
    fn unknown_payload_uses_fallback() {
        let el: FormElement = serde_json::from_str(
            r#"{"id":"s","type":"signature","label":"Sign here","required":true,"columnSpan":1}"#,
        )
        .unwrap();
        assert_eq!(render(&el, RenderMode::Preview), Visual::Unrecognized);
    }

    #[test]
    fn file_picker_carries_filter() {
        let mut el = element(ElementKind::File);
        ElementPatch::default()
            .accept(".pdf")
            .multiple(true)
            .apply_to(&mut el);
        match render(&el, RenderMode::Edit) {
            Visual::FilePicker {
                accept,
                multiple,
                helper,
                enabled,
                ..
            } => {
                assert_eq!(accept, ".pdf");
                assert!(multiple);
                assert_eq!(helper, "Upload files");
                assert!(!enabled);
            }
            other => panic!("unexpected visual {:?}", other),
        }
    }
}
