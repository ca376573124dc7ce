//! Right-hand panel: properties of the selected element, or the form
//! settings when nothing is selected.
//!
//! Widgets edit local copies; any change is turned into a patch and sent to
//! the store in the same frame.

use eframe::egui;

use crate::app_state::AppState;
use crate::element_view::toggle;
use crate::form::{
    ChoiceOption, ColumnSpan, ElementPatch, ElementProps, FormElement, FormSettings,
    SettingsPatch, TextFieldProps,
};

/// The option "Add Option" appends: numbered after the current count.
pub fn next_option(options: &[ChoiceOption]) -> ChoiceOption {
    let n = options.len() + 1;
    ChoiceOption::new(format!("Option {}", n), format!("option{}", n))
}

pub fn with_option_added(options: &[ChoiceOption]) -> Vec<ChoiceOption> {
    let mut out = options.to_vec();
    out.push(next_option(options));
    out
}

/// Checkbox defaults with `value` switched on or off.
pub fn with_default_toggled(defaults: &[String], value: &str) -> Vec<String> {
    let mut out = defaults.to_vec();
    toggle(&mut out, value);
    out
}

/// `options` without the entry at `index`; unchanged when out of range.
pub fn with_option_removed(options: &[ChoiceOption], index: usize) -> Vec<ChoiceOption> {
    let mut out = options.to_vec();
    if index < out.len() {
        out.remove(index);
    }
    out
}

pub fn with_option_edited(
    options: &[ChoiceOption],
    index: usize,
    label: Option<String>,
    value: Option<String>,
) -> Vec<ChoiceOption> {
    let mut out = options.to_vec();
    if let Some(option) = out.get_mut(index) {
        if let Some(label) = label {
            option.label = label;
        }
        if let Some(value) = value {
            option.value = value;
        }
    }
    out
}

pub fn show(ui: &mut egui::Ui, state: &mut AppState) {
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| match state.store.selected_element().cloned() {
            Some(element) => {
                ui.heading("Element Properties");
                ui.separator();
                let patch = element_properties(ui, &element);
                if !patch.is_empty() {
                    state.store.update_element(&element.id, patch);
                }
            }
            None => {
                ui.heading("Form Settings");
                ui.separator();
                let settings = state.store.document().settings.clone();
                if let Some(patch) = form_settings(ui, &settings) {
                    state.store.update_settings(patch);
                }
            }
        });
}

fn text_row(ui: &mut egui::Ui, label: &str, value: &str, multiline: bool) -> Option<String> {
    ui.label(label);
    let mut buffer = value.to_string();
    let edit = if multiline {
        egui::TextEdit::multiline(&mut buffer).desired_rows(3)
    } else {
        egui::TextEdit::singleline(&mut buffer)
    };
    let changed = ui.add(edit.desired_width(f32::INFINITY)).changed();
    ui.add_space(4.0);
    changed.then_some(buffer)
}

fn span_combo(ui: &mut egui::Ui, id: &str, current: ColumnSpan) -> Option<ColumnSpan> {
    let mut selected = current;
    egui::ComboBox::from_id_source(id)
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for span in ColumnSpan::ALL {
                ui.selectable_value(&mut selected, span, span.to_string());
            }
        });
    (selected != current).then_some(selected)
}

/// Optional length bound: a checkbox to enable it and a drag value.
fn length_bound(ui: &mut egui::Ui, label: &str, current: Option<u32>) -> Option<Option<u32>> {
    let mut enabled = current.is_some();
    let mut value = current.unwrap_or(0);
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui.checkbox(&mut enabled, label).changed();
        changed |= ui
            .add_enabled(enabled, egui::DragValue::new(&mut value).clamp_range(0..=10_000))
            .changed();
    });
    changed.then_some(enabled.then_some(value))
}

fn text_field_properties(
    ui: &mut egui::Ui,
    props: &TextFieldProps,
    mut patch: ElementPatch,
) -> ElementPatch {
    if let Some(v) = text_row(ui, "Placeholder", &props.placeholder, false) {
        patch = patch.placeholder(v);
    }
    if let Some(v) = text_row(ui, "Default Value", &props.default_value, false) {
        patch = patch.default_text(v);
    }
    if let Some(v) = length_bound(ui, "Min length", props.min_length) {
        patch = patch.min_length(v);
    }
    if let Some(v) = length_bound(ui, "Max length", props.max_length) {
        patch = patch.max_length(v);
    }
    patch
}

fn options_editor(
    ui: &mut egui::Ui,
    element: &FormElement,
    options: &[ChoiceOption],
) -> Option<Vec<ChoiceOption>> {
    ui.add_space(4.0);
    ui.label(egui::RichText::new("Options").strong());
    let mut result = None;

    for (index, option) in options.iter().enumerate() {
        ui.push_id((element.id.as_str(), index), |ui| {
            ui.horizontal(|ui| {
                let width = ((ui.available_width() - 40.0) / 2.0).max(40.0);
                let mut label = option.label.clone();
                let mut value = option.value.clone();
                if ui
                    .add(
                        egui::TextEdit::singleline(&mut label)
                            .hint_text("Label")
                            .desired_width(width),
                    )
                    .changed()
                {
                    result = Some(with_option_edited(options, index, Some(label), None));
                }
                if ui
                    .add(
                        egui::TextEdit::singleline(&mut value)
                            .hint_text("Value")
                            .desired_width(width),
                    )
                    .changed()
                {
                    result = Some(with_option_edited(options, index, None, Some(value)));
                }
                if ui.small_button("🗑").on_hover_text("Remove option").clicked() {
                    result = Some(with_option_removed(options, index));
                }
            });
        });
    }
    if ui.button("➕ Add Option").clicked() {
        result = Some(with_option_added(options));
    }
    ui.add_space(4.0);
    result
}

fn element_properties(ui: &mut egui::Ui, element: &FormElement) -> ElementPatch {
    let mut patch = ElementPatch::default();

    if let Some(v) = text_row(ui, "Label", &element.label, false) {
        patch = patch.label(v);
    }

    match &element.props {
        ElementProps::Text(p)
        | ElementProps::Textarea(p)
        | ElementProps::Number(p)
        | ElementProps::Email(p)
        | ElementProps::Password(p) => {
            patch = text_field_properties(ui, p, patch);
        }
        ElementProps::Checkbox(p) => {
            if let Some(options) = options_editor(ui, element, &p.options) {
                patch = patch.options(options);
            }
            if !p.options.is_empty() {
                ui.label("Checked by Default");
                for option in &p.options {
                    let mut on = p.default_value.contains(&option.value);
                    if ui.checkbox(&mut on, option.label.as_str()).changed() {
                        patch = patch.default_values(with_default_toggled(
                            &p.default_value,
                            &option.value,
                        ));
                    }
                }
                ui.add_space(4.0);
            }
        }
        ElementProps::Radio(p) => {
            if let Some(v) = text_row(ui, "Default Value", &p.default_value, false) {
                patch = patch.default_text(v);
            }
            if let Some(options) = options_editor(ui, element, &p.options) {
                patch = patch.options(options);
            }
        }
        ElementProps::Select(p) => {
            if let Some(v) = text_row(ui, "Default Value", &p.default_value, false) {
                patch = patch.default_text(v);
            }
            if let Some(options) = options_editor(ui, element, &p.options) {
                patch = patch.options(options);
            }
            let mut multiple = p.multiple;
            if ui.checkbox(&mut multiple, "Allow multiple selections").changed() {
                patch = patch.multiple(multiple);
            }
        }
        ElementProps::Date(p) | ElementProps::Time(p) => {
            if let Some(v) = text_row(ui, "Default Value", &p.default_value, false) {
                patch = patch.default_text(v);
            }
        }
        ElementProps::File(p) => {
            if let Some(v) = text_row(ui, "Accepted types", &p.accept, false) {
                patch = patch.accept(v);
            }
            let mut multiple = p.multiple;
            if ui.checkbox(&mut multiple, "Allow multiple selections").changed() {
                patch = patch.multiple(multiple);
            }
        }
        ElementProps::Heading(p) | ElementProps::Divider(p) | ElementProps::Spacer(p) => {
            if let Some(v) = text_row(ui, "Content", &p.content, false) {
                patch = patch.content(v);
            }
        }
        ElementProps::Paragraph(p) => {
            if let Some(v) = text_row(ui, "Content", &p.content, true) {
                patch = patch.content(v);
            }
        }
        ElementProps::Unrecognized(_) => {
            ui.label(
                egui::RichText::new("This element type is not supported by this editor.").weak(),
            );
        }
    }

    ui.add_space(4.0);
    let mut required = element.required;
    if ui.checkbox(&mut required, "Required").changed() {
        patch = patch.required(required);
    }

    ui.add_space(4.0);
    ui.label("Column Span");
    if let Some(span) = span_combo(ui, "element_column_span", element.column_span) {
        patch = patch.column_span(span);
    }
    patch
}

fn form_settings(ui: &mut egui::Ui, settings: &FormSettings) -> Option<SettingsPatch> {
    let mut patch = SettingsPatch::default();
    let mut changed = false;

    if let Some(v) = text_row(ui, "Form Title", &settings.title, false) {
        patch = patch.title(v);
        changed = true;
    }
    if let Some(v) = text_row(ui, "Form Description", &settings.description, true) {
        patch = patch.description(v);
        changed = true;
    }
    if let Some(v) = text_row(ui, "Submit Button Text", &settings.submit_button_text, false) {
        patch = patch.submit_button_text(v);
        changed = true;
    }
    if let Some(v) = text_row(ui, "Success Message", &settings.success_message, true) {
        patch = patch.success_message(v);
        changed = true;
    }
    ui.label("Number of Columns");
    if let Some(columns) = span_combo(ui, "form_columns", settings.layout.columns) {
        patch = patch.columns(columns);
        changed = true;
    }
    changed.then_some(patch)
}
