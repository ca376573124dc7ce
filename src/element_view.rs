//! Paints a `renderer::Visual` with egui widgets.
//!
//! In edit mode the widgets are drawn disabled over throwaway copies of the
//! defaults. In preview mode they edit `PreviewAnswers`, which is seeded from
//! each element's defaults the first time the element is shown and cleared
//! whenever preview is (re)entered or a submission completes.

use std::collections::HashMap;

use chrono::NaiveDate;
use eframe::egui;
use egui_extras::DatePickerButton;

use crate::form::{ElementId, FormElement};
use crate::renderer::{
    render, Caption, Choice, ChoiceStyle, InputType, RenderMode, Visual, UNRECOGNIZED_TEXT,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const REQUIRED_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 60, 60);

/// What the user typed or picked while previewing.
#[derive(Debug, Default)]
pub struct PreviewAnswers {
    text: HashMap<ElementId, String>,
    selections: HashMap<ElementId, Vec<String>>,
    files: HashMap<ElementId, Vec<String>>,
}

impl PreviewAnswers {
    pub fn clear(&mut self) {
        self.text.clear();
        self.selections.clear();
        self.files.clear();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.selections.is_empty() && self.files.is_empty()
    }

    /// Text answer for `id`, seeded with `seed` on first access.
    pub fn text(&mut self, id: &ElementId, seed: &str) -> &mut String {
        self.text
            .entry(id.clone())
            .or_insert_with(|| seed.to_string())
    }

    /// Selected option values for `id`, seeded from the checked choices.
    pub fn selection(&mut self, id: &ElementId, choices: &[Choice]) -> &mut Vec<String> {
        self.selections.entry(id.clone()).or_insert_with(|| {
            choices
                .iter()
                .filter(|c| c.checked)
                .map(|c| c.value.clone())
                .collect()
        })
    }

    /// File names picked for `id`.
    pub fn files(&mut self, id: &ElementId) -> &mut Vec<String> {
        self.files.entry(id.clone()).or_default()
    }
}

/// Adds `value` if missing, removes it otherwise.
pub fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(pos) = values.iter().position(|v| v == value) {
        values.remove(pos);
    } else {
        values.push(value.to_string());
    }
}

/// Extensions named in an `accept` filter (`".pdf, .png"` -> `["pdf", "png"]`).
/// MIME patterns such as `image/*` cannot be expressed in a native dialog
/// and are skipped.
pub fn accept_extensions(accept: &str) -> Vec<String> {
    accept
        .split(',')
        .map(str::trim)
        .filter_map(|part| part.strip_prefix('.'))
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_ascii_lowercase())
        .collect()
}

/// Paints `element` in `mode`.
pub fn show(
    ui: &mut egui::Ui,
    element: &FormElement,
    mode: RenderMode,
    answers: &mut PreviewAnswers,
) {
    let visual = render(element, mode);
    let id = &element.id;

    match visual {
        Visual::Input {
            caption,
            input_type,
            placeholder,
            value,
            enabled,
        } => {
            show_caption(ui, &caption);
            let mut scratch = value.clone();
            let text = if enabled {
                answers.text(id, &value)
            } else {
                &mut scratch
            };
            match input_type {
                InputType::Date => show_date(ui, id, text, enabled),
                _ => show_single_line(ui, input_type, &placeholder, text, enabled),
            }
        }
        Visual::TextArea {
            caption,
            placeholder,
            value,
            rows,
            enabled,
        } => {
            show_caption(ui, &caption);
            let mut scratch = value.clone();
            let text = if enabled {
                answers.text(id, &value)
            } else {
                &mut scratch
            };
            ui.add_enabled(
                enabled,
                egui::TextEdit::multiline(text)
                    .hint_text(placeholder)
                    .desired_rows(rows)
                    .desired_width(f32::INFINITY),
            );
        }
        Visual::ChoiceGroup {
            caption,
            style,
            group: _,
            choices,
            enabled,
        } => {
            show_caption(ui, &caption);
            let mut scratch: Vec<String> = choices
                .iter()
                .filter(|c| c.checked)
                .map(|c| c.value.clone())
                .collect();
            let selected = if enabled {
                answers.selection(id, &choices)
            } else {
                &mut scratch
            };
            for choice in &choices {
                let on = selected.contains(&choice.value);
                match style {
                    ChoiceStyle::Checkbox => {
                        let mut checked = on;
                        if ui
                            .add_enabled(
                                enabled,
                                egui::Checkbox::new(&mut checked, choice.label.as_str()),
                            )
                            .changed()
                        {
                            toggle(selected, &choice.value);
                        }
                    }
                    ChoiceStyle::Radio => {
                        if ui
                            .add_enabled(
                                enabled,
                                egui::RadioButton::new(on, choice.label.as_str()),
                            )
                            .clicked()
                        {
                            *selected = vec![choice.value.clone()];
                        }
                    }
                }
            }
        }
        Visual::Dropdown {
            caption,
            choices,
            multiple,
            enabled,
        } => {
            show_caption(ui, &caption);
            let mut scratch: Vec<String> = choices
                .iter()
                .filter(|c| c.checked)
                .map(|c| c.value.clone())
                .collect();
            let selected = if enabled {
                answers.selection(id, &choices)
            } else {
                &mut scratch
            };
            let summary = choices
                .iter()
                .filter(|c| selected.contains(&c.value))
                .map(|c| c.label.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            ui.add_enabled_ui(enabled, |ui| {
                egui::ComboBox::from_id_source(("dropdown", id.as_str()))
                    .selected_text(if summary.is_empty() {
                        "Select...".to_string()
                    } else {
                        summary
                    })
                    .width(ui.available_width().min(280.0))
                    .show_ui(ui, |ui| {
                        for choice in &choices {
                            let on = selected.contains(&choice.value);
                            if ui.selectable_label(on, choice.label.as_str()).clicked() {
                                if multiple {
                                    toggle(selected, &choice.value);
                                } else {
                                    *selected = vec![choice.value.clone()];
                                }
                            }
                        }
                    });
            });
        }
        Visual::FilePicker {
            caption,
            accept,
            multiple,
            helper,
            enabled,
        } => {
            show_caption(ui, &caption);
            let mut scratch = Vec::new();
            let picked = if enabled {
                answers.files(id)
            } else {
                &mut scratch
            };
            ui.horizontal(|ui| {
                let label = if multiple {
                    "📁 Choose files"
                } else {
                    "📁 Choose file"
                };
                if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                    *picked = pick_files(&accept, multiple);
                }
                if picked.is_empty() {
                    ui.label(egui::RichText::new(&helper).weak());
                } else {
                    ui.label(picked.join(", "));
                }
            });
            if accept != "*/*" && !accept.is_empty() {
                ui.label(
                    egui::RichText::new(format!("Accepted: {}", accept))
                        .small()
                        .weak(),
                );
            }
        }
        Visual::Heading(text) => {
            ui.heading(text);
        }
        Visual::Paragraph(text) => {
            ui.label(text);
        }
        Visual::Divider => {
            ui.separator();
        }
        Visual::Spacer { height } => {
            ui.add_space(height);
        }
        Visual::Unrecognized => {
            ui.colored_label(ui.visuals().warn_fg_color, UNRECOGNIZED_TEXT);
        }
    }
}

fn show_caption(ui: &mut egui::Ui, caption: &Caption) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 2.0;
        ui.label(egui::RichText::new(&caption.text).strong());
        if caption.required {
            ui.label(egui::RichText::new("*").color(REQUIRED_COLOR));
        }
    });
}

fn show_single_line(
    ui: &mut egui::Ui,
    input_type: InputType,
    placeholder: &str,
    text: &mut String,
    enabled: bool,
) {
    let hint = match input_type {
        InputType::Time if placeholder.is_empty() => "HH:MM",
        _ => placeholder,
    };
    let response = ui.add_enabled(
        enabled,
        egui::TextEdit::singleline(text)
            .hint_text(hint)
            .password(input_type == InputType::Password)
            .desired_width(f32::INFINITY),
    );
    if response.changed() && input_type == InputType::Number {
        text.retain(|c| c.is_ascii_digit() || c == '.' || c == '-');
    }
}

fn show_date(ui: &mut egui::Ui, id: &ElementId, text: &mut String, enabled: bool) {
    match NaiveDate::parse_from_str(text.trim(), DATE_FORMAT) {
        Ok(mut date) => {
            let before = date;
            ui.add_enabled(
                enabled,
                DatePickerButton::new(&mut date).id_source(id.as_str()),
            );
            if date != before {
                *text = date.format(DATE_FORMAT).to_string();
            }
        }
        Err(_) => {
            ui.horizontal(|ui| {
                ui.add_enabled(
                    enabled,
                    egui::TextEdit::singleline(text)
                        .hint_text("yyyy-mm-dd")
                        .desired_width(120.0),
                );
                if ui.add_enabled(enabled, egui::Button::new("📅")).clicked() {
                    *text = chrono::Local::now()
                        .date_naive()
                        .format(DATE_FORMAT)
                        .to_string();
                }
            });
        }
    }
}

fn pick_files(accept: &str, multiple: bool) -> Vec<String> {
    let extensions = accept_extensions(accept);
    let mut dialog = rfd::FileDialog::new();
    if !extensions.is_empty() {
        dialog = dialog.add_filter("Accepted files", &extensions);
    }
    let paths = if multiple {
        dialog.pick_files().unwrap_or_default()
    } else {
        dialog.pick_file().into_iter().collect()
    };
    paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}
