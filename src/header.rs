//! Top bar: form title, save, preview toggle and the form menu (rename,
//! reset, open saved form, JSON export/import).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui;
use tracing::{error, info};

use crate::app_state::{AppState, ToastType};
use crate::form::{FormDocument, FormId, SettingsPatch};

/// Writes `document` as pretty JSON to `path`.
pub fn export_document(document: &FormDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document).context("could not serialize form")?;
    fs::write(path, json).with_context(|| format!("could not write {}", path.display()))?;
    Ok(())
}

/// Reads a document previously written by [`export_document`].
pub fn import_document(path: &Path) -> Result<FormDocument> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a form file", path.display()))
}

/// Default file name for an export, derived from the form title.
pub fn export_file_name(title: &str) -> String {
    let mut slug = String::new();
    for c in title.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "form.json".to_string()
    } else {
        format!("{}.json", slug)
    }
}

pub fn show(ui: &mut egui::Ui, state: &mut AppState) {
    let now = ui.input(|i| i.time);

    ui.horizontal(|ui| {
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(state.store.document().settings.display_title())
                .size(18.0)
                .strong(),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.menu_button("⋮", |ui| form_menu(ui, state, now))
                .response
                .on_hover_text("More options");

            let toggle = if state.preview_mode {
                "✏ Edit Mode"
            } else {
                "👁 Preview"
            };
            if ui.button(toggle).clicked() {
                let preview = !state.preview_mode;
                state.set_preview_mode(preview);
            }

            if ui.button("💾").on_hover_text("Save").clicked() {
                save(state, now);
            }

            if let Some(status) = state.autosave.status() {
                ui.label(egui::RichText::new(status).small().weak());
            }
        });
    });

    if state.rename_input.is_some() {
        rename_dialog(ui.ctx(), state);
    }
}

fn save(state: &mut AppState, now: f64) {
    match state.store.persist() {
        Ok(()) => state.notify("Form saved", ToastType::Success, now),
        Err(err) => {
            error!(error = %err, "failed to save form");
            state.notify(format!("Save failed: {}", err), ToastType::Error, now);
        }
    }
}

fn form_menu(ui: &mut egui::Ui, state: &mut AppState, now: f64) {
    if ui.button("Rename Form").clicked() {
        state.rename_input = Some(state.store.document().settings.title.clone());
        ui.close_menu();
    }
    if ui.button("Reset Form").clicked() {
        state.store.reset_form();
        ui.close_menu();
    }

    ui.separator();
    ui.menu_button("Open Saved Form", |ui| {
        let saved = state.store.saved_forms();
        if saved.is_empty() {
            ui.label(egui::RichText::new("No saved forms").weak());
        }
        let current = state.store.document().id.clone();
        let mut chosen: Option<FormId> = None;
        let mut doomed: Option<FormId> = None;
        for form in saved {
            ui.horizontal(|ui| {
                let label = if form.id == current {
                    format!("{} (current)", form.title)
                } else {
                    form.title.clone()
                };
                if ui.button(label).on_hover_text(form.id.to_string()).clicked() {
                    chosen = Some(form.id.clone());
                }
                if ui.small_button("🗑").on_hover_text("Delete saved form").clicked() {
                    doomed = Some(form.id.clone());
                }
            });
        }
        if let Some(id) = doomed {
            state.store.delete_saved_form(&id);
            state.notify("Saved form deleted", ToastType::Info, now);
        }
        if let Some(id) = chosen {
            state.store.load_form(&id);
            ui.close_menu();
        }
    });

    ui.separator();
    if ui.button("Export as JSON").clicked() {
        ui.close_menu();
        export(state, now);
    }
    if ui.button("Import JSON").clicked() {
        ui.close_menu();
        import(state, now);
    }
}

fn export(state: &mut AppState, now: f64) {
    let document = state.store.document();
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Form", &["json"])
        .set_file_name(export_file_name(&document.settings.title))
        .save_file()
    else {
        return;
    };
    match export_document(document, &path) {
        Ok(()) => {
            info!(path = %path.display(), "form exported");
            state.notify("Form exported", ToastType::Success, now);
        }
        Err(err) => {
            error!("export failed: {:#}", err);
            state.notify(format!("Export failed: {:#}", err), ToastType::Error, now);
        }
    }
}

fn import(state: &mut AppState, now: f64) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Form", &["json"])
        .pick_file()
    else {
        return;
    };
    match import_document(&path) {
        Ok(document) => {
            info!(path = %path.display(), "form imported");
            state.store.import_document(document);
            state.notify("Form imported", ToastType::Success, now);
        }
        Err(err) => {
            error!("import failed: {:#}", err);
            state.notify(format!("Import failed: {:#}", err), ToastType::Error, now);
        }
    }
}

fn rename_dialog(ctx: &egui::Context, state: &mut AppState) {
    let Some(mut title) = state.rename_input.take() else {
        return;
    };
    let mut open = true;
    let mut commit = false;
    let mut cancel = false;

    egui::Window::new("Rename Form")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label("Enter a new title for your form:");
            let edit = ui.add(
                egui::TextEdit::singleline(&mut title)
                    .hint_text("Form Title")
                    .desired_width(280.0),
            );
            edit.request_focus();
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                commit = true;
            }
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    commit = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if commit {
        state.store.update_settings(SettingsPatch::default().title(title));
    } else if open && !cancel {
        state.rename_input = Some(title);
    }
}
