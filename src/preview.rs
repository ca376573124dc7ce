//! Preview mode: the form as a respondent would see it, with a simulated
//! submission. Nothing is transmitted; the submit button waits a moment and
//! then the success message is shown as a toast.

use eframe::egui;
use tracing::info;

use crate::app_state::{AppState, ToastType};
use crate::canvas::grid;
use crate::element_view;
use crate::form::FormSettings;
use crate::renderer::RenderMode;

const DEFAULT_SUBMIT_TEXT: &str = "Submit";
const DEFAULT_SUCCESS_MESSAGE: &str = "Form submitted successfully!";
const SUBMITTING_TEXT: &str = "Submitting...";
const GRID_GAP: f32 = 16.0;
const MAX_FORM_WIDTH: f32 = 1000.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting {
        started: f64,
    },
}

impl SubmitState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting { .. })
    }

    /// Starts a submission. Returns false if one is already running.
    pub fn start(&mut self, now: f64) -> bool {
        if self.is_submitting() {
            return false;
        }
        *self = SubmitState::Submitting { started: now };
        true
    }

    /// Advances the clock. Returns true exactly once, on the frame the
    /// submission completes.
    pub fn tick(&mut self, now: f64, delay: f64) -> bool {
        match *self {
            SubmitState::Submitting { started } if now - started >= delay => {
                *self = SubmitState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Seconds left before completion, for scheduling a repaint.
    pub fn remaining(&self, now: f64, delay: f64) -> Option<f64> {
        match *self {
            SubmitState::Submitting { started } => Some((started + delay - now).max(0.0)),
            SubmitState::Idle => None,
        }
    }

    pub fn button_text(&self, settings: &FormSettings) -> String {
        if self.is_submitting() {
            SUBMITTING_TEXT.to_string()
        } else if settings.submit_button_text.trim().is_empty() {
            DEFAULT_SUBMIT_TEXT.to_string()
        } else {
            settings.submit_button_text.clone()
        }
    }
}

pub fn success_message(settings: &FormSettings) -> String {
    if settings.success_message.trim().is_empty() {
        DEFAULT_SUCCESS_MESSAGE.to_string()
    } else {
        settings.success_message.clone()
    }
}

/// Completes a running submission once its delay has elapsed.
pub fn tick(state: &mut AppState, now: f64) {
    if state.submit.tick(now, state.config.submit_delay_secs) {
        let message = success_message(&state.store.document().settings);
        info!(form = %state.store.document().id, "form submitted (simulated)");
        state.answers.clear();
        let secs = state.config.success_toast_secs;
        state.show_toast(message, ToastType::Success, now, secs);
    }
}

pub fn show(ui: &mut egui::Ui, state: &mut AppState) {
    let now = ui.input(|i| i.time);

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            let width = ui.available_width().min(MAX_FORM_WIDTH);
            ui.vertical_centered(|ui| {
                ui.set_max_width(width);
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().window_fill)
                    .rounding(8.0)
                    .inner_margin(24.0)
                    .show(ui, |ui| {
                        ui.with_layout(egui::Layout::top_down(egui::Align::LEFT), |ui| {
                            show_form(ui, state, now);
                        });
                    });
            });
        });

    if let Some(left) = state.submit.remaining(now, state.config.submit_delay_secs) {
        ui.ctx()
            .request_repaint_after(std::time::Duration::from_secs_f64(left));
    }
}

fn show_form(ui: &mut egui::Ui, state: &mut AppState, now: f64) {
    let AppState {
        store,
        answers,
        submit,
        ..
    } = state;
    let document = store.document();
    let settings = &document.settings;

    ui.heading(egui::RichText::new(settings.display_title()).size(26.0));
    if !settings.description.is_empty() {
        ui.label(egui::RichText::new(&settings.description).weak());
    }
    ui.add_space(20.0);

    let spans: Vec<u8> = document.elements.iter().map(|e| e.column_span.get()).collect();
    grid::show_rows(
        ui,
        &spans,
        settings.layout.columns.get(),
        GRID_GAP,
        |ui, index| {
            element_view::show(ui, &document.elements[index], RenderMode::Preview, answers);
        },
    );

    ui.add_space(12.0);
    let label = submit.button_text(settings);
    let mut clicked = false;
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        let button = egui::Button::new(egui::RichText::new(label).size(16.0))
            .min_size(egui::vec2(120.0, 36.0));
        clicked = ui.add_enabled(!submit.is_submitting(), button).clicked();
    });
    if clicked && submit.start(now) {
        info!(form = %document.id, "submitting form");
    }
}
