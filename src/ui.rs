use crate::app_state::{AppState, ToastType};
use crate::{canvas, header, palette, preview, properties_panel};
use eframe::egui;
use std::time::Duration;
use tracing::info;

pub struct FormcraftApp {
    state: AppState,
}

pub fn create_app(state: AppState) -> FormcraftApp {
    FormcraftApp { state }
}

impl eframe::App for FormcraftApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = &mut self.state;
        let now = ctx.input(|i| i.time);

        if let Some(wake) = state.tick(now) {
            ctx.request_repaint_after(Duration::from_secs_f64(wake));
        }

        // flush pending edits before the window goes away
        if ctx.input(|i| i.viewport().close_requested()) && state.autosave.pending {
            info!("saving before exit");
            state.store.save_form();
        }

        // 1. Header (Top)
        egui::TopBottomPanel::top("header_panel")
            .exact_height(40.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                header::show(ui, state);
            });

        if state.preview_mode {
            egui::CentralPanel::default().show(ctx, |ui| {
                preview::show(ui, state);
            });
        } else {
            // 2. Palette (Left)
            egui::SidePanel::left("palette_panel")
                .resizable(true)
                .default_width(220.0)
                .min_width(180.0)
                .show(ctx, |ui| {
                    palette::show(ui, state);
                });

            // 3. Properties (Right)
            egui::SidePanel::right("properties_panel")
                .resizable(true)
                .default_width(300.0)
                .min_width(240.0)
                .show(ctx, |ui| {
                    properties_panel::show(ui, state);
                });

            // 4. Canvas (Central Panel takes remaining space)
            let canvas_frame = egui::Frame::central_panel(&ctx.style())
                .fill(ctx.style().visuals.faint_bg_color);
            egui::CentralPanel::default()
                .frame(canvas_frame)
                .show(ctx, |ui| {
                    canvas::show(ui, state);
                });
        }

        // Toast Notification
        if let Some(msg) = &state.toast_message {
            let bg_color = match state.toast_type {
                ToastType::Error => egui::Color32::from_rgb(200, 50, 50),
                ToastType::Success => egui::Color32::from_rgb(50, 150, 50),
                ToastType::Info => egui::Color32::from_gray(80),
            };

            egui::Area::new("toast_notification")
                .order(egui::Order::Tooltip)
                .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -40.0))
                .show(ctx, |ui| {
                    egui::Frame::none()
                        .fill(bg_color)
                        .rounding(8.0)
                        .stroke(egui::Stroke::new(1.0, egui::Color32::from_white_alpha(50)))
                        .inner_margin(12.0)
                        .shadow(egui::epaint::Shadow::small_dark())
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(msg)
                                    .color(egui::Color32::WHITE)
                                    .size(16.0),
                            );
                        });
                });
        }
    }
}
