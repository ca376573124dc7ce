use eframe::egui;

use crate::app_state::AppState;
use crate::form::{ElementCategory, ElementKind};

/// Left panel listing every element kind by category. Clicking an entry
/// appends that kind's default element to the form.
pub fn show(ui: &mut egui::Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.heading("Form Elements");
    ui.label(egui::RichText::new("Click an element to add it to your form").weak());
    ui.separator();

    let mut picked: Option<ElementKind> = None;
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for category in ElementCategory::ALL {
                egui::CollapsingHeader::new(category.title())
                    .id_source(("palette", category.title()))
                    .default_open(true)
                    .show(ui, |ui| {
                        for kind in category.kinds() {
                            let text = format!("{}  {}", kind.icon(), kind.palette_label());
                            let button = egui::Button::new(text)
                                .frame(false)
                                .min_size(egui::vec2(ui.available_width(), 24.0));
                            if ui
                                .add(button)
                                .on_hover_text(format!("Add a {} element", kind.tag()))
                                .clicked()
                            {
                                picked = Some(kind);
                            }
                        }
                    });
            }
        });

    if let Some(kind) = picked {
        state.store.add_element(kind.default_element());
    }
}
