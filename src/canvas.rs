//! Edit-mode canvas: the form's elements laid out on the column grid as
//! selectable, deletable, draggable cards.
//!
//! Pointer handling is split in two. Widgets in this module only report
//! presses on a card's drag handle; the raw pointer is then fed into the
//! `DragSession` once per frame, which decides when a press becomes a drag
//! and where it would land. The store only sees the final move.

pub mod drag;
pub mod grid;

use eframe::egui;
use tracing::debug;

use crate::app_state::AppState;
use crate::element_view::{self, PreviewAnswers};
use crate::form::{ElementId, FormDocument, FormElement};
use crate::renderer::RenderMode;
use drag::{DragEvent, Slot};

const CARD_GAP: f32 = 12.0;
const HEADER_HEIGHT: f32 = 22.0;
const ACCENT: egui::Color32 = egui::Color32::from_rgb(33, 150, 243);

enum CardAction {
    Toggle(ElementId),
    Delete(ElementId),
    Press {
        element: ElementId,
        at: egui::Pos2,
    },
}

pub fn show(ui: &mut egui::Ui, state: &mut AppState) {
    state.drag.set_viewport(ui.ctx().screen_rect());

    let mut actions: Vec<CardAction> = Vec::new();
    let mut slots: Vec<Slot> = Vec::new();
    let mut background_clicked = false;

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .drag_to_scroll(false)
        .show(ui, |ui| {
            let background = ui.interact(
                ui.max_rect(),
                ui.id().with("canvas_background"),
                egui::Sense::click(),
            );
            background_clicked = background.clicked();

            let document = state.store.document();
            show_title(ui, document);

            if document.elements.is_empty() {
                show_empty_state(ui);
                return;
            }

            let view = CardView {
                selected: state.store.selected_element_id(),
                dragging: state.store.is_dragging(),
                active: state.drag.active(),
                over: state.drag.over(),
            };
            let spans: Vec<u8> = document.elements.iter().map(|e| e.column_span.get()).collect();
            let mut scratch = PreviewAnswers::default();
            let rects = grid::show_rows(
                ui,
                &spans,
                document.settings.layout.columns.get(),
                CARD_GAP,
                |ui, index| {
                    let element = &document.elements[index];
                    if let Some(action) = show_card(ui, element, &view, &mut scratch) {
                        actions.push(action);
                    }
                },
            );
            slots = document
                .elements
                .iter()
                .zip(rects)
                .map(|(e, rect)| Slot {
                    id: e.id.clone(),
                    rect,
                })
                .collect();
        });

    apply_actions(state, actions, &slots, background_clicked);
    track_pointer(ui, state, &slots);
    show_drag_overlay(ui.ctx(), state);
}

struct CardView<'a> {
    selected: Option<&'a ElementId>,
    dragging: bool,
    active: Option<&'a ElementId>,
    over: Option<&'a ElementId>,
}

fn show_title(ui: &mut egui::Ui, document: &FormDocument) {
    let settings = &document.settings;
    ui.add_space(4.0);
    ui.heading(settings.display_title());
    if !settings.description.is_empty() {
        ui.label(egui::RichText::new(&settings.description).weak());
    }
    ui.add_space(16.0);
}

fn show_empty_state(ui: &mut egui::Ui) {
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 200.0), egui::Sense::hover());
    let stroke = egui::Stroke::new(2.0, ui.visuals().weak_text_color());
    ui.painter()
        .rect(rect, 6.0, ui.visuals().faint_bg_color, stroke);
    ui.painter().text(
        rect.center() - egui::vec2(0.0, 14.0),
        egui::Align2::CENTER_CENTER,
        "Your form is empty",
        egui::FontId::proportional(18.0),
        ui.visuals().weak_text_color(),
    );
    ui.painter().text(
        rect.center() + egui::vec2(0.0, 14.0),
        egui::Align2::CENTER_CENTER,
        "Click on elements from the left panel to add them to your form",
        egui::FontId::proportional(14.0),
        ui.visuals().weak_text_color(),
    );
}

/// Screen rects of the controls in a card's header.
#[derive(Clone, Copy, Debug)]
struct CardControls {
    handle: egui::Rect,
    delete: egui::Rect,
}

fn show_card(
    ui: &mut egui::Ui,
    element: &FormElement,
    view: &CardView<'_>,
    scratch: &mut PreviewAnswers,
) -> Option<CardAction> {
    let selected = view.selected == Some(&element.id);
    let is_active = view.active == Some(&element.id);
    let is_target = !is_active && view.over == Some(&element.id);
    let show_header = selected || view.dragging;

    let stroke = if selected || is_target {
        egui::Stroke::new(2.0, ACCENT)
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke
    };

    let mut controls: Option<CardControls> = None;

    let frame = egui::Frame::group(ui.style())
        .fill(ui.visuals().window_fill)
        .stroke(stroke)
        .rounding(6.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.push_id(element.id.as_str(), |ui| {
                let (header_rect, _) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), HEADER_HEIGHT),
                    egui::Sense::hover(),
                );
                if show_header {
                    if selected {
                        ui.painter()
                            .rect_filled(header_rect, 4.0, ACCENT.gamma_multiply(0.12));
                    }
                    let mut header = ui.child_ui(
                        header_rect,
                        egui::Layout::left_to_right(egui::Align::Center),
                    );
                    let handle = header.add(egui::Label::new("⠿").selectable(false));
                    let delete = header
                        .with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let delete = ui.small_button("🗑");
                            let icon = element.kind().map(|k| k.icon()).unwrap_or("❓");
                            let tag = format!("{} {}", icon, element.props.tag());
                            ui.add(
                                egui::Label::new(egui::RichText::new(tag).small())
                                    .selectable(false),
                            );
                            delete.rect
                        })
                        .inner;
                    controls = Some(CardControls {
                        handle: handle.rect,
                        delete,
                    });
                }
                element_view::show(ui, element, RenderMode::Edit, scratch);
            });
        });

    let rect = frame.response.rect;
    if is_active {
        // the floating copy carries the element; dim what stays behind
        ui.painter()
            .rect_filled(rect, 6.0, ui.visuals().panel_fill.gamma_multiply(0.5));
    }

    // The card sense goes on top so a click anywhere on it, disabled inputs
    // included, selects it. That hides the header controls from egui's hit
    // test, so they are checked against the raw pointer instead.
    let card = ui.interact(
        rect,
        ui.id().with(("card", element.id.as_str())),
        egui::Sense::click(),
    );

    #[cfg(test)]
    ui.ctx().data_mut(|d| {
        d.insert_temp(
            tests::card_rects_id(&element.id),
            tests::CardRects { card: rect, controls },
        )
    });

    let Some(controls) = controls else {
        return card
            .clicked()
            .then(|| CardAction::Toggle(element.id.clone()));
    };
    if ui.rect_contains_pointer(controls.handle) {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
    }
    if let Some(at) = pressed_in(ui, controls.handle) {
        return Some(CardAction::Press {
            element: element.id.clone(),
            at,
        });
    }
    if clicked_in(ui, controls.delete) {
        return Some(CardAction::Delete(element.id.clone()));
    }
    let on_controls =
        ui.rect_contains_pointer(controls.handle) || ui.rect_contains_pointer(controls.delete);
    (card.clicked() && !on_controls).then(|| CardAction::Toggle(element.id.clone()))
}

/// Pointer position of a primary press that landed in `rect` this frame.
fn pressed_in(ui: &egui::Ui, rect: egui::Rect) -> Option<egui::Pos2> {
    let pressed = ui.input(|i| i.pointer.primary_pressed());
    if pressed && ui.rect_contains_pointer(rect) {
        ui.input(|i| i.pointer.interact_pos())
    } else {
        None
    }
}

/// A primary click (press and release without travel) ending in `rect`.
fn clicked_in(ui: &egui::Ui, rect: egui::Rect) -> bool {
    let clicked = ui.input(|i| i.pointer.primary_released() && i.pointer.any_click());
    clicked && ui.rect_contains_pointer(rect)
}

fn apply_actions(
    state: &mut AppState,
    actions: Vec<CardAction>,
    slots: &[Slot],
    background_clicked: bool,
) {
    if actions.is_empty() && background_clicked && state.drag.is_idle() {
        state.store.set_selected_element_id(None);
        return;
    }
    for action in actions {
        match action {
            CardAction::Toggle(id) => {
                let next = if state.store.selected_element_id() == Some(&id) {
                    None
                } else {
                    Some(id)
                };
                state.store.set_selected_element_id(next);
            }
            CardAction::Delete(id) => state.store.remove_element(&id),
            CardAction::Press { element, at } => {
                if let Some(slot) = slots.iter().find(|s| s.id == element) {
                    debug!(element = %element, "drag handle pressed");
                    state.drag.pointer_down(element, at, slot.rect);
                }
            }
        }
    }
}

fn track_pointer(ui: &egui::Ui, state: &mut AppState, slots: &[Slot]) {
    if state.drag.is_idle() {
        return;
    }

    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        debug!("drag cancelled");
        state.drag.cancel();
        state.store.set_is_dragging(false);
        return;
    }

    if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
        match state.drag.pointer_move(pos, slots) {
            Some(DragEvent::Started(id)) => {
                debug!(element = %id, "drag started");
                state.store.set_is_dragging(true);
            }
            Some(DragEvent::OverChanged(over)) => {
                debug!(over = ?over.as_ref().map(ElementId::as_str), "drop target changed");
            }
            None => {}
        }
    }
    if state.drag.is_dragging() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    }

    if !ui.input(|i| i.pointer.primary_down()) {
        let order = state.store.document().order();
        if let Some(reorder) = state.drag.pointer_up(&order) {
            debug!(from = reorder.from, to = reorder.to, "drop");
            state.store.move_element(reorder.from, reorder.to);
        }
        state.store.set_is_dragging(false);
    }
    ui.ctx().request_repaint();
}

fn show_drag_overlay(ctx: &egui::Context, state: &AppState) {
    let (Some(rect), Some(id)) = (state.drag.overlay_rect(), state.drag.active()) else {
        return;
    };
    let Some(element) = state.store.document().element(id) else {
        return;
    };

    egui::Area::new(egui::Id::new("canvas_drag_overlay"))
        .order(egui::Order::Tooltip)
        .fixed_pos(rect.min)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .stroke(egui::Stroke::new(2.0, ACCENT))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.set_width(rect.width() - 20.0);
                    let mut scratch = PreviewAnswers::default();
                    element_view::show(ui, element, RenderMode::Edit, &mut scratch);
                });
        });
}
