//! Pointer-driven reordering of canvas elements.
//!
//! A `DragSession` is a small state machine owned by the canvas:
//!
//! ```text
//! Idle --pointer_down--> Pending --moved >= 5px--> Dragging --pointer_up/cancel--> Idle
//! ```
//!
//! `Pending` keeps clicks (select / deselect) from turning into drags. While
//! dragging, a floating copy of the element follows the pointer, clamped to
//! the viewport, and the drop target is whichever slot's centre lies closest
//! to the centre of that copy. Only the final `Reorder` leaves the canvas;
//! the store never sees intermediate pointer positions.

use eframe::egui::{Pos2, Rect, Vec2};

use crate::form::ElementId;

/// Minimum pointer travel before a press becomes a drag.
pub const ACTIVATION_DISTANCE: f32 = 5.0;

/// Where an element currently sits on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub id: ElementId,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DragPhase {
    Idle,
    Pending {
        element: ElementId,
        origin: Pos2,
        source_rect: Rect,
    },
    Dragging {
        element: ElementId,
        /// Pointer position relative to the dragged card's top-left corner.
        grab_offset: Vec2,
        size: Vec2,
        pointer: Pos2,
        over: Option<ElementId>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragEvent {
    /// The press crossed the activation threshold.
    Started(ElementId),
    /// The nearest drop target changed.
    OverChanged(Option<ElementId>),
}

/// A committed splice-move, in document indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reorder {
    pub from: usize,
    pub to: usize,
}

#[derive(Clone, Debug)]
pub struct DragSession {
    phase: DragPhase,
    viewport: Rect,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(Rect::EVERYTHING)
    }
}

impl DragSession {
    pub fn new(viewport: Rect) -> Self {
        Self {
            phase: DragPhase::Idle,
            viewport,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DragPhase::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Element being dragged (not merely pressed).
    pub fn active(&self) -> Option<&ElementId> {
        match &self.phase {
            DragPhase::Dragging { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn over(&self) -> Option<&ElementId> {
        match &self.phase {
            DragPhase::Dragging { over, .. } => over.as_ref(),
            _ => None,
        }
    }

    /// Bounds the floating copy must stay within.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Press on an element's drag handle. Ignored unless idle.
    pub fn pointer_down(&mut self, element: ElementId, pos: Pos2, source_rect: Rect) {
        if self.is_idle() {
            self.phase = DragPhase::Pending {
                element,
                origin: pos,
                source_rect,
            };
        }
    }

    /// Feeds a pointer position. `slots` are the current on-screen element
    /// rects, including the dragged element's own home slot.
    pub fn pointer_move(&mut self, pos: Pos2, slots: &[Slot]) -> Option<DragEvent> {
        match &mut self.phase {
            DragPhase::Idle => None,
            DragPhase::Pending {
                element,
                origin,
                source_rect,
            } => {
                if origin.distance(pos) < ACTIVATION_DISTANCE {
                    return None;
                }
                let element = element.clone();
                let grab_offset = *origin - source_rect.min;
                let size = source_rect.size();
                self.phase = DragPhase::Dragging {
                    element: element.clone(),
                    grab_offset,
                    size,
                    pointer: pos,
                    over: None,
                };
                let over = self.nearest_slot(slots);
                if let DragPhase::Dragging { over: o, .. } = &mut self.phase {
                    *o = over;
                }
                Some(DragEvent::Started(element))
            }
            DragPhase::Dragging { pointer, .. } => {
                *pointer = pos;
                let nearest = self.nearest_slot(slots);
                if let DragPhase::Dragging { over, .. } = &mut self.phase {
                    if *over != nearest {
                        *over = nearest.clone();
                        return Some(DragEvent::OverChanged(nearest));
                    }
                }
                None
            }
        }
    }

    /// Screen rect of the floating copy, kept inside the viewport.
    pub fn overlay_rect(&self) -> Option<Rect> {
        match &self.phase {
            DragPhase::Dragging {
                grab_offset,
                size,
                pointer,
                ..
            } => Some(clamp_into(
                Rect::from_min_size(*pointer - *grab_offset, *size),
                self.viewport,
            )),
            _ => None,
        }
    }

    fn nearest_slot(&self, slots: &[Slot]) -> Option<ElementId> {
        let center = self.overlay_rect()?.center();
        closest_center(center, slots).map(|slot| slot.id.clone())
    }

    /// Release. Returns the reorder to commit, if the drop landed on a slot
    /// other than the source. `order` is the current document order. The
    /// session is idle afterwards no matter what.
    pub fn pointer_up(&mut self, order: &[ElementId]) -> Option<Reorder> {
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        let DragPhase::Dragging {
            element,
            over: Some(target),
            ..
        } = phase
        else {
            return None;
        };
        if element == target {
            return None;
        }
        let from = order.iter().position(|id| *id == element)?;
        let to = order.iter().position(|id| *id == target)?;
        Some(Reorder { from, to })
    }

    /// Gesture aborted (Escape, focus loss, element removed mid-drag).
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }
}

/// Slot whose centre is nearest `point`. Ties go to the earlier slot.
pub fn closest_center(point: Pos2, slots: &[Slot]) -> Option<&Slot> {
    slots.iter().min_by(|a, b| {
        let da = a.rect.center().distance_sq(point);
        let db = b.rect.center().distance_sq(point);
        da.total_cmp(&db)
    })
}

/// Translate `rect` so it lies within `bounds` (top-left wins when it is
/// larger than the bounds).
fn clamp_into(rect: Rect, bounds: Rect) -> Rect {
    let mut offset = Vec2::ZERO;
    if rect.right() > bounds.right() {
        offset.x = bounds.right() - rect.right();
    }
    if rect.left() + offset.x < bounds.left() {
        offset.x = bounds.left() - rect.left();
    }
    if rect.bottom() > bounds.bottom() {
        offset.y = bounds.bottom() - rect.bottom();
    }
    if rect.top() + offset.y < bounds.top() {
        offset.y = bounds.top() - rect.top();
    }
    rect.translate(offset)
}
