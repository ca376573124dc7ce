// Small collection of flags and timestamps behind "save shortly after the
// user stops editing". The app feeds it store events and the frame clock;
// it answers whether a write is due and remembers how the last one went.

use super::form_store::StoreEvent;

#[derive(Debug, Default)]
pub struct AutosaveState {
    /// Wall-clock time (seconds) of the last edit that still needs writing.
    /// `None` means nothing has been edited since the last save.
    pub last_edit_time: Option<f64>,
    /// True while there are unsaved edits.
    pub pending: bool,
    /// Timestamp of the last successful write, for the header indicator.
    pub last_success_time: Option<f64>,
    /// Message from the last failed write, if any.
    pub error: Option<String>,
}

impl AutosaveState {
    pub fn mark_dirty(&mut self, now: f64) {
        self.last_edit_time = Some(now);
        self.pending = true;
    }

    /// Folds one store event into the state.
    pub fn observe(&mut self, event: &StoreEvent, now: f64) {
        match event {
            StoreEvent::FormSaved(_) => self.record_success(now),
            // a freshly loaded document matches its slot, and a blank one
            // has nothing to keep
            StoreEvent::FormLoaded(_) | StoreEvent::FormReset(_) => {
                self.pending = false;
                self.last_edit_time = None;
            }
            e if e.touches_document() => self.mark_dirty(now),
            _ => {}
        }
    }

    /// Whether a write should happen now: there are pending edits, and
    /// `cooldown` seconds have passed since the last one.
    pub fn due(&self, now: f64, cooldown: f64) -> bool {
        match self.last_edit_time {
            Some(last_edit) if self.pending => now - last_edit >= cooldown,
            _ => false,
        }
    }

    pub fn record_success(&mut self, now: f64) {
        self.pending = false;
        self.last_edit_time = None;
        self.last_success_time = Some(now);
        self.error = None;
    }

    /// A failed write keeps the edits pending but waits for the next edit
    /// before trying again.
    pub fn record_failure(&mut self, message: String) {
        self.last_edit_time = None;
        self.error = Some(message);
    }

    /// Short status line for the header.
    pub fn status(&self) -> Option<String> {
        if let Some(err) = &self.error {
            return Some(format!("⚠ Autosave failed: {}", err));
        }
        if self.pending {
            Some("● Unsaved changes".to_string())
        } else if self.last_success_time.is_some() {
            Some("✔ Saved".to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{ElementId, FormId};

    #[test]
    fn edits_become_due_after_cooldown() {
        let mut a = AutosaveState::default();
        assert!(!a.due(10.0, 2.0));
        a.observe(&StoreEvent::ElementAdded(ElementId::from("x")), 10.0);
        assert!(!a.due(11.0, 2.0));
        a.observe(&StoreEvent::SettingsUpdated, 11.0);
        assert!(!a.due(12.5, 2.0));
        assert!(a.due(13.0, 2.0));
    }

    #[test]
    fn selection_and_drag_events_do_not_dirty() {
        let mut a = AutosaveState::default();
        a.observe(&StoreEvent::SelectionChanged(None), 1.0);
        a.observe(&StoreEvent::DraggingChanged(true), 1.0);
        assert!(!a.pending);
        assert_eq!(a.status(), None);
    }

    #[test]
    fn save_event_clears_pending_and_error() {
        let mut a = AutosaveState::default();
        a.mark_dirty(1.0);
        a.record_failure("disk full".into());
        assert!(a.status().unwrap().contains("disk full"));
        assert!(!a.due(100.0, 2.0));

        a.observe(&StoreEvent::FormSaved(FormId::from("f")), 5.0);
        assert!(!a.pending);
        assert_eq!(a.error, None);
        assert_eq!(a.last_success_time, Some(5.0));
        assert_eq!(a.status().as_deref(), Some("✔ Saved"));
    }

    #[test]
    fn loading_discards_pending_edits() {
        let mut a = AutosaveState::default();
        a.mark_dirty(1.0);
        a.observe(&StoreEvent::FormLoaded(FormId::from("f")), 2.0);
        assert!(!a.due(10.0, 2.0));
    }

    #[test]
    fn reset_leaves_nothing_to_save() {
        let mut a = AutosaveState::default();
        a.observe(&StoreEvent::ElementAdded(ElementId::from("x")), 1.0);
        a.observe(&StoreEvent::FormReset(FormId::from("g")), 1.5);
        assert!(!a.pending);
        assert!(!a.due(10.0, 2.0));
    }
}
