use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, error};

use crate::canvas::drag::DragSession;
use crate::config::EditorConfig;
use crate::element_view::PreviewAnswers;
use crate::preview::SubmitState;
use crate::states::{AutosaveState, FormStore, StoreEvent};
use crate::storage::FormStorage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastType {
    Info,
    Success,
    Error,
}

pub struct AppState {
    pub config: EditorConfig,
    pub store: FormStore,
    pub autosave: AutosaveState,
    pub drag: DragSession,

    pub preview_mode: bool,
    pub answers: PreviewAnswers,
    pub submit: SubmitState,

    pub toast_message: Option<String>,
    pub toast_type: ToastType,
    pub toast_deadline: f64,

    /// Title being typed in the rename dialog; `Some` while it is open.
    pub rename_input: Option<String>,

    // filled by the store subscription, drained every frame
    store_events: Rc<RefCell<VecDeque<StoreEvent>>>,
}

impl AppState {
    pub fn new(config: EditorConfig, storage: Box<dyn FormStorage>) -> Self {
        let mut store = FormStore::new(storage);
        let store_events = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&store_events);
        store.subscribe(move |event: &StoreEvent| sink.borrow_mut().push_back(event.clone()));

        Self {
            config,
            store,
            autosave: AutosaveState::default(),
            drag: DragSession::default(),
            preview_mode: false,
            answers: PreviewAnswers::default(),
            submit: SubmitState::default(),
            toast_message: None,
            toast_type: ToastType::Info,
            toast_deadline: 0.0,
            rename_input: None,
            store_events,
        }
    }

    pub fn show_toast(
        &mut self,
        message: impl Into<String>,
        kind: ToastType,
        now: f64,
        secs: f64,
    ) {
        self.toast_message = Some(message.into());
        self.toast_type = kind;
        self.toast_deadline = now + secs;
    }

    /// Short-lived notification for save/import/export results.
    pub fn notify(&mut self, message: impl Into<String>, kind: ToastType, now: f64) {
        let secs = self.config.status_toast_secs;
        self.show_toast(message, kind, now, secs);
    }

    pub fn set_preview_mode(&mut self, on: bool) {
        if self.preview_mode == on {
            return;
        }
        self.preview_mode = on;
        self.submit = SubmitState::Idle;
        if on {
            self.answers.clear();
            self.drag.cancel();
            self.store.set_is_dragging(false);
        }
        debug!(preview = on, "mode switched");
    }

    /// Per-frame housekeeping: folds store events into the autosave state,
    /// runs a due autosave and expires the toast. Returns how long until the
    /// next time-based change, if any.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let events: Vec<StoreEvent> = self.store_events.borrow_mut().drain(..).collect();
        for event in &events {
            self.autosave.observe(event, now);
            if let StoreEvent::ElementRemoved(id) = event {
                if self.drag.active() == Some(id) {
                    self.drag.cancel();
                    self.store.set_is_dragging(false);
                }
            }
        }

        let cooldown = self.config.autosave_cooldown_secs;
        if self.config.autosave && self.autosave.due(now, cooldown) {
            match self.store.persist() {
                Ok(()) => self.autosave.record_success(now),
                Err(err) => {
                    error!(error = %err, "autosave failed");
                    self.autosave.record_failure(err.to_string());
                }
            }
        }

        if self.toast_message.is_some() && now > self.toast_deadline {
            self.toast_message = None;
        }

        crate::preview::tick(self, now);

        let mut wake: Option<f64> = None;
        let mut consider = |t: f64| wake = Some(wake.map_or(t, |w: f64| w.min(t)));
        if self.config.autosave && self.autosave.pending {
            if let Some(last) = self.autosave.last_edit_time {
                consider((last + cooldown - now).max(0.0));
            }
        }
        if self.toast_message.is_some() {
            consider((self.toast_deadline - now).max(0.0));
        }
        if let Some(left) = self.submit.remaining(now, self.config.submit_delay_secs) {
            consider(left);
        }
        wake
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{ElementKind, FormDocument};
    use crate::storage::{MemoryStorage, StorageError};

    fn app() -> AppState {
        AppState::new(EditorConfig::default(), Box::new(MemoryStorage::new()))
    }

    struct BrokenStorage;

    impl FormStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "read-only"),
            })
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
        fn keys(&self) -> Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn edits_are_autosaved_after_the_cooldown() {
        let mut app = app();
        app.store.add_element(ElementKind::Text.default_element());
        let wake = app.tick(1.0);
        assert_eq!(wake, Some(2.0));
        assert!(app.autosave.pending);

        app.tick(2.0);
        assert!(app.store.saved_forms().is_empty());

        app.tick(3.0);
        assert!(!app.autosave.pending);
        let id = app.store.document().id.clone();
        let saved: Vec<_> = app.store.saved_forms().into_iter().map(|f| f.id).collect();
        assert_eq!(saved, vec![id]);
        assert_eq!(app.autosave.status().as_deref(), Some("✔ Saved"));
    }

    #[test]
    fn disabled_autosave_never_writes() {
        let mut config = EditorConfig::default();
        config.autosave = false;
        let mut app = AppState::new(config, Box::new(MemoryStorage::new()));
        app.store.add_element(ElementKind::Divider.default_element());
        app.tick(0.0);
        assert_eq!(app.tick(100.0), None);
        assert!(app.store.saved_forms().is_empty());
    }

    #[test]
    fn autosave_failure_is_reported() {
        let mut app = AppState::new(EditorConfig::default(), Box::new(BrokenStorage));
        app.store.add_element(ElementKind::Email.default_element());
        app.tick(0.0);
        app.tick(5.0);
        let status = app.autosave.status().unwrap_or_default();
        assert!(status.contains("read-only"), "{}", status);
        assert!(app.autosave.pending);
    }

    #[test]
    fn reset_does_not_autosave_a_blank_form() {
        let mut app = app();
        app.store.add_element(ElementKind::Text.default_element());
        app.tick(0.0);
        app.store.reset_form();
        app.tick(0.5);
        assert_eq!(app.tick(10.0), None);
        assert!(app.store.saved_forms().is_empty());
        assert_eq!(app.autosave.status(), None);
    }

    #[test]
    fn toast_expires() {
        let mut app = app();
        app.show_toast("hello", ToastType::Info, 0.0, 3.0);
        assert_eq!(app.tick(1.0), Some(2.0));
        app.tick(3.5);
        assert_eq!(app.toast_message, None);
    }

    #[test]
    fn removing_the_dragged_element_cancels_the_drag() {
        use eframe::egui::{pos2, vec2, Rect};
        let mut app = app();
        let id = app.store.add_element(ElementKind::Text.default_element());
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 40.0));
        app.drag.pointer_down(id.clone(), rect.center(), rect);
        app.drag.pointer_move(rect.center() + vec2(0.0, 20.0), &[]);
        assert!(app.drag.is_dragging());

        app.store.remove_element(&id);
        app.tick(0.0);
        assert!(app.drag.is_idle());
    }

    #[test]
    fn entering_preview_resets_answers_and_submission() {
        let mut app = app();
        app.store.import_document(FormDocument::new());
        app.answers.text(&"x".into(), "typed");
        app.submit.start(0.0);
        app.set_preview_mode(true);
        assert!(app.answers.is_empty());
        assert!(!app.submit.is_submitting());
    }
}
