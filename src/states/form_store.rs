//! The editor's single source of truth for the form being built.
//!
//! `FormStore` owns the document, the selection cursor and the dragging
//! flag. Every component receives it by `&mut` from the app shell; nothing
//! reaches it through a global. Mutations are applied synchronously and then
//! announced to subscribers as a `StoreEvent`.
//!
//! None of the operations fail from the caller's point of view: unknown ids
//! are ignored and storage problems are logged and swallowed.

use tracing::{debug, error, info, warn};

use crate::form::{
    ElementId, ElementPatch, FormDocument, FormElement, FormId, NewElement, SettingsPatch,
};
use crate::storage::{form_id_from_key, form_key, FormStorage, StorageError};

#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    ElementAdded(ElementId),
    ElementUpdated(ElementId),
    ElementRemoved(ElementId),
    ElementMoved { from: usize, to: usize },
    SelectionChanged(Option<ElementId>),
    DraggingChanged(bool),
    SettingsUpdated,
    FormReset(FormId),
    FormSaved(FormId),
    FormLoaded(FormId),
}

impl StoreEvent {
    /// True for events that change the persisted document.
    pub fn touches_document(&self) -> bool {
        match self {
            StoreEvent::ElementAdded(_)
            | StoreEvent::ElementUpdated(_)
            | StoreEvent::ElementRemoved(_)
            | StoreEvent::ElementMoved { .. }
            | StoreEvent::SettingsUpdated => true,
            // a blank form is not worth a slot until something is added
            StoreEvent::FormReset(_)
            | StoreEvent::SelectionChanged(_)
            | StoreEvent::DraggingChanged(_)
            | StoreEvent::FormSaved(_)
            | StoreEvent::FormLoaded(_) => false,
        }
    }
}

/// A form with a persisted slot, as listed in the "open" menu.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedForm {
    pub id: FormId,
    pub title: String,
}

type Listener = Box<dyn FnMut(&StoreEvent)>;

pub struct FormStore {
    document: FormDocument,
    selected_element_id: Option<ElementId>,
    is_dragging: bool,
    storage: Box<dyn FormStorage>,
    listeners: Vec<Listener>,
}

impl FormStore {
    pub fn new(storage: Box<dyn FormStorage>) -> Self {
        Self {
            document: FormDocument::new(),
            selected_element_id: None,
            is_dragging: false,
            storage,
            listeners: Vec::new(),
        }
    }

    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn selected_element_id(&self) -> Option<&ElementId> {
        self.selected_element_id.as_ref()
    }

    pub fn selected_element(&self) -> Option<&FormElement> {
        self.selected_element_id
            .as_ref()
            .and_then(|id| self.document.element(id))
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    // ── subscriptions ────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: StoreEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    // ── transient flags ──────────────────────────────────────────────────

    pub fn set_selected_element_id(&mut self, id: Option<ElementId>) {
        if self.selected_element_id == id {
            return;
        }
        self.selected_element_id = id.clone();
        self.emit(StoreEvent::SelectionChanged(id));
    }

    pub fn set_is_dragging(&mut self, dragging: bool) {
        if self.is_dragging == dragging {
            return;
        }
        self.is_dragging = dragging;
        self.emit(StoreEvent::DraggingChanged(dragging));
    }

    // ── element CRUD ─────────────────────────────────────────────────────

    /// Appends `new` at the end of the form and returns its fresh id.
    pub fn add_element(&mut self, new: NewElement) -> ElementId {
        let mut id = ElementId::generate();
        while self.document.index_of(&id).is_some() {
            id = ElementId::generate();
        }
        debug!(element = %id, kind = new.props.tag(), "adding element");
        self.document
            .elements
            .push(FormElement::from_new(id.clone(), new));
        self.emit(StoreEvent::ElementAdded(id.clone()));
        id
    }

    pub fn update_element(&mut self, id: &ElementId, patch: ElementPatch) {
        match self.document.element_mut(id) {
            Some(element) => {
                patch.apply_to(element);
                self.emit(StoreEvent::ElementUpdated(id.clone()));
            }
            None => debug!(element = %id, "update ignored: no such element"),
        }
    }

    pub fn remove_element(&mut self, id: &ElementId) {
        let Some(index) = self.document.index_of(id) else {
            debug!(element = %id, "remove ignored: no such element");
            return;
        };
        self.document.elements.remove(index);
        self.emit(StoreEvent::ElementRemoved(id.clone()));
        if self.selected_element_id.as_ref() == Some(id) {
            self.set_selected_element_id(None);
        }
    }

    /// Splice-move: take the element at `from` out, then insert it at `to`
    /// in the shortened list.
    ///
    /// `from` past the end is rejected; `to` is clamped to the last slot.
    pub fn move_element(&mut self, from: usize, to: usize) {
        let len = self.document.elements.len();
        if from >= len {
            warn!(from, to, len, "move rejected: source index out of range");
            return;
        }
        let to = to.min(len - 1);
        if from == to {
            return;
        }
        let element = self.document.elements.remove(from);
        self.document.elements.insert(to, element);
        self.emit(StoreEvent::ElementMoved { from, to });
    }

    // ── settings ─────────────────────────────────────────────────────────

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        patch.apply_to(&mut self.document.settings);
        self.emit(StoreEvent::SettingsUpdated);
    }

    // ── whole-document operations ────────────────────────────────────────

    pub fn reset_form(&mut self) {
        self.document = FormDocument::new();
        info!(form = %self.document.id, "form reset");
        self.set_selected_element_id(None);
        let id = self.document.id.clone();
        self.emit(StoreEvent::FormReset(id));
    }

    /// Writes the current document to its slot, returning any failure.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(&self.document).map_err(StorageError::Serialize)?;
        let id = self.document.id.clone();
        self.storage.set(&form_key(&id), &json)?;
        info!(form = %id, bytes = json.len(), "form saved");
        self.emit(StoreEvent::FormSaved(id));
        Ok(())
    }

    /// Like [`persist`](Self::persist) but failures are only logged.
    pub fn save_form(&mut self) {
        if let Err(e) = self.persist() {
            error!(form = %self.document.id, error = %e, "failed to save form");
        }
    }

    fn read_slot(&self, id: &FormId) -> Result<Option<FormDocument>, StorageError> {
        let key = form_key(id);
        let Some(raw) = self.storage.get(&key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Parse { key, source })
    }

    /// Replaces the document with the one saved under `id`. A missing or
    /// unreadable slot leaves everything as it was.
    pub fn load_form(&mut self, id: &FormId) {
        match self.read_slot(id) {
            Ok(Some(document)) => self.replace_document(document),
            Ok(None) => info!(form = %id, "no saved form to load"),
            Err(e) => error!(form = %id, error = %e, "failed to load form"),
        }
    }

    /// Adopts an externally supplied document (e.g. an imported JSON file)
    /// with the same semantics as a successful load.
    pub fn import_document(&mut self, document: FormDocument) {
        self.replace_document(document);
    }

    fn replace_document(&mut self, document: FormDocument) {
        info!(form = %document.id, elements = document.elements.len(), "form loaded");
        self.document = document;
        self.set_selected_element_id(None);
        let id = self.document.id.clone();
        self.emit(StoreEvent::FormLoaded(id));
    }

    /// Every form with a saved slot, labelled by its stored title. Slots
    /// that no longer parse are listed under their id.
    pub fn saved_forms(&self) -> Vec<SavedForm> {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                error!(error = %e, "failed to list saved forms");
                return Vec::new();
            }
        };
        keys.iter()
            .filter_map(|k| form_id_from_key(k))
            .map(|id| {
                let title = match self.read_slot(&id) {
                    Ok(Some(document)) => document.settings.display_title().to_string(),
                    Ok(None) | Err(_) => id.to_string(),
                };
                SavedForm { id, title }
            })
            .collect()
    }

    /// Deletes the slot saved under `id`. The document being edited is left
    /// alone, even when it is the one whose slot goes away.
    pub fn delete_saved_form(&mut self, id: &FormId) {
        match self.storage.remove(&form_key(id)) {
            Ok(()) => info!(form = %id, "saved form deleted"),
            Err(e) => error!(form = %id, error = %e, "failed to delete saved form"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::element::DateTimeProps;
    use crate::form::{ChoiceOption, ColumnSpan, ElementKind, ElementProps, TextFieldProps};
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store() -> FormStore {
        FormStore::new(Box::new(MemoryStorage::new()))
    }

    fn labels(store: &FormStore) -> Vec<String> {
        store
            .document()
            .elements
            .iter()
            .map(|e| e.label.clone())
            .collect()
    }

    fn add_labeled(store: &mut FormStore, label: &str) -> ElementId {
        let mut new = ElementKind::Text.default_element();
        new.label = label.to_string();
        store.add_element(new)
    }

    /// Storage whose writes always fail, like a full quota.
    struct FullStorage;

    impl FormStorage for FullStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
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
    fn adds_append_in_call_order_with_distinct_ids() {
        let mut s = store();
        let ids: Vec<_> = (0..20)
            .map(|i| add_labeled(&mut s, &format!("field {}", i)))
            .collect();
        assert_eq!(s.document().elements.len(), 20);
        assert_eq!(s.document().order(), ids);
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 20);
        assert_eq!(labels(&s)[0], "field 0");
        assert_eq!(labels(&s)[19], "field 19");
    }

    #[test]
    fn update_changes_only_the_named_field_of_the_target() {
        let mut s = store();
        let a = s.add_element(ElementKind::Radio.default_element());
        let b = s.add_element(ElementKind::Select.default_element());
        let before = s.document().clone();

        s.update_element(&b, ElementPatch::default().label("X"));

        let after = s.document();
        assert_eq!(after.element(&a), before.element(&a));
        let (old_b, new_b) = (before.element(&b).unwrap(), after.element(&b).unwrap());
        assert_eq!(new_b.label, "X");
        assert_eq!(
            FormElement {
                label: old_b.label.clone(),
                ..new_b.clone()
            },
            *old_b
        );
        assert_eq!(after.settings, before.settings);
    }

    #[test]
    fn update_and_remove_of_unknown_ids_are_silent() {
        let mut s = store();
        add_labeled(&mut s, "A");
        let before = s.document().clone();
        let ghost = ElementId::from("ghost");
        s.update_element(&ghost, ElementPatch::default().label("X"));
        s.remove_element(&ghost);
        assert_eq!(s.document(), &before);
    }

    #[test]
    fn removing_the_selected_element_clears_selection() {
        let mut s = store();
        let a = add_labeled(&mut s, "A");
        let b = add_labeled(&mut s, "B");
        let c = add_labeled(&mut s, "C");

        s.set_selected_element_id(Some(b.clone()));
        s.remove_element(&b);
        assert_eq!(s.selected_element_id(), None);
        assert_eq!(labels(&s), vec!["A", "C"]);

        s.set_selected_element_id(Some(a.clone()));
        s.remove_element(&c);
        assert_eq!(s.selected_element_id(), Some(&a));
        assert_eq!(labels(&s), vec!["A"]);
    }

    #[test]
    fn move_is_a_splice_not_a_swap() {
        let mut s = store();
        for l in ["A", "B", "C", "D"] {
            add_labeled(&mut s, l);
        }
        s.move_element(0, 2);
        assert_eq!(labels(&s), vec!["B", "C", "A", "D"]);
        s.move_element(3, 0);
        assert_eq!(labels(&s), vec!["D", "B", "C", "A"]);
    }

    #[test]
    fn move_then_reverse_move_restores_order() {
        let mut s = store();
        for l in ["A", "B", "C", "D", "E"] {
            add_labeled(&mut s, l);
        }
        let original = labels(&s);
        for i in 0..5 {
            for j in 0..5 {
                if i == j {
                    continue;
                }
                s.move_element(i, j);
                s.move_element(j, i);
                assert_eq!(labels(&s), original, "move({i},{j}) then move({j},{i})");
            }
        }
    }

    #[test]
    fn move_out_of_range_source_is_rejected_and_target_is_clamped() {
        let mut s = store();
        for l in ["A", "B", "C"] {
            add_labeled(&mut s, l);
        }
        s.move_element(3, 0);
        assert_eq!(labels(&s), vec!["A", "B", "C"]);
        s.move_element(0, 99);
        assert_eq!(labels(&s), vec!["B", "C", "A"]);

        let mut empty = store();
        empty.move_element(0, 0);
        assert!(empty.document().elements.is_empty());
    }

    #[test]
    fn settings_layout_patch_keeps_other_settings() {
        let mut s = store();
        s.update_settings(SettingsPatch::default().title("Survey"));
        let before = s.document().settings.clone();
        s.update_settings(SettingsPatch::default().columns(ColumnSpan::try_from(3).unwrap()));
        let after = &s.document().settings;
        assert_eq!(after.layout.columns.get(), 3);
        assert_eq!(after.title, before.title);
        assert_eq!(after.description, before.description);
        assert_eq!(after.submit_button_text, before.submit_button_text);
        assert_eq!(after.success_message, before.success_message);
    }

    #[test]
    fn reset_replaces_document_and_clears_selection() {
        let mut s = store();
        let a = add_labeled(&mut s, "A");
        s.set_selected_element_id(Some(a));
        let old_id = s.document().id.clone();
        s.reset_form();
        assert_ne!(s.document().id, old_id);
        assert!(s.document().elements.is_empty());
        assert_eq!(s.selected_element_id(), None);
        assert_eq!(s.document().settings.title, "Untitled Form");
    }

    fn one_of_each(s: &mut FormStore) {
        for kind in ElementKind::ALL {
            s.add_element(kind.default_element());
        }
        // make the payloads non-trivial
        let ids = s.document().order();
        s.update_element(
            &ids[0],
            ElementPatch::default()
                .min_length(Some(2))
                .max_length(Some(8))
                .default_text("hi"),
        );
        s.update_element(
            &ids[5],
            ElementPatch::default().default_values(vec!["option1".into(), "option3".into()]),
        );
        s.update_element(
            &ids[7],
            ElementPatch::default()
                .multiple(true)
                .options(vec![ChoiceOption::new("Yes", "y"), ChoiceOption::new("No", "y")]),
        );
        s.update_element(&ids[8], ElementPatch::default().default_text("2024-02-30"));
        s.update_element(
            &ids[10],
            ElementPatch::default().accept("image/*").required(true),
        );
        s.update_element(
            &ids[14],
            ElementPatch::default().column_span(ColumnSpan::try_from(4).unwrap()),
        );
    }

    #[test]
    fn save_then_load_reproduces_the_document() {
        let mut s = store();
        one_of_each(&mut s);
        s.update_settings(
            SettingsPatch::default()
                .description("All the things")
                .columns(ColumnSpan::try_from(2).unwrap()),
        );
        let saved = s.document().clone();
        s.save_form();

        s.reset_form();
        assert_ne!(s.document(), &saved);
        s.load_form(&saved.id);
        assert_eq!(s.document(), &saved);
        assert_eq!(
            s.saved_forms(),
            vec![SavedForm {
                id: saved.id.clone(),
                title: saved.settings.display_title().to_string(),
            }]
        );
    }

    #[test]
    fn saved_forms_are_listed_by_title_and_can_be_deleted() {
        let mut storage = MemoryStorage::new();
        storage.set("form_broken", "{not json").unwrap();
        let mut s = FormStore::new(Box::new(storage));
        s.update_settings(SettingsPatch::default().title("Job Application"));
        s.save_form();
        let id = s.document().id.clone();

        let mut listed = s.saved_forms();
        listed.sort_by(|a, b| a.title.cmp(&b.title));
        assert_eq!(
            listed,
            vec![
                SavedForm {
                    id: id.clone(),
                    title: "Job Application".into(),
                },
                SavedForm {
                    id: FormId::from("broken"),
                    title: "broken".into(),
                },
            ]
        );

        s.delete_saved_form(&id);
        let remaining: Vec<FormId> = s.saved_forms().into_iter().map(|f| f.id).collect();
        assert_eq!(remaining, vec![FormId::from("broken")]);
        assert_eq!(s.document().settings.title, "Job Application");
    }

    #[test]
    fn load_clears_selection() {
        let mut s = store();
        let a = add_labeled(&mut s, "A");
        s.save_form();
        let id = s.document().id.clone();
        s.set_selected_element_id(Some(a));
        s.load_form(&id);
        assert_eq!(s.selected_element_id(), None);
    }

    #[test]
    fn load_of_missing_or_corrupt_slot_changes_nothing() {
        let mut storage = MemoryStorage::new();
        storage.set("form_broken", "{ not json").unwrap();
        let mut s = FormStore::new(Box::new(storage));
        let a = add_labeled(&mut s, "A");
        s.set_selected_element_id(Some(a.clone()));
        let before = s.document().clone();

        s.load_form(&FormId::from("missing"));
        s.load_form(&FormId::from("broken"));

        assert_eq!(s.document(), &before);
        assert_eq!(s.selected_element_id(), Some(&a));
    }

    #[test]
    fn save_failure_is_swallowed_but_persist_reports_it() {
        let mut s = FormStore::new(Box::new(FullStorage));
        add_labeled(&mut s, "A");
        let before = s.document().clone();
        s.save_form();
        assert_eq!(s.document(), &before);
        assert!(matches!(s.persist(), Err(StorageError::Io { .. })));
    }

    #[test]
    fn import_behaves_like_load() {
        let mut s = store();
        let a = add_labeled(&mut s, "A");
        s.set_selected_element_id(Some(a));
        let mut doc = FormDocument::new();
        doc.elements.push(FormElement {
            id: ElementId::from("t1"),
            label: "When".into(),
            required: false,
            column_span: ColumnSpan::ONE,
            props: ElementProps::Time(DateTimeProps {
                default_value: "10:30".into(),
            }),
        });
        s.import_document(doc.clone());
        assert_eq!(s.document(), &doc);
        assert_eq!(s.selected_element_id(), None);
    }

    #[test]
    fn subscribers_see_every_mutation_in_order() {
        let mut s = store();
        let seen: Rc<RefCell<Vec<StoreEvent>>> = Rc::default();
        let sink = seen.clone();
        s.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        let a = add_labeled(&mut s, "A");
        let b = add_labeled(&mut s, "B");
        s.set_selected_element_id(Some(a.clone()));
        s.move_element(0, 1);
        s.remove_element(&a);
        s.set_is_dragging(true);
        s.set_is_dragging(true);

        assert_eq!(
            *seen.borrow(),
            vec![
                StoreEvent::ElementAdded(a.clone()),
                StoreEvent::ElementAdded(b),
                StoreEvent::SelectionChanged(Some(a.clone())),
                StoreEvent::ElementMoved { from: 0, to: 1 },
                StoreEvent::ElementRemoved(a),
                StoreEvent::SelectionChanged(None),
                StoreEvent::DraggingChanged(true),
            ]
        );

    }

    #[test]
    fn selected_element_follows_the_cursor() {
        let mut s = store();
        let id = s.add_element(ElementKind::Password.default_element());
        assert!(s.selected_element().is_none());
        s.set_selected_element_id(Some(id.clone()));
        let selected = s.selected_element().unwrap();
        assert_eq!(selected.id, id);
        assert!(matches!(
            selected.props,
            ElementProps::Password(TextFieldProps { .. })
        ));
    }
}
