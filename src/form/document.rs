use serde::{Deserialize, Serialize};
use std::fmt;

use super::element::{ColumnSpan, ElementId, FormElement};

/// Opaque document identifier; also names the document's storage slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(String);

impl FormId {
    pub fn generate() -> Self {
        FormId(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl From<&str> for FormId {
    fn from(s: &str) -> Self {
        FormId(s.to_string())
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLayout {
    pub columns: ColumnSpan,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    pub title: String,
    pub description: String,
    pub submit_button_text: String,
    pub success_message: String,
    pub layout: FormLayout,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            title: "Untitled Form".to_string(),
            description: "Form Description".to_string(),
            submit_button_text: "Submit".to_string(),
            success_message: "Thank you for submitting the form!".to_string(),
            layout: FormLayout::default(),
        }
    }
}

impl FormSettings {
    /// Title for headers; blank titles fall back to "Untitled Form".
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled Form"
        } else {
            &self.title
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    pub id: FormId,
    pub settings: FormSettings,
    pub elements: Vec<FormElement>,
}

impl FormDocument {
    /// Fresh empty document with default settings.
    pub fn new() -> Self {
        Self {
            id: FormId::generate(),
            settings: FormSettings::default(),
            elements: Vec::new(),
        }
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    pub fn element(&self, id: &ElementId) -> Option<&FormElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut FormElement> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    /// Ids in document order.
    pub fn order(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id.clone()).collect()
    }
}

impl Default for FormDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_documents_get_distinct_ids_and_default_settings() {
        let a = FormDocument::new();
        let b = FormDocument::new();
        assert_ne!(a.id, b.id);
        assert!(a.elements.is_empty());
        assert_eq!(a.settings.title, "Untitled Form");
        assert_eq!(a.settings.layout.columns.get(), 1);
    }

    #[test]
    fn settings_use_camel_case_keys() {
        let json = serde_json::to_value(FormSettings::default()).unwrap();
        assert_eq!(json["submitButtonText"], "Submit");
        assert_eq!(json["successMessage"], "Thank you for submitting the form!");
        assert_eq!(json["layout"]["columns"], 1);
    }

    #[test]
    fn blank_title_displays_placeholder() {
        let mut settings = FormSettings::default();
        settings.title = "   ".into();
        assert_eq!(settings.display_title(), "Untitled Form");
        settings.title = "Signup".into();
        assert_eq!(settings.display_title(), "Signup");
    }
}
