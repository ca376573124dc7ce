//! Form document model.
//!
//! A form is a `FormDocument`: settings plus an ordered list of
//! `FormElement`s. Each element carries the common fields every field type
//! shares and an `ElementProps` payload whose variant is selected by the
//! element's type tag. The tag alone decides which fields exist, so editors
//! and renderers match on it instead of probing for fields.

pub mod document;
pub mod element;
pub mod element_kind;
pub mod patch;

pub use document::{FormDocument, FormId, FormSettings};
pub use element::{
    ChoiceOption, ColumnSpan, ElementId, ElementProps, FormElement, NewElement, TextFieldProps,
};
pub use element_kind::{ElementCategory, ElementKind};
pub use patch::{ElementPatch, SettingsPatch};
