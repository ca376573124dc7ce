use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use super::element_kind::ElementKind;

/// Opaque element identifier, unique within a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn generate() -> Self {
        ElementId(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        ElementId(s.to_string())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grid width of an element, or the column count of a layout. Always 1..=4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ColumnSpan(u8);

impl ColumnSpan {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;
    pub const ONE: ColumnSpan = ColumnSpan(1);

    /// All valid values in ascending order, for pickers.
    pub const ALL: [ColumnSpan; 4] = [ColumnSpan(1), ColumnSpan(2), ColumnSpan(3), ColumnSpan(4)];

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for ColumnSpan {
    fn default() -> Self {
        ColumnSpan::ONE
    }
}

impl TryFrom<u8> for ColumnSpan {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(ColumnSpan(value))
        } else {
            Err(format!(
                "column span must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            ))
        }
    }
}

impl From<ColumnSpan> for u8 {
    fn from(span: ColumnSpan) -> Self {
        span.0
    }
}

impl fmt::Display for ColumnSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1 {
            write!(f, "1 Column")
        } else {
            write!(f, "{} Columns", self.0)
        }
    }
}

/// One `{label, value}` entry of a choice field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFieldProps {
    pub placeholder: String,
    pub default_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxProps {
    pub options: Vec<ChoiceOption>,
    pub default_value: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioProps {
    pub options: Vec<ChoiceOption>,
    pub default_value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectProps {
    pub options: Vec<ChoiceOption>,
    pub default_value: String,
    pub multiple: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeProps {
    pub default_value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProps {
    pub accept: String,
    pub multiple: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticProps {
    pub content: String,
}

/// Type tag and payload of an element this build does not know, e.g. one
/// saved by a newer editor. Kept verbatim so saving writes it back as it was.
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownProps(Map<String, Value>);

impl UnknownProps {
    pub fn tag(&self) -> &str {
        self.0.get("type").and_then(Value::as_str).unwrap_or("unknown")
    }
}

/// Variant payload, tagged by the element's `type`.
///
/// Serialized flat into the element object, so a text field looks like
/// `{"id": .., "type": "text", "label": .., "placeholder": .., ..}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementProps {
    Text(TextFieldProps),
    Textarea(TextFieldProps),
    Number(TextFieldProps),
    Email(TextFieldProps),
    Password(TextFieldProps),
    Checkbox(CheckboxProps),
    Radio(RadioProps),
    Select(SelectProps),
    Date(DateTimeProps),
    Time(DateTimeProps),
    File(FileProps),
    Heading(StaticProps),
    Paragraph(StaticProps),
    Divider(StaticProps),
    Spacer(StaticProps),
    /// Never produced by the derived impls; see [`props_serde`].
    #[serde(skip)]
    Unrecognized(UnknownProps),
}

impl ElementProps {
    pub fn kind(&self) -> Option<ElementKind> {
        Some(match self {
            ElementProps::Text(_) => ElementKind::Text,
            ElementProps::Textarea(_) => ElementKind::Textarea,
            ElementProps::Number(_) => ElementKind::Number,
            ElementProps::Email(_) => ElementKind::Email,
            ElementProps::Password(_) => ElementKind::Password,
            ElementProps::Checkbox(_) => ElementKind::Checkbox,
            ElementProps::Radio(_) => ElementKind::Radio,
            ElementProps::Select(_) => ElementKind::Select,
            ElementProps::Date(_) => ElementKind::Date,
            ElementProps::Time(_) => ElementKind::Time,
            ElementProps::File(_) => ElementKind::File,
            ElementProps::Heading(_) => ElementKind::Heading,
            ElementProps::Paragraph(_) => ElementKind::Paragraph,
            ElementProps::Divider(_) => ElementKind::Divider,
            ElementProps::Spacer(_) => ElementKind::Spacer,
            ElementProps::Unrecognized(_) => return None,
        })
    }

    /// Wire tag of this payload.
    pub fn tag(&self) -> &str {
        match self {
            ElementProps::Unrecognized(raw) => raw.tag(),
            known => known.kind().map(ElementKind::tag).unwrap_or("unknown"),
        }
    }
}

/// Routes tags the registry knows through the derived impls and keeps
/// anything else as an [`UnknownProps`] map.
mod props_serde {
    use super::*;

    pub fn serialize<S>(props: &ElementProps, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match props {
            ElementProps::Unrecognized(raw) => raw.0.serialize(serializer),
            known => known.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ElementProps, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let tag = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("type"))?;
        if ElementKind::from_tag(tag).is_some() {
            ElementProps::deserialize(Value::Object(raw)).map_err(D::Error::custom)
        } else {
            Ok(ElementProps::Unrecognized(UnknownProps(raw)))
        }
    }
}

#[cfg(test)]
impl ElementProps {
    pub fn text_field(&self) -> Option<&TextFieldProps> {
        match self {
            ElementProps::Text(p)
            | ElementProps::Textarea(p)
            | ElementProps::Number(p)
            | ElementProps::Email(p)
            | ElementProps::Password(p) => Some(p),
            _ => None,
        }
    }

    /// Options list of the choice variants.
    pub fn options(&self) -> Option<&[ChoiceOption]> {
        match self {
            ElementProps::Checkbox(p) => Some(&p.options),
            ElementProps::Radio(p) => Some(&p.options),
            ElementProps::Select(p) => Some(&p.options),
            _ => None,
        }
    }
}

/// Element payload before the store has assigned an id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewElement {
    pub label: String,
    pub required: bool,
    pub column_span: ColumnSpan,
    pub props: ElementProps,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormElement {
    pub id: ElementId,
    pub label: String,
    pub required: bool,
    pub column_span: ColumnSpan,
    #[serde(flatten, with = "props_serde")]
    pub props: ElementProps,
}

impl FormElement {
    pub fn from_new(id: ElementId, new: NewElement) -> Self {
        FormElement {
            id,
            label: new.label,
            required: new.required,
            column_span: new.column_span,
            props: new.props,
        }
    }

    pub fn kind(&self) -> Option<ElementKind> {
        self.props.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_span_rejects_out_of_range() {
        assert!(ColumnSpan::try_from(0).is_err());
        assert!(ColumnSpan::try_from(5).is_err());
        assert_eq!(ColumnSpan::try_from(3).unwrap().get(), 3);
    }

    #[test]
    fn text_element_serializes_flat_with_type_tag() {
        let el = FormElement {
            id: ElementId::from("abc"),
            label: "Name".into(),
            required: true,
            column_span: ColumnSpan::try_from(2).unwrap(),
            props: ElementProps::Text(TextFieldProps {
                placeholder: "Enter name".into(),
                default_value: String::new(),
                min_length: None,
                max_length: Some(40),
            }),
        };
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["id"], "abc");
        assert_eq!(json["columnSpan"], 2);
        assert_eq!(json["placeholder"], "Enter name");
        assert_eq!(json["defaultValue"], "");
        assert_eq!(json["maxLength"], 40);
        assert!(json.get("minLength").is_none());
    }

    #[test]
    fn unknown_tag_loads_as_unrecognized() {
        let raw = r#"{"id":"x1","type":"signature","label":"Sign","required":false,"columnSpan":1,"pen":"blue"}"#;
        let el: FormElement = serde_json::from_str(raw).unwrap();
        assert!(matches!(el.props, ElementProps::Unrecognized(_)));
        assert_eq!(el.kind(), None);
        assert_eq!(el.props.tag(), "signature");
        assert_eq!(el.label, "Sign");
    }

    #[test]
    fn unknown_tag_is_written_back_unchanged() {
        let raw = r#"{"id":"x1","type":"signature","label":"Sign","required":true,"columnSpan":2,
            "pen":"blue","strokes":[1,2,3]}"#;
        let el: FormElement = serde_json::from_str(raw).unwrap();
        let saved = serde_json::to_value(&el).unwrap();
        let original: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(saved, original);
    }

    #[test]
    fn malformed_known_tag_is_an_error() {
        let raw = r#"{"id":"n","type":"select","label":"L","required":false,"columnSpan":1,
            "options":"not a list","defaultValue":"","multiple":false}"#;
        assert!(serde_json::from_str::<FormElement>(raw).is_err());

        let untagged = r#"{"id":"n","label":"L","required":false,"columnSpan":1}"#;
        assert!(serde_json::from_str::<FormElement>(untagged).is_err());
    }

    #[test]
    fn checkbox_default_value_is_a_list() {
        let raw = r#"{"id":"c","type":"checkbox","label":"Pick","required":false,"columnSpan":1,
            "options":[{"label":"A","value":"a"}],"defaultValue":["a"]}"#;
        let el: FormElement = serde_json::from_str(raw).unwrap();
        match el.props {
            ElementProps::Checkbox(p) => assert_eq!(p.default_value, vec!["a".to_string()]),
            other => panic!("expected checkbox, got {:?}", other),
        }
    }
}
