//! The per-document field-value container.
//!
//! A [`ValueSet`] is what the indexing pipeline hands to an index: one entity
//! snapshot with an id, routing metadata, and a multi-valued field map. A set
//! without values is a deletion marker - the id is removed from the index and
//! nothing is added back.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved field carrying the ancestor id chain (e.g. `-1,1023,1045`).
///
/// The writer derives subtree-filter terms from it instead of indexing it as
/// ordinary text.
pub const PATH_VALUE: &str = "path";

/// Category tag for content documents.
pub const CATEGORY_CONTENT: &str = "content";
/// Category tag for media items.
pub const CATEGORY_MEDIA: &str = "media";
/// Category tag for member accounts.
pub const CATEGORY_MEMBER: &str = "member";

/// One indexable document: an id, routing metadata, and field values.
///
/// Value sets are read-only once constructed; callers that need to adjust
/// values before re-indexing clone first. `Clone` is a deep copy, so a clone
/// can be mutated without affecting the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSet {
    /// Stable external identifier of the indexed entity.
    pub id: String,

    /// Coarse partition (`content` / `media` / `member`), used to route to
    /// the correct index and field set.
    #[serde(default)]
    pub category: Option<String>,

    /// Finer-grained type discriminator (content-type or member-type alias).
    #[serde(default)]
    pub item_type: Option<String>,

    /// Field name to ordered values. Per-field lists preserve insertion
    /// order (multi-valued fields). `None` marks a deletion-only record.
    #[serde(default)]
    pub values: Option<BTreeMap<String, Vec<FieldValue>>>,
}

impl ValueSet {
    /// Creates a value set with field values.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        item_type: impl Into<String>,
        values: BTreeMap<String, Vec<FieldValue>>,
    ) -> Self {
        Self {
            id: id.into(),
            category: Some(category.into()),
            item_type: Some(item_type.into()),
            values: Some(values),
        }
    }

    /// Creates a deletion-only record: an id with no values.
    pub fn deletion(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: None,
            item_type: None,
            values: None,
        }
    }

    /// Returns true if this set only deletes its id from the index.
    pub fn is_deletion(&self) -> bool {
        self.values.is_none()
    }

    /// Returns the first text value of a field, if any.
    pub fn first_text(&self, field: &str) -> Option<&str> {
        self.values
            .as_ref()?
            .get(field)?
            .iter()
            .find_map(FieldValue::as_text)
    }
}

/// A single raw field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A text value.
    Text(String),
}

impl FieldValue {
    /// Returns the text content if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Integer(_) | Self::Float(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Builds a small content value set for the tests below.
    fn make_value_set() -> ValueSet {
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), vec![FieldValue::from("Home")]);
        values.insert(
            "tags".to_string(),
            vec![FieldValue::from("news"), FieldValue::from("frontpage")],
        );
        values.insert(PATH_VALUE.to_string(), vec![FieldValue::from("-1,1023")]);
        ValueSet::new("1023", "content", "homePage", values)
    }

    #[test]
    fn clone_is_independent() {
        let original = make_value_set();
        let mut copy = original.clone();

        copy.values
            .as_mut()
            .unwrap()
            .insert("name".to_string(), vec![FieldValue::from("Changed")]);

        assert_eq!(original.first_text("name"), Some("Home"));
        assert_eq!(copy.first_text("name"), Some("Changed"));
    }

    #[test]
    fn multi_values_preserve_order() {
        let set = make_value_set();
        let tags = &set.values.as_ref().unwrap()["tags"];
        assert_eq!(
            tags,
            &vec![FieldValue::from("news"), FieldValue::from("frontpage")]
        );
    }

    #[test]
    fn deletion_record_has_no_values() {
        let set = ValueSet::deletion("1023");
        assert!(set.is_deletion());
        assert!(set.category.is_none());
        assert_eq!(set.first_text("name"), None);
    }

    #[test]
    fn deserializes_from_json() {
        let set: ValueSet = serde_json::from_str(
            r#"{
                "id": "1023",
                "category": "content",
                "item_type": "homePage",
                "values": { "name": ["Home"], "sortOrder": [3] }
            }"#,
        )
        .unwrap();

        assert_eq!(set.first_text("name"), Some("Home"));
        assert_eq!(
            set.values.as_ref().unwrap()["sortOrder"],
            vec![FieldValue::Integer(3)]
        );
    }

    #[test]
    fn deletion_deserializes_without_values() {
        let set: ValueSet = serde_json::from_str(r#"{ "id": "1023" }"#).unwrap();
        assert!(set.is_deletion());
    }

    #[test]
    fn display_formats_values() {
        assert_eq!(FieldValue::from("text").to_string(), "text");
        assert_eq!(FieldValue::Integer(42).to_string(), "42");
        assert_eq!(FieldValue::Float(1.5).to_string(), "1.5");
    }
}
