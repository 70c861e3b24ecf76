//! Index schema definition for canopy indexes.
//!
//! Every index carries the same system fields plus the configured text
//! fields:
//! - `id`: entity identifier (string, stored)
//! - `category`: coarse partition for filtering (string, stored, fast)
//! - `item_type`: type alias for filtering (string, stored)
//! - `path`: ancestor id chain as written (string, stored)
//! - `path_prefixes`: one term per ancestor chain prefix, for subtree
//!   filters (string, not stored)
//! - one tokenized, stored text field per configured field name

use std::collections::BTreeMap;

use tantivy::schema::{
    FAST, Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing, TextOptions,
};

use crate::analyzer::CANOPY_TOKENIZER;

/// System field name for the entity identifier.
pub const ID_FIELD: &str = "id";
/// System field name for the coarse category.
pub const CATEGORY_FIELD: &str = "category";
/// System field name for the type alias.
pub const ITEM_TYPE_FIELD: &str = "item_type";
/// System field name for the raw ancestor id chain.
pub const PATH_FIELD: &str = "path";
/// System field name for the ancestor-prefix terms.
pub const PATH_PREFIXES_FIELD: &str = "path_prefixes";

/// Field boost weights for search ranking.
pub mod boost {
    /// Boost for the entity name field (2.0x).
    pub const NAME: f32 = 2.0;
    /// Boost for every other text field (1.0x).
    pub const DEFAULT: f32 = 1.0;

    /// Returns the boost for a text field by name.
    pub fn for_field(name: &str) -> f32 {
        if name == "name" { NAME } else { DEFAULT }
    }
}

/// Handles to all fields in an index schema.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Entity identifier.
    pub id: Field,
    /// Coarse category tag.
    pub category: Field,
    /// Type alias (content type, member type).
    pub item_type: Field,
    /// Raw ancestor id chain.
    pub path: Field,
    /// Ancestor-prefix terms for subtree filtering.
    pub path_prefixes: Field,
    /// Configured text fields by name.
    text: BTreeMap<String, Field>,
}

impl IndexSchema {
    /// Creates an index schema with the given text fields.
    ///
    /// Text field names colliding with system field names are skipped; the
    /// system fields always win.
    pub fn with_text_fields<I, S>(text_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Schema::builder();

        let id = builder.add_text_field(ID_FIELD, STRING | STORED);
        let category = builder.add_text_field(CATEGORY_FIELD, STRING | STORED | FAST);
        let item_type = builder.add_text_field(ITEM_TYPE_FIELD, STRING | STORED);
        let path = builder.add_text_field(PATH_FIELD, STRING | STORED);

        // Prefix terms are only ever matched exactly, never read back
        let path_prefixes = builder.add_text_field(PATH_PREFIXES_FIELD, STRING);

        let text_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(CANOPY_TOKENIZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();

        let mut text = BTreeMap::new();
        for name in text_fields {
            let name = name.as_ref();
            if Self::is_system_field(name) {
                continue;
            }
            let field = builder.add_text_field(name, text_options.clone());
            text.insert(name.to_string(), field);
        }

        let schema = builder.build();

        Self {
            schema,
            id,
            category,
            item_type,
            path,
            path_prefixes,
            text,
        }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Resolves a configured text field by name.
    pub fn text_field(&self, name: &str) -> Option<Field> {
        self.text.get(name).copied()
    }

    /// Returns true if the name is reserved for a system field.
    fn is_system_field(name: &str) -> bool {
        matches!(
            name,
            ID_FIELD | CATEGORY_FIELD | ITEM_TYPE_FIELD | PATH_FIELD | PATH_PREFIXES_FIELD
        )
    }
}

#[cfg(test)]
mod test {
    use tantivy::schema::FieldType;

    use super::*;

    /// Builds a schema with the fields used throughout the search tests.
    fn make_schema() -> IndexSchema {
        IndexSchema::with_text_fields(["name", "key", "body"])
    }

    #[test]
    fn schema_has_system_fields() {
        let schema = make_schema();
        let tantivy_schema = schema.schema();

        for name in [
            ID_FIELD,
            CATEGORY_FIELD,
            ITEM_TYPE_FIELD,
            PATH_FIELD,
            PATH_PREFIXES_FIELD,
        ] {
            assert!(tantivy_schema.get_field(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn text_fields_are_tokenized_and_stored() {
        let schema = make_schema();

        for name in ["name", "key", "body"] {
            let field = schema.text_field(name).unwrap();
            let entry = schema.schema().get_field_entry(field);
            assert!(entry.is_indexed(), "{name} should be indexed");
            assert!(entry.is_stored(), "{name} should be stored");

            if let FieldType::Str(opts) = entry.field_type() {
                let indexing = opts.get_indexing_options().unwrap();
                assert_eq!(indexing.tokenizer(), CANOPY_TOKENIZER);
            } else {
                panic!("{name} field should be text type");
            }
        }
    }

    #[test]
    fn id_field_is_raw_and_stored() {
        let schema = make_schema();
        let entry = schema.schema().get_field_entry(schema.id);

        assert!(entry.is_indexed());
        assert!(entry.is_stored());

        if let FieldType::Str(opts) = entry.field_type() {
            let indexing = opts.get_indexing_options().unwrap();
            assert_eq!(indexing.tokenizer(), "raw");
        } else {
            panic!("id field should be text type");
        }
    }

    #[test]
    fn category_field_is_fast() {
        let schema = make_schema();
        let entry = schema.schema().get_field_entry(schema.category);

        assert!(entry.is_indexed());
        assert!(entry.is_stored());
        assert!(entry.is_fast());
    }

    #[test]
    fn path_prefixes_not_stored() {
        let schema = make_schema();
        let entry = schema.schema().get_field_entry(schema.path_prefixes);

        assert!(entry.is_indexed());
        assert!(!entry.is_stored());
    }

    #[test]
    fn system_names_cannot_be_text_fields() {
        let schema = IndexSchema::with_text_fields(["name", PATH_FIELD, ID_FIELD]);
        assert!(schema.text_field("name").is_some());
        assert!(schema.text_field(PATH_FIELD).is_none());
        assert!(schema.text_field(ID_FIELD).is_none());
    }

    #[test]
    fn name_field_is_boosted() {
        assert_eq!(boost::for_field("name"), boost::NAME);
        assert_eq!(boost::for_field("body"), boost::DEFAULT);
    }
}
