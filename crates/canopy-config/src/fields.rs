//! Field set configuration.
//!
//! Declares which document fields participate in search and which are loaded
//! back into results, per entity category. The search layer unions the base
//! back-office fields with the category-specific additions at dispatch time.

use std::collections::BTreeSet;

use serde::Deserialize;

/// Searchable and loadable fields per entity category.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchFields {
    /// Fields searched for every category.
    pub base: Vec<String>,
    /// Document-specific field sets.
    pub document: CategoryFields,
    /// Media-specific field sets.
    pub media: CategoryFields,
    /// Member-specific field sets.
    pub member: CategoryFields,
}

/// Field sets for one entity category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryFields {
    /// Fields searched in addition to the base set.
    pub search: Vec<String>,
    /// Fields hydrated into result rows.
    pub load: Vec<String>,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self {
            base: vec!["name".into(), "key".into()],
            document: CategoryFields {
                search: vec!["body".into(), "tags".into()],
                load: vec!["name".into()],
            },
            media: CategoryFields {
                search: vec!["file".into(), "alt".into()],
                load: vec!["name".into(), "file".into()],
            },
            member: CategoryFields {
                search: vec!["email".into(), "login".into()],
                load: vec!["name".into(), "email".into(), "login".into()],
            },
        }
    }
}

impl SearchFields {
    /// Returns the base fields plus a category's additions, deduplicated,
    /// base first.
    pub fn search_fields(&self, category: &CategoryFields) -> Vec<String> {
        let mut fields = self.base.clone();
        for field in &category.search {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }
        fields
    }

    /// Returns every text field any category searches or loads.
    ///
    /// Index schemas are built from this union so the same physical index can
    /// serve every category routed to it.
    pub fn all_text_fields(&self) -> BTreeSet<String> {
        let mut fields: BTreeSet<String> = self.base.iter().cloned().collect();
        for category in [&self.document, &self.media, &self.member] {
            fields.extend(category.search.iter().cloned());
            fields.extend(category.load.iter().cloned());
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_fields() {
        let fields = SearchFields::default();
        assert_eq!(fields.base, vec!["name", "key"]);
    }

    #[test]
    fn search_fields_unions_base_first() {
        let fields = SearchFields::default();
        let member = fields.search_fields(&fields.member);
        assert_eq!(member, vec!["name", "key", "email", "login"]);
    }

    #[test]
    fn search_fields_deduplicates() {
        let fields = SearchFields {
            base: vec!["name".into()],
            document: CategoryFields {
                search: vec!["name".into(), "body".into()],
                load: vec![],
            },
            ..SearchFields::default()
        };
        assert_eq!(
            fields.search_fields(&fields.document),
            vec!["name", "body"]
        );
    }

    #[test]
    fn all_text_fields_covers_load_sets() {
        let fields = SearchFields::default();
        let all = fields.all_text_fields();
        for name in ["name", "key", "body", "tags", "file", "alt", "email", "login"] {
            assert!(all.contains(name), "missing {name}");
        }
    }
}
