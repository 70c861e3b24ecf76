//! Search result types.

use std::collections::BTreeMap;

use serde::Serialize;

/// One matched document.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Entity identifier.
    pub id: String,
    /// Relevance score assigned by the engine.
    pub score: f32,
    /// Coarse category the document was indexed under.
    pub category: String,
    /// Type alias of the document.
    pub item_type: String,
    /// Ancestor id chain.
    pub path: String,
    /// Loaded field values, restricted to the load-field set.
    pub values: BTreeMap<String, Vec<String>>,
}

impl SearchHit {
    /// Returns the first loaded value of a field, if any.
    pub fn first_value(&self, field: &str) -> Option<&str> {
        self.values.get(field)?.first().map(String::as_str)
    }
}

/// An ordered page of hits plus the total match count.
///
/// `total` counts every match in the index regardless of the requested page
/// window, so callers can render paging controls from a single response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    /// The hits in this page, ordered by relevance.
    pub hits: Vec<SearchHit>,
    /// Total number of matches ignoring paging.
    pub total: u64,
}

impl SearchResults {
    /// Returns the number of hits in this page.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if this page contains no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Iterates over the hits in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, SearchHit> {
        self.hits.iter()
    }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a SearchHit;
    type IntoIter = std::slice::Iter<'a, SearchHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}
