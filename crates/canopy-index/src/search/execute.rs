//! Query execution and result conversion.

use std::{collections::BTreeMap, sync::Arc};

use canopy_query::FilterExpr;
use tantivy::{
    TantivyDocument,
    collector::{Count, TopDocs},
    query::{AllQuery, Query},
    schema::{Field, Value},
};
use tracing::debug;

use crate::{
    IndexError, SearchError,
    manager::IndexHandle,
    search::{
        compile::FilterCompiler,
        results::{SearchHit, SearchResults},
    },
};

/// Read-side handle to one named index.
///
/// Obtained from [`IndexManager::searcher`](crate::IndexManager::searcher);
/// absent when the index name is unknown. Searchers hold no mutable state
/// and may be used concurrently.
pub struct IndexSearcher {
    /// Shared index handle.
    handle: Arc<IndexHandle>,
}

impl IndexSearcher {
    /// Creates a searcher over an index handle.
    pub(crate) fn new(handle: Arc<IndexHandle>) -> Self {
        Self { handle }
    }

    /// Returns the name of the index this searcher reads.
    pub fn index_name(&self) -> &str {
        &self.handle.name
    }

    /// Executes a filter against the index with offset paging.
    ///
    /// Free text in the filter matches `search_fields`; hit rows hydrate
    /// only `load_fields`. Returns one page of relevance-ordered hits plus
    /// the total match count independent of the page window. A page size of
    /// zero still reports the total.
    pub fn search(
        &self,
        filter: &FilterExpr,
        search_fields: &[String],
        load_fields: &[String],
        page_index: u64,
        page_size: usize,
    ) -> Result<SearchResults, SearchError> {
        let mut compiler = FilterCompiler::new(
            &self.handle.schema,
            self.handle.analyzer.clone(),
            search_fields,
        );
        let query: Box<dyn Query> = match compiler.compile(filter)? {
            Some(query) => query,
            // An empty filter lists everything in the index
            None => Box::new(AllQuery),
        };

        let reader = self
            .handle
            .index
            .reader()
            .map_err(|e| IndexError::execute(&e))?;
        let searcher = reader.searcher();

        if page_size == 0 {
            let total = searcher
                .search(&*query, &Count)
                .map_err(|e| IndexError::execute(&e))?;
            return Ok(SearchResults {
                hits: Vec::new(),
                total: total as u64,
            });
        }

        let offset = usize::try_from(page_index)
            .unwrap_or(usize::MAX)
            .saturating_mul(page_size);

        let (total, top_docs) = searcher
            .search(
                &*query,
                &(Count, TopDocs::with_limit(page_size).and_offset(offset)),
            )
            .map_err(|e| IndexError::execute(&e))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(doc_address)
                .map_err(|e| IndexError::execute(&e))?;
            hits.push(self.hit_from_doc(&doc, score, load_fields));
        }

        debug!(
            index = %self.handle.name,
            filter = %filter.to_query_string(),
            total,
            page = hits.len(),
            "search executed"
        );

        Ok(SearchResults {
            hits,
            total: total as u64,
        })
    }

    /// Returns the number of committed documents in the index.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        let reader = self
            .handle
            .index
            .reader()
            .map_err(|e| IndexError::execute(&e))?;
        Ok(reader.searcher().num_docs())
    }

    /// Converts a stored document into a hit, hydrating only the load set.
    fn hit_from_doc(&self, doc: &TantivyDocument, score: f32, load_fields: &[String]) -> SearchHit {
        let schema = &self.handle.schema;

        let mut values = BTreeMap::new();
        for name in load_fields {
            let Some(field) = schema.text_field(name) else {
                continue;
            };
            let field_values: Vec<String> = doc
                .get_all(field)
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect();
            if !field_values.is_empty() {
                values.insert(name.clone(), field_values);
            }
        }

        SearchHit {
            id: self.get_text_field(doc, schema.id),
            score,
            category: self.get_text_field(doc, schema.category),
            item_type: self.get_text_field(doc, schema.item_type),
            path: self.get_text_field(doc, schema.path),
            values,
        }
    }

    /// Reads a text field from a document, returning an empty string if
    /// missing.
    fn get_text_field(&self, doc: &TantivyDocument, field: Field) -> String {
        doc.get_first(field)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    }
}
