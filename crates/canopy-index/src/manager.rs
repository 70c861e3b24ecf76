//! Named in-memory index management.
//!
//! The [`IndexManager`] owns every physical index by name. Indexes live in
//! RAM directories and share one schema derived from the configured field
//! sets, so any category routed to an index finds its fields there. The
//! write side hands out [`ValueSetWriter`]s; the read side hands out
//! [`IndexSearcher`]s, absent for unknown names.

use std::{collections::HashMap, sync::Arc};

use canopy_config::Config;
use tantivy::{Index, tokenizer::TextAnalyzer};

use crate::{
    IndexError,
    analyzer::{CANOPY_TOKENIZER, build_analyzer_from_name},
    schema::IndexSchema,
    search::IndexSearcher,
    writer::ValueSetWriter,
};

/// Name of the index holding documents and media.
pub const INTERNAL_INDEX: &str = "internal";

/// Name of the index holding members.
pub const MEMBERS_INDEX: &str = "members";

/// One named physical index with its schema and analyzer.
#[derive(Clone)]
pub(crate) struct IndexHandle {
    /// Index name, kept for diagnostics.
    pub(crate) name: String,
    /// The Tantivy index over a RAM directory.
    pub(crate) index: Index,
    /// Schema with field handles.
    pub(crate) schema: IndexSchema,
    /// Analyzer used for query-side tokenization.
    pub(crate) analyzer: TextAnalyzer,
}

/// Creates, owns, and resolves named in-memory indexes.
pub struct IndexManager {
    /// Registered indexes by name.
    indexes: HashMap<String, Arc<IndexHandle>>,
    /// Configuration the indexes were built from.
    config: Config,
}

impl IndexManager {
    /// Creates a manager with no indexes registered.
    pub fn new(config: Config) -> Self {
        Self {
            indexes: HashMap::new(),
            config,
        }
    }

    /// Creates a manager with the standard back-office indexes registered.
    ///
    /// Registers [`INTERNAL_INDEX`] (documents and media) and
    /// [`MEMBERS_INDEX`] (members).
    pub fn with_default_indexes(config: Config) -> Result<Self, IndexError> {
        let mut manager = Self::new(config);
        manager.create(INTERNAL_INDEX)?;
        manager.create(MEMBERS_INDEX)?;
        Ok(manager)
    }

    /// Registers a new empty index under the given name.
    ///
    /// The schema is derived from the configured field union so the index
    /// can hold any category routed to it.
    pub fn create(&mut self, name: &str) -> Result<(), IndexError> {
        if self.indexes.contains_key(name) {
            return Err(IndexError::AlreadyExists(name.to_string()));
        }

        let schema = IndexSchema::with_text_fields(self.config.fields.all_text_fields());
        let analyzer = build_analyzer_from_name(&self.config.settings.stemmer)?;

        let index = Index::create_in_ram(schema.schema().clone());
        index.tokenizers().register(CANOPY_TOKENIZER, analyzer.clone());

        let handle = IndexHandle {
            name: name.to_string(),
            index,
            schema,
            analyzer,
        };
        self.indexes.insert(name.to_string(), Arc::new(handle));
        Ok(())
    }

    /// Returns a writer for the named index.
    pub fn writer(&self, name: &str) -> Result<ValueSetWriter, IndexError> {
        let handle = self
            .indexes
            .get(name)
            .ok_or_else(|| IndexError::UnknownIndex(name.to_string()))?;
        ValueSetWriter::open(Arc::clone(handle))
    }

    /// Returns a searcher for the named index, or `None` if no index is
    /// registered under that name.
    pub fn searcher(&self, name: &str) -> Option<IndexSearcher> {
        self.indexes.get(name).map(|handle| IndexSearcher::new(Arc::clone(handle)))
    }

    /// Returns true if an index is registered under the given name.
    pub fn has_index(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    /// Returns the configuration the manager was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
