//! Error types for the canopy-index crate.

use thiserror::Error;

/// Errors that can occur when creating or writing to an index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Failed to create an index.
    #[error("failed to create index {name}: {message}")]
    CreateIndex {
        /// Name of the index that could not be created.
        name: String,
        /// Error message.
        message: String,
    },

    /// An index with this name is already registered.
    #[error("index {0} already exists")]
    AlreadyExists(String),

    /// No index with this name is registered.
    #[error("unknown index: {0}")]
    UnknownIndex(String),

    /// Failed to write to the index.
    #[error("failed to write to index: {0}")]
    Write(String),

    /// Failed to commit changes to the index.
    #[error("failed to commit index: {0}")]
    Commit(String),

    /// Failed to execute a query against the index.
    #[error("failed to execute query: {0}")]
    Execute(String),

    /// Invalid stemmer language.
    #[error("unsupported stemmer language: {0}")]
    InvalidLanguage(String),
}

impl IndexError {
    /// Creates a `CreateIndex` error from an index name and Tantivy error.
    pub(crate) fn create_index(name: &str, source: &tantivy::TantivyError) -> Self {
        Self::CreateIndex {
            name: name.to_string(),
            message: source.to_string(),
        }
    }

    /// Creates a `Write` error from a Tantivy error.
    pub(crate) fn write(source: &tantivy::TantivyError) -> Self {
        Self::Write(source.to_string())
    }

    /// Creates a `Commit` error from a Tantivy error.
    pub(crate) fn commit(source: &tantivy::TantivyError) -> Self {
        Self::Commit(source.to_string())
    }

    /// Creates an `Execute` error from a Tantivy error.
    pub(crate) fn execute(source: &tantivy::TantivyError) -> Self {
        Self::Execute(source.to_string())
    }
}

/// Errors that can occur when searching.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The requested entity kind has no search implementation.
    #[error("{searcher} does not support searching entity type {entity}")]
    UnsupportedEntityType {
        /// Name of the searcher that rejected the request.
        searcher: String,
        /// The unsupported entity kind.
        entity: String,
    },

    /// The resolved index name has no registered index.
    #[error("{searcher} found no index registered under {index}")]
    IndexNotFound {
        /// Name of the searcher that requested the index.
        searcher: String,
        /// The missing index name.
        index: String,
    },

    /// A filter references a field the index does not know.
    #[error("unknown filter field: {0}")]
    UnknownField(String),

    /// The request was cancelled before completion.
    #[error("search was cancelled")]
    Cancelled,

    /// An underlying index error.
    #[error(transparent)]
    Index(#[from] IndexError),
}
