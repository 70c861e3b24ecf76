//! Search request types.

use std::fmt;

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Sentinel `search_from` value meaning "all members", equivalent to no
/// member-type narrowing.
pub const ALL_MEMBERS: &str = "all-members";

/// The kind of entity a search targets.
///
/// Only [`Document`](Self::Document), [`Media`](Self::Media), and
/// [`Member`](Self::Member) are searchable; the remaining kinds exist in the
/// back office but have no index, and dispatch rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A content document.
    Document,
    /// A media item.
    Media,
    /// A member account.
    Member,
    /// A document type definition.
    DocumentType,
    /// A media type definition.
    MediaType,
    /// A data type definition.
    DataType,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Document => "document",
            Self::Media => "media",
            Self::Member => "member",
            Self::DocumentType => "document-type",
            Self::MediaType => "media-type",
            Self::DataType => "data-type",
        };
        write!(f, "{name}")
    }
}

/// One search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Free-text query. May be empty, in which case the scoped category is
    /// listed.
    pub query: String,
    /// Entity kind to search.
    pub entity: EntityKind,
    /// Number of hits per page.
    pub page_size: usize,
    /// Zero-based page index.
    pub page_index: u64,
    /// Narrows the search to a subtree (documents/media, node id) or a
    /// member type (members, type alias). `-1` and [`ALL_MEMBERS`] mean
    /// unrestricted.
    pub search_from: Option<String>,
    /// Administrative override: skip the user's start-node restrictions.
    pub ignore_user_start_nodes: bool,
}

impl SearchRequest {
    /// Creates a request with default paging and no narrowing.
    pub fn new(query: impl Into<String>, entity: EntityKind) -> Self {
        Self {
            query: query.into(),
            entity,
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
            search_from: None,
            ignore_user_start_nodes: false,
        }
    }
}
