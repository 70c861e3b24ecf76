//! Back-office entity search.
//!
//! [`BackOfficeSearcher`] is the search entry point. Each request flows
//! through these stages:
//!
//! 1. **GUID preprocessing**: a query that parses as a GUID is rewritten
//!    into a quoted exact-match token so the tokenizer does not split it.
//! 2. **Entity dispatch**: the entity kind resolves to an index name, the
//!    searchable and loadable field sets, and a category filter. Unsupported
//!    kinds fail here, before any index access.
//! 3. **Scoping**: members narrow by member type; documents and media narrow
//!    by the user's permitted start-node subtrees (see [`scope`]).
//! 4. **Compile and execute**: the assembled filter compiles to an engine
//!    query, runs once with offset paging, and reports the total match
//!    count alongside the page.
//!
//! The authenticated user is an explicit parameter. Each search is a single
//! stateless request; searchers never mutate the index.

mod compile;
mod execute;
mod request;
mod results;
mod scope;

use std::sync::Arc;

use canopy_query::{FilterExpr, normalize_guid_query};

pub use execute::IndexSearcher;
pub use request::{ALL_MEMBERS, DEFAULT_PAGE_SIZE, EntityKind, SearchRequest};
pub use results::{SearchHit, SearchResults};
use scope::{ScopeCategory, ScopeFilter, resolve_scope};
use tracing::debug;

use crate::{
    SearchError,
    access::{BackOfficeUser, StartNodeProvider},
    cancel::CancelToken,
    manager::{INTERNAL_INDEX, IndexManager, MEMBERS_INDEX},
    schema::{CATEGORY_FIELD, ITEM_TYPE_FIELD},
    value_set::{CATEGORY_CONTENT, CATEGORY_MEDIA, CATEGORY_MEMBER},
};

/// Name reported by errors raised from this searcher.
const SEARCHER_NAME: &str = "BackOfficeSearcher";

/// `search_from` value meaning the whole tree.
const UNRESTRICTED_FROM: &str = "-1";

/// Routing resolved from an entity kind.
struct SearchTarget {
    /// Physical index to search.
    index: &'static str,
    /// Category tag every hit must carry.
    category: &'static str,
    /// Fields free text is matched against.
    search_fields: Vec<String>,
    /// Fields hydrated into result rows.
    load_fields: Vec<String>,
    /// Member-type alias narrowing, members only.
    member_type: Option<String>,
    /// Start-node set that scopes this request, documents and media only.
    scope: Option<ScopeCategory>,
}

/// Searches back-office entities across the named indexes.
pub struct BackOfficeSearcher {
    /// Manager owning the physical indexes.
    manager: Arc<IndexManager>,
    /// Permission seam for start-node resolution.
    start_nodes: Arc<dyn StartNodeProvider + Send + Sync>,
}

impl BackOfficeSearcher {
    /// Creates a searcher over an index manager and permission provider.
    pub fn new(
        manager: Arc<IndexManager>,
        start_nodes: Arc<dyn StartNodeProvider + Send + Sync>,
    ) -> Self {
        Self {
            manager,
            start_nodes,
        }
    }

    /// Searches with no cancellation.
    pub fn search(
        &self,
        request: &SearchRequest,
        user: Option<&BackOfficeUser>,
    ) -> Result<SearchResults, SearchError> {
        self.search_cancellable(request, user, &CancelToken::new())
    }

    /// Searches, checking the token before permission resolution and before
    /// query execution.
    pub fn search_cancellable(
        &self,
        request: &SearchRequest,
        user: Option<&BackOfficeUser>,
        cancel: &CancelToken,
    ) -> Result<SearchResults, SearchError> {
        let target = self.dispatch(request)?;

        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        let scope = match target.scope {
            Some(category) => resolve_scope(
                self.start_nodes.as_ref(),
                user,
                category,
                request.search_from.as_deref(),
                request.ignore_user_start_nodes,
            ),
            None => ScopeFilter::Unrestricted,
        };
        if scope == ScopeFilter::DenyAll {
            debug!(entity = %request.entity, "scope denies all access, returning empty page");
            return Ok(SearchResults::default());
        }

        let searcher =
            self.manager
                .searcher(target.index)
                .ok_or_else(|| SearchError::IndexNotFound {
                    searcher: SEARCHER_NAME.to_string(),
                    index: target.index.to_string(),
                })?;

        let mut clauses = Vec::new();
        let query = normalize_guid_query(&request.query);
        if !query.trim().is_empty() {
            clauses.push(FilterExpr::Text(query.trim().to_string()));
        }
        clauses.push(FilterExpr::field_equals(CATEGORY_FIELD, target.category));
        if let Some(alias) = &target.member_type {
            clauses.push(FilterExpr::field_equals(ITEM_TYPE_FIELD, alias.clone()));
        }
        if let ScopeFilter::Restricted(filter) = scope {
            clauses.push(filter);
        }
        let filter = FilterExpr::and(clauses);

        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        let page_size = request
            .page_size
            .min(self.manager.config().settings.max_page_size);

        searcher.search(
            &filter,
            &target.search_fields,
            &target.load_fields,
            request.page_index,
            page_size,
        )
    }

    /// Resolves an entity kind to its index, field sets, and narrowing.
    fn dispatch(&self, request: &SearchRequest) -> Result<SearchTarget, SearchError> {
        let fields = &self.manager.config().fields;

        match request.entity {
            EntityKind::Document => Ok(SearchTarget {
                index: INTERNAL_INDEX,
                category: CATEGORY_CONTENT,
                search_fields: fields.search_fields(&fields.document),
                load_fields: fields.document.load.clone(),
                member_type: None,
                scope: Some(ScopeCategory::Content),
            }),
            EntityKind::Media => Ok(SearchTarget {
                index: INTERNAL_INDEX,
                category: CATEGORY_MEDIA,
                search_fields: fields.search_fields(&fields.media),
                load_fields: fields.media.load.clone(),
                member_type: None,
                scope: Some(ScopeCategory::Media),
            }),
            EntityKind::Member => {
                let member_type = match request.search_from.as_deref() {
                    Some(from) if from != UNRESTRICTED_FROM && from != ALL_MEMBERS => {
                        Some(from.to_string())
                    }
                    _ => None,
                };
                Ok(SearchTarget {
                    index: MEMBERS_INDEX,
                    category: CATEGORY_MEMBER,
                    search_fields: fields.search_fields(&fields.member),
                    load_fields: fields.member.load.clone(),
                    member_type,
                    scope: None,
                })
            }
            other => Err(SearchError::UnsupportedEntityType {
                searcher: SEARCHER_NAME.to_string(),
                entity: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use canopy_config::Config;

    use crate::access::StaticStartNodes;

    use super::*;

    /// Searcher over a manager with no indexes registered.
    fn make_searcher_without_indexes() -> BackOfficeSearcher {
        BackOfficeSearcher::new(
            Arc::new(IndexManager::new(Config::default())),
            Arc::new(StaticStartNodes::new()),
        )
    }

    #[test]
    fn unsupported_entity_fails_before_index_access() {
        // No index is registered, so reaching the index would fail with
        // IndexNotFound; the unsupported kind must win.
        let searcher = make_searcher_without_indexes();

        for entity in [
            EntityKind::DocumentType,
            EntityKind::MediaType,
            EntityKind::DataType,
        ] {
            let request = SearchRequest::new("home", entity);
            let err = searcher.search(&request, None).unwrap_err();
            match err {
                SearchError::UnsupportedEntityType {
                    searcher: name,
                    entity: kind,
                } => {
                    assert_eq!(name, SEARCHER_NAME);
                    assert_eq!(kind, entity.to_string());
                }
                other => panic!("expected UnsupportedEntityType, got {other}"),
            }
        }
    }

    #[test]
    fn missing_index_is_named_in_error() {
        let searcher = make_searcher_without_indexes();
        let request = SearchRequest::new("smith", EntityKind::Member);

        let err = searcher.search(&request, None).unwrap_err();
        match err {
            SearchError::IndexNotFound { index, .. } => assert_eq!(index, MEMBERS_INDEX),
            other => panic!("expected IndexNotFound, got {other}"),
        }
    }

    #[test]
    fn cancelled_token_short_circuits() {
        let searcher = make_searcher_without_indexes();
        let request = SearchRequest::new("home", EntityKind::Document);

        let cancel = CancelToken::new();
        cancel.cancel();

        let err = searcher
            .search_cancellable(&request, None, &cancel)
            .unwrap_err();
        assert!(matches!(err, SearchError::Cancelled));
    }
}
