//! Start-node path scoping.
//!
//! Folds a user's permitted start nodes, and the request's optional
//! `search_from` subtree, into a filter the query must match. A start node
//! whose path can no longer be resolved is dropped rather than failing the
//! request; only a user whose entire permitted set fails to resolve is
//! denied.

use canopy_query::FilterExpr;
use tracing::warn;

use crate::access::{BackOfficeUser, ROOT_ID, StartNodeProvider};

/// Which start-node set applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeCategory {
    /// Content start nodes (documents).
    Content,
    /// Media start nodes.
    Media,
}

/// The resolved scope of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScopeFilter {
    /// No filter applies; everything in the category is visible.
    Unrestricted,
    /// The query must also match this filter.
    Restricted(FilterExpr),
    /// Nothing is visible; the search returns an empty result set.
    DenyAll,
}

/// Resolves the scope of one request.
///
/// Combines the `search_from` subtree (request narrowing) with the user's
/// permitted start nodes (permission narrowing). With no user there is no
/// permission filter: anonymous and system contexts search unrestricted.
pub(crate) fn resolve_scope(
    provider: &dyn StartNodeProvider,
    user: Option<&BackOfficeUser>,
    category: ScopeCategory,
    search_from: Option<&str>,
    ignore_user_start_nodes: bool,
) -> ScopeFilter {
    let from_filter = search_from.and_then(|from| subtree_filter(provider, from));

    match (from_filter, user_scope(provider, user, category, ignore_user_start_nodes)) {
        (_, ScopeFilter::DenyAll) => ScopeFilter::DenyAll,
        (None, scope) => scope,
        (Some(filter), ScopeFilter::Unrestricted) => ScopeFilter::Restricted(filter),
        (Some(filter), ScopeFilter::Restricted(user_filter)) => {
            ScopeFilter::Restricted(FilterExpr::and(vec![filter, user_filter]))
        }
    }
}

/// Resolves a `search_from` node id to a subtree filter.
///
/// `-1` means the whole tree. An id that does not parse or no longer
/// resolves to a path narrows nothing.
fn subtree_filter(provider: &dyn StartNodeProvider, from: &str) -> Option<FilterExpr> {
    let id = match from.trim().parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            warn!(search_from = from, "ignoring unparseable search-from node");
            return None;
        }
    };
    if id == ROOT_ID {
        return None;
    }

    match provider.path_for(id) {
        Some(path) => Some(FilterExpr::PathPrefix(path)),
        None => {
            warn!(node = id, "ignoring search-from node with no resolvable path");
            None
        }
    }
}

/// Resolves the user's permitted start nodes into a filter.
fn user_scope(
    provider: &dyn StartNodeProvider,
    user: Option<&BackOfficeUser>,
    category: ScopeCategory,
    ignore_user_start_nodes: bool,
) -> ScopeFilter {
    let Some(user) = user else {
        return ScopeFilter::Unrestricted;
    };
    if ignore_user_start_nodes {
        return ScopeFilter::Unrestricted;
    }

    let ids = match category {
        ScopeCategory::Content => provider.content_start_ids(user),
        ScopeCategory::Media => provider.media_start_ids(user),
    };
    if ids.is_empty() || ids.contains(&ROOT_ID) {
        return ScopeFilter::Unrestricted;
    }

    let mut clauses = Vec::new();
    for id in ids {
        match provider.path_for(id) {
            Some(path) => clauses.push(FilterExpr::PathPrefix(path)),
            None => {
                warn!(
                    node = id,
                    user = %user.username,
                    "dropping start node with no resolvable path from permission filter"
                );
            }
        }
    }

    if clauses.is_empty() {
        // Every permitted node failed to resolve: no access, not an error
        return ScopeFilter::DenyAll;
    }
    ScopeFilter::Restricted(FilterExpr::or(clauses))
}
