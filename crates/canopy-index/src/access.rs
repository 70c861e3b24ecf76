//! Users and the permission-resolution seam.
//!
//! Start nodes are resolved through the [`StartNodeProvider`] trait so the
//! search layer stays decoupled from whatever service owns user permissions.
//! The caller passes the authenticated user explicitly; there is no ambient
//! current-user lookup.

use std::collections::HashMap;

/// Id of the tree root. A start node of `-1` grants access to everything.
pub const ROOT_ID: i64 = -1;

/// An authenticated back-office user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackOfficeUser {
    /// Stable user id.
    pub id: i64,
    /// Login name, used in diagnostics.
    pub username: String,
}

impl BackOfficeUser {
    /// Creates a user.
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Resolves per-user start nodes and node paths.
///
/// Implementations typically wrap the entity/permission service. Both
/// lookups may involve I/O on a real backend.
pub trait StartNodeProvider {
    /// Returns the ids of the content nodes the user may browse from.
    fn content_start_ids(&self, user: &BackOfficeUser) -> Vec<i64>;

    /// Returns the ids of the media nodes the user may browse from.
    fn media_start_ids(&self, user: &BackOfficeUser) -> Vec<i64>;

    /// Resolves a node id to its ancestor id chain (e.g. `-1,1023`).
    ///
    /// Returns `None` when the node no longer exists.
    fn path_for(&self, id: i64) -> Option<String>;
}

/// In-memory [`StartNodeProvider`] backed by plain maps.
///
/// Users without configured start nodes fall back to the root, i.e. they are
/// unrestricted.
#[derive(Debug, Clone, Default)]
pub struct StaticStartNodes {
    /// Content start-node ids per user id.
    content: HashMap<i64, Vec<i64>>,
    /// Media start-node ids per user id.
    media: HashMap<i64, Vec<i64>>,
    /// Node id to ancestor chain.
    paths: HashMap<i64, String>,
}

impl StaticStartNodes {
    /// Creates an empty provider: every user unrestricted, no known paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content start nodes for a user.
    pub fn set_content_start_ids(&mut self, user_id: i64, ids: Vec<i64>) {
        self.content.insert(user_id, ids);
    }

    /// Sets the media start nodes for a user.
    pub fn set_media_start_ids(&mut self, user_id: i64, ids: Vec<i64>) {
        self.media.insert(user_id, ids);
    }

    /// Registers the ancestor chain of a node.
    pub fn set_path(&mut self, node_id: i64, path: impl Into<String>) {
        self.paths.insert(node_id, path.into());
    }
}

impl StartNodeProvider for StaticStartNodes {
    fn content_start_ids(&self, user: &BackOfficeUser) -> Vec<i64> {
        self.content
            .get(&user.id)
            .cloned()
            .unwrap_or_else(|| vec![ROOT_ID])
    }

    fn media_start_ids(&self, user: &BackOfficeUser) -> Vec<i64> {
        self.media
            .get(&user.id)
            .cloned()
            .unwrap_or_else(|| vec![ROOT_ID])
    }

    fn path_for(&self, id: i64) -> Option<String> {
        self.paths.get(&id).cloned()
    }
}
