//! In-memory back-office search indexes for canopy.
//!
//! This crate provides the search core for back-office entities:
//! - Value-set documents and their writer ([`ValueSet`], [`ValueSetWriter`])
//! - Named in-memory indexes ([`IndexManager`])
//! - Entity search with permission scoping ([`BackOfficeSearcher`])
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! use canopy_config::Config;
//! use canopy_index::{
//!     BackOfficeSearcher, EntityKind, FieldValue, INTERNAL_INDEX, IndexManager, SearchRequest,
//!     StaticStartNodes, ValueSet,
//! };
//!
//! let manager = IndexManager::with_default_indexes(Config::default()).unwrap();
//!
//! let mut values = BTreeMap::new();
//! values.insert("name".to_string(), vec![FieldValue::from("Home")]);
//! values.insert("path".to_string(), vec![FieldValue::from("-1,1023")]);
//!
//! let mut writer = manager.writer(INTERNAL_INDEX).unwrap();
//! writer.apply(&ValueSet::new("1023", "content", "homePage", values)).unwrap();
//! writer.commit().unwrap();
//!
//! let searcher = BackOfficeSearcher::new(Arc::new(manager), Arc::new(StaticStartNodes::new()));
//! let results = searcher
//!     .search(&SearchRequest::new("home", EntityKind::Document), None)
//!     .unwrap();
//! assert_eq!(results.total, 1);
//! ```

#![warn(missing_docs)]

mod access;
mod analyzer;
mod cancel;
mod error;
mod manager;
mod schema;
mod search;
mod value_set;
mod writer;

pub use access::{BackOfficeUser, ROOT_ID, StartNodeProvider, StaticStartNodes};
pub use analyzer::{CANOPY_TOKENIZER, build_analyzer, build_analyzer_from_name, parse_language};
pub use cancel::CancelToken;
pub use error::{IndexError, SearchError};
pub use manager::{INTERNAL_INDEX, IndexManager, MEMBERS_INDEX};
pub use schema::{
    CATEGORY_FIELD, ID_FIELD, ITEM_TYPE_FIELD, IndexSchema, PATH_FIELD, PATH_PREFIXES_FIELD,
};
pub use search::{
    ALL_MEMBERS, BackOfficeSearcher, DEFAULT_PAGE_SIZE, EntityKind, IndexSearcher, SearchHit,
    SearchRequest, SearchResults,
};
pub use value_set::{
    CATEGORY_CONTENT, CATEGORY_MEDIA, CATEGORY_MEMBER, FieldValue, PATH_VALUE, ValueSet,
};
pub use writer::ValueSetWriter;
