//! Filter expression model and query preprocessing for canopy search.
//!
//! This crate provides the structured building blocks the search layer
//! composes into executable queries:
//!
//! - **Free text**: `FilterExpr::Text` - tokenized full-text matching
//! - **Exact fields**: `FilterExpr::FieldEquals` - untokenized field matches
//! - **Subtrees**: `FilterExpr::PathPrefix` - a node and all of its descendants
//! - **Composition**: `FilterExpr::and` / `FilterExpr::or`
//!
//! plus [`normalize_guid_query`], which rewrites GUID-shaped queries into
//! quoted canonical form so the tokenizer does not split them on hyphens.
//!
//! # Example
//!
//! ```
//! use canopy_query::FilterExpr;
//!
//! let filter = FilterExpr::and(vec![
//!     FilterExpr::Text("home".into()),
//!     FilterExpr::PathPrefix("-1,1023".into()),
//! ]);
//! assert_eq!(filter.to_query_string(), "home AND path:-1,1023*");
//! ```

#![warn(missing_docs)]

mod expr;
mod guid;

pub use expr::FilterExpr;
pub use guid::normalize_guid_query;
