//! Filter expression tree.
//!
//! Represents composed search filters before compilation to search engine
//! queries. The search layer builds these from the request (free text, entity
//! category, permitted subtrees) instead of concatenating filter strings.

use std::fmt;

/// A composable search filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    /// Free-text match against the searchable fields.
    ///
    /// A value wrapped in double quotes is matched as an exact phrase.
    Text(String),

    /// Exact match on a single field's raw value.
    FieldEquals {
        /// Field name (e.g., category, nodeType).
        field: String,
        /// Value the field must equal exactly.
        value: String,
    },

    /// Matches a node path and every descendant path under it.
    PathPrefix(String),

    /// Conjunction: all sub-filters must match.
    And(Vec<Self>),

    /// Disjunction: at least one sub-filter must match.
    Or(Vec<Self>),
}

impl FilterExpr {
    /// Creates an And filter, flattening nested Ands.
    pub fn and(exprs: Vec<Self>) -> Self {
        let flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::And(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            0 => Self::And(vec![]),
            1 => flattened.into_iter().next().unwrap(),
            _ => Self::And(flattened),
        }
    }

    /// Creates an Or filter, flattening nested Ors.
    pub fn or(exprs: Vec<Self>) -> Self {
        let flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::Or(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            0 => Self::Or(vec![]),
            1 => flattened.into_iter().next().unwrap(),
            _ => Self::Or(flattened),
        }
    }

    /// Creates an exact-match filter for a field.
    pub fn field_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns true if the filter has no effective clauses.
    ///
    /// Empty `And`/`Or` nodes (and nodes composed only of such) match
    /// nothing useful and compile to no query at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::FieldEquals { .. } | Self::PathPrefix(_) => false,
            Self::And(exprs) | Self::Or(exprs) => exprs.iter().all(Self::is_empty),
        }
    }

    /// Formats the filter as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Text(s) => writeln!(f, "{prefix}Text({s:?})"),
            Self::FieldEquals { field, value } => {
                writeln!(f, "{prefix}FieldEquals({field:?} = {value:?})")
            }
            Self::PathPrefix(path) => writeln!(f, "{prefix}PathPrefix({path:?})"),
            Self::And(exprs) => {
                writeln!(f, "{prefix}And")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Or(exprs) => {
                writeln!(f, "{prefix}Or")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }

    /// Formats the filter as a query string (human-readable form).
    ///
    /// This produces output like: `home AND (path:-1,1023* OR path:-1,1045*)`
    pub fn to_query_string(&self) -> String {
        self.fmt_query_string(false)
    }

    /// Internal helper for query string formatting.
    fn fmt_query_string(&self, nested: bool) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::FieldEquals { field, value } => format!("{field}:{value}"),
            Self::PathPrefix(path) => format!("path:{path}*"),
            Self::And(exprs) => {
                let parts: Vec<String> = exprs.iter().map(|e| e.fmt_query_string(true)).collect();
                if nested && parts.len() > 1 {
                    format!("({})", parts.join(" AND "))
                } else {
                    parts.join(" AND ")
                }
            }
            Self::Or(exprs) => {
                let parts: Vec<String> = exprs.iter().map(|e| e.fmt_query_string(true)).collect();
                if nested && parts.len() > 1 {
                    format!("({})", parts.join(" OR "))
                } else {
                    parts.join(" OR ")
                }
            }
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_flattens_nested() {
        let nested = FilterExpr::and(vec![
            FilterExpr::Text("a".into()),
            FilterExpr::And(vec![
                FilterExpr::Text("b".into()),
                FilterExpr::Text("c".into()),
            ]),
        ]);

        assert_eq!(
            nested,
            FilterExpr::And(vec![
                FilterExpr::Text("a".into()),
                FilterExpr::Text("b".into()),
                FilterExpr::Text("c".into()),
            ])
        );
    }

    #[test]
    fn and_single_element_unwraps() {
        let single = FilterExpr::and(vec![FilterExpr::Text("a".into())]);
        assert_eq!(single, FilterExpr::Text("a".into()));
    }

    #[test]
    fn or_flattens_nested() {
        let nested = FilterExpr::or(vec![
            FilterExpr::PathPrefix("-1,1023".into()),
            FilterExpr::Or(vec![
                FilterExpr::PathPrefix("-1,1045".into()),
                FilterExpr::PathPrefix("-1,1088".into()),
            ]),
        ]);

        assert_eq!(
            nested,
            FilterExpr::Or(vec![
                FilterExpr::PathPrefix("-1,1023".into()),
                FilterExpr::PathPrefix("-1,1045".into()),
                FilterExpr::PathPrefix("-1,1088".into()),
            ])
        );
    }

    #[test]
    fn or_single_element_unwraps() {
        let single = FilterExpr::or(vec![FilterExpr::PathPrefix("-1,1023".into())]);
        assert_eq!(single, FilterExpr::PathPrefix("-1,1023".into()));
    }

    #[test]
    fn empty_and_is_empty() {
        assert!(FilterExpr::And(vec![]).is_empty());
        assert!(FilterExpr::Or(vec![]).is_empty());
        assert!(FilterExpr::Text("  ".into()).is_empty());
        assert!(!FilterExpr::field_equals("category", "media").is_empty());
    }

    #[test]
    fn query_string_rendering() {
        let filter = FilterExpr::and(vec![
            FilterExpr::Text("home".into()),
            FilterExpr::field_equals("category", "content"),
            FilterExpr::or(vec![
                FilterExpr::PathPrefix("-1,1023".into()),
                FilterExpr::PathPrefix("-1,1045".into()),
            ]),
        ]);

        assert_eq!(
            filter.to_query_string(),
            "home AND category:content AND (path:-1,1023* OR path:-1,1045*)"
        );
    }

    #[test]
    fn display_renders_tree() {
        let filter = FilterExpr::and(vec![
            FilterExpr::Text("home".into()),
            FilterExpr::PathPrefix("-1,1023".into()),
        ]);

        let rendered = filter.to_string();
        assert!(rendered.contains("And"));
        assert!(rendered.contains("Text(\"home\")"));
        assert!(rendered.contains("PathPrefix(\"-1,1023\")"));
    }
}
