//! Filter compiler.
//!
//! Compiles a [`FilterExpr`] tree into Tantivy queries. Free text is
//! tokenized against the searchable field set; everything else matches raw
//! terms on the system fields. The compiler is what keeps filter composition
//! independent of the engine's query types.

use canopy_query::FilterExpr;
use tantivy::{
    Term,
    query::{BooleanQuery, BoostQuery, Occur, PhraseQuery, Query, TermQuery},
    schema::{Field, IndexRecordOption},
    tokenizer::TextAnalyzer,
};

use crate::{
    SearchError,
    schema::{CATEGORY_FIELD, ID_FIELD, ITEM_TYPE_FIELD, IndexSchema, PATH_FIELD, boost},
};

/// Compiles filter expressions into Tantivy queries.
pub(crate) struct FilterCompiler<'a> {
    /// Index schema for field references.
    schema: &'a IndexSchema,
    /// Text analyzer for tokenizing query terms.
    analyzer: TextAnalyzer,
    /// Text fields free text is matched against.
    search_fields: &'a [String],
}

impl<'a> FilterCompiler<'a> {
    /// Creates a compiler for one index and field set.
    pub(crate) fn new(
        schema: &'a IndexSchema,
        analyzer: TextAnalyzer,
        search_fields: &'a [String],
    ) -> Self {
        Self {
            schema,
            analyzer,
            search_fields,
        }
    }

    /// Compiles a filter expression into a Tantivy query.
    ///
    /// Returns `None` when the expression has no effective clauses (e.g.
    /// empty text), or an error for filters on unknown fields.
    pub(crate) fn compile(
        &mut self,
        filter: &FilterExpr,
    ) -> Result<Option<Box<dyn Query>>, SearchError> {
        match filter {
            FilterExpr::Text(text) => Ok(self.compile_text(text)),
            FilterExpr::FieldEquals { field, value } => self.compile_field_equals(field, value),
            FilterExpr::PathPrefix(path) => Ok(Some(self.compile_path_prefix(path))),
            FilterExpr::And(exprs) => self.compile_bool(exprs, Occur::Must),
            FilterExpr::Or(exprs) => self.compile_bool(exprs, Occur::Should),
        }
    }

    /// Compiles free text against the searchable fields.
    ///
    /// A double-quoted value compiles to per-field phrase queries (the form
    /// the GUID preprocessor emits). Bare tokens all have to match, each in
    /// any searchable field.
    fn compile_text(&mut self, text: &str) -> Option<Box<dyn Query>> {
        let trimmed = text.trim();

        if let Some(phrase) = quoted_inner(trimmed) {
            let tokens = self.tokenize(phrase);
            return self.build_phrase_query(&tokens);
        }

        let tokens = self.tokenize(trimmed);
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for token in &tokens {
            clauses.push((Occur::Must, self.build_multi_field_term_query(token)?));
        }

        match clauses.len() {
            0 => None,
            1 => Some(clauses.into_iter().next().map(|(_, q)| q).unwrap()),
            _ => Some(Box::new(BooleanQuery::new(clauses))),
        }
    }

    /// Compiles an exact-match filter on a system or text field.
    fn compile_field_equals(
        &mut self,
        field: &str,
        value: &str,
    ) -> Result<Option<Box<dyn Query>>, SearchError> {
        let raw_field = match field {
            ID_FIELD => Some(self.schema.id),
            CATEGORY_FIELD => Some(self.schema.category),
            ITEM_TYPE_FIELD => Some(self.schema.item_type),
            PATH_FIELD => Some(self.schema.path),
            _ => None,
        };

        if let Some(raw) = raw_field {
            let term = Term::from_field_text(raw, value);
            let query: Box<dyn Query> = Box::new(TermQuery::new(term, IndexRecordOption::Basic));
            return Ok(Some(query));
        }

        // Tokenized fields match the value as a term or phrase
        let Some(text_field) = self.schema.text_field(field) else {
            return Err(SearchError::UnknownField(field.to_string()));
        };

        let tokens = self.tokenize(value);
        Ok(self.build_single_field_tokens(text_field, &tokens))
    }

    /// Compiles a subtree filter to an exact term on the prefix field.
    fn compile_path_prefix(&self, path: &str) -> Box<dyn Query> {
        let normalized = path.trim().trim_end_matches(',');
        let term = Term::from_field_text(self.schema.path_prefixes, normalized);
        Box::new(TermQuery::new(term, IndexRecordOption::Basic))
    }

    /// Compiles a boolean branch with the given occurrence.
    fn compile_bool(
        &mut self,
        exprs: &[FilterExpr],
        occur: Occur,
    ) -> Result<Option<Box<dyn Query>>, SearchError> {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for expr in exprs {
            if let Some(query) = self.compile(expr)? {
                clauses.push((occur, query));
            }
        }

        match clauses.len() {
            0 => Ok(None),
            1 => Ok(Some(clauses.into_iter().next().map(|(_, q)| q).unwrap())),
            _ => Ok(Some(Box::new(BooleanQuery::new(clauses)))),
        }
    }

    /// Builds a term query matching any searchable field, with boosts.
    fn build_multi_field_term_query(&self, token: &str) -> Option<Box<dyn Query>> {
        let clauses: Vec<(Occur, Box<dyn Query>)> = self
            .resolved_search_fields()
            .map(|(name, field)| {
                let term = Term::from_field_text(field, token);
                let query: Box<dyn Query> =
                    Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs));
                let boosted: Box<dyn Query> =
                    Box::new(BoostQuery::new(query, boost::for_field(name)));
                (Occur::Should, boosted)
            })
            .collect();

        if clauses.is_empty() {
            None
        } else {
            Some(Box::new(BooleanQuery::new(clauses)))
        }
    }

    /// Builds per-field phrase queries for a quoted value.
    fn build_phrase_query(&self, tokens: &[String]) -> Option<Box<dyn Query>> {
        if tokens.is_empty() {
            return None;
        }
        if tokens.len() == 1 {
            return self.build_multi_field_term_query(&tokens[0]);
        }

        let clauses: Vec<(Occur, Box<dyn Query>)> = self
            .resolved_search_fields()
            .map(|(name, field)| {
                let terms: Vec<Term> = tokens
                    .iter()
                    .map(|t| Term::from_field_text(field, t))
                    .collect();
                let phrase = PhraseQuery::new(terms);
                let boosted: Box<dyn Query> =
                    Box::new(BoostQuery::new(Box::new(phrase), boost::for_field(name)));
                (Occur::Should, boosted)
            })
            .collect();

        if clauses.is_empty() {
            None
        } else {
            Some(Box::new(BooleanQuery::new(clauses)))
        }
    }

    /// Builds a term or phrase query on one text field.
    fn build_single_field_tokens(
        &self,
        field: Field,
        tokens: &[String],
    ) -> Option<Box<dyn Query>> {
        match tokens.len() {
            0 => None,
            1 => {
                let term = Term::from_field_text(field, &tokens[0]);
                Some(Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)))
            }
            _ => {
                let terms: Vec<Term> = tokens
                    .iter()
                    .map(|t| Term::from_field_text(field, t))
                    .collect();
                Some(Box::new(PhraseQuery::new(terms)))
            }
        }
    }

    /// Iterates the searchable fields that exist in this index's schema.
    fn resolved_search_fields(&self) -> impl Iterator<Item = (&str, Field)> {
        self.search_fields
            .iter()
            .filter_map(|name| Some((name.as_str(), self.schema.text_field(name)?)))
    }

    /// Tokenizes text using the index analyzer.
    fn tokenize(&mut self, text: &str) -> Vec<String> {
        let mut stream = self.analyzer.token_stream(text);
        let mut tokens = Vec::new();
        while let Some(token) = stream.next() {
            tokens.push(token.text.clone());
        }
        tokens
    }
}

/// Returns the inner text of a double-quoted value, if it is one.
fn quoted_inner(text: &str) -> Option<&str> {
    let stripped = text.strip_prefix('"')?.strip_suffix('"')?;
    if stripped.is_empty() { None } else { Some(stripped) }
}
