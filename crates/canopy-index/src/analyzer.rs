//! Text analysis pipeline for canopy indexes.
//!
//! Implements a four-stage text analysis pipeline:
//! 1. `SimpleTokenizer` - splits on whitespace and punctuation
//! 2. `LowerCaser` - converts tokens to lowercase
//! 3. `RemoveLongFilter` - removes tokens longer than 40 bytes
//! 4. `Stemmer` - applies language-specific stemming
//!
//! The stemmer language comes from the `stemmer` key in the search settings.
//! Hyphen splitting in stage 1 is why GUID queries must be quoted before they
//! reach the compiler.

use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, TextAnalyzer,
};

use crate::IndexError;

/// Name of the custom tokenizer registered with Tantivy.
pub const CANOPY_TOKENIZER: &str = "canopy_text";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Parses a stemmer language string into a Tantivy `Language`.
///
/// Supports the languages a back office is typically localized into.
/// Returns an error if the language is not recognized.
pub fn parse_language(name: &str) -> Result<Language, IndexError> {
    match name.to_lowercase().as_str() {
        "danish" => Ok(Language::Danish),
        "dutch" => Ok(Language::Dutch),
        "english" => Ok(Language::English),
        "french" => Ok(Language::French),
        "german" => Ok(Language::German),
        "italian" => Ok(Language::Italian),
        "norwegian" => Ok(Language::Norwegian),
        "portuguese" => Ok(Language::Portuguese),
        "spanish" => Ok(Language::Spanish),
        "swedish" => Ok(Language::Swedish),
        other => Err(IndexError::InvalidLanguage(other.to_string())),
    }
}

/// Builds the canopy text analyzer with the specified stemmer language.
pub fn build_analyzer(language: Language) -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .filter(Stemmer::new(language))
        .build()
}

/// Builds the canopy text analyzer from a language name string.
///
/// Convenience function combining [`parse_language`] and [`build_analyzer`].
pub fn build_analyzer_from_name(language_name: &str) -> Result<TextAnalyzer, IndexError> {
    let language = parse_language(language_name)?;
    Ok(build_analyzer(language))
}

#[cfg(test)]
mod test {
    use std::iter;

    use tantivy::tokenizer::TokenStream;

    use super::*;

    #[test]
    fn parse_known_languages() {
        assert_eq!(parse_language("english").unwrap(), Language::English);
        assert_eq!(parse_language("danish").unwrap(), Language::Danish);
        assert_eq!(parse_language("german").unwrap(), Language::German);
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(parse_language("English").unwrap(), Language::English);
        assert_eq!(parse_language("FRENCH").unwrap(), Language::French);
    }

    #[test]
    fn parse_invalid_language() {
        let err = parse_language("klingon").unwrap_err();
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn analyzer_lowercases() {
        let mut analyzer = build_analyzer(Language::English);
        let mut stream = analyzer.token_stream("Home PAGE");

        let token = stream.next().unwrap();
        assert_eq!(token.text, "home");

        let token = stream.next().unwrap();
        assert_eq!(token.text, "page");

        assert!(stream.next().is_none());
    }

    #[test]
    fn analyzer_splits_guids_on_hyphens() {
        // The reason GUID queries are quoted before compilation.
        let mut analyzer = build_analyzer(Language::English);
        let mut stream = analyzer.token_stream("6b29fc40-ca47-1067-b31d-00dd010662da");

        let tokens: Vec<_> = iter::from_fn(|| stream.next().map(|t| t.text.clone())).collect();
        assert_eq!(tokens, vec!["6b29fc40", "ca47", "1067", "b31d", "00dd010662da"]);
    }

    #[test]
    fn analyzer_removes_long_tokens() {
        let mut analyzer = build_analyzer(Language::English);
        let long_token = "a".repeat(50);
        let text = format!("short {long_token} word");
        let mut stream = analyzer.token_stream(&text);

        let token = stream.next().unwrap();
        assert_eq!(token.text, "short");

        let token = stream.next().unwrap();
        assert_eq!(token.text, "word");

        assert!(stream.next().is_none());
    }

    #[test]
    fn build_from_name() {
        let mut analyzer = build_analyzer_from_name("english").unwrap();
        let mut stream = analyzer.token_stream("publishing");
        let token = stream.next().unwrap();
        assert_eq!(token.text, "publish");
    }

    #[test]
    fn build_from_invalid_name() {
        assert!(build_analyzer_from_name("invalid").is_err());
    }
}
