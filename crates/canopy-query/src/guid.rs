//! GUID query preprocessing.
//!
//! Back-office users paste entity keys into the search box. The text
//! tokenizer splits a hyphenated GUID into five meaningless fragments, so a
//! query that parses as a GUID is rewritten into its canonical form wrapped
//! in double quotes, which the compiler treats as one exact phrase.

use std::borrow::Cow;

use uuid::Uuid;

/// Rewrites a GUID-shaped query into a quoted exact-match token.
///
/// Accepts every textual UUID form (`hyphenated`, `simple`, braced, URN, any
/// casing) and emits the canonical lowercase hyphenated form in one pair of
/// double quotes. Anything that does not parse as a GUID, including the
/// empty string, passes through unchanged.
pub fn normalize_guid_query(query: &str) -> Cow<'_, str> {
    match Uuid::parse_str(query.trim()) {
        Ok(guid) => Cow::Owned(format!("\"{}\"", guid.hyphenated())),
        Err(_) => Cow::Borrowed(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "\"6b29fc40-ca47-1067-b31d-00dd010662da\"";

    #[test]
    fn hyphenated_guid_is_quoted() {
        assert_eq!(
            normalize_guid_query("6b29fc40-ca47-1067-b31d-00dd010662da"),
            CANONICAL
        );
    }

    #[test]
    fn casing_is_canonicalized() {
        assert_eq!(
            normalize_guid_query("6B29FC40-CA47-1067-B31D-00DD010662DA"),
            CANONICAL
        );
    }

    #[test]
    fn simple_form_gains_hyphens() {
        assert_eq!(
            normalize_guid_query("6b29fc40ca471067b31d00dd010662da"),
            CANONICAL
        );
    }

    #[test]
    fn braced_form_is_canonicalized() {
        assert_eq!(
            normalize_guid_query("{6b29fc40-ca47-1067-b31d-00dd010662da}"),
            CANONICAL
        );
    }

    #[test]
    fn urn_form_is_canonicalized() {
        assert_eq!(
            normalize_guid_query("urn:uuid:6b29fc40-ca47-1067-b31d-00dd010662da"),
            CANONICAL
        );
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert_eq!(
            normalize_guid_query("  6b29fc40-ca47-1067-b31d-00dd010662da "),
            CANONICAL
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(normalize_guid_query("home page"), "home page");
    }

    #[test]
    fn empty_query_passes_through() {
        assert_eq!(normalize_guid_query(""), "");
    }

    #[test]
    fn near_guid_passes_through() {
        // One hex digit short of a valid GUID.
        assert_eq!(
            normalize_guid_query("6b29fc40-ca47-1067-b31d-00dd010662d"),
            "6b29fc40-ca47-1067-b31d-00dd010662d"
        );
    }
}
