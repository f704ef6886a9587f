//! Labeled-identifier extraction from document text.
//!
//! Claim documents carry a case identifier (SEP number) introduced by the
//! literal label `Nomor SEP`, optionally followed by a `:` or `-` separator.
//! The captured run admits hyphens so that separator-formatted identifiers
//! such as `ABC-123` survive extraction; [`normalize_identifier`] then strips
//! everything that is not alphanumeric before mapping lookup.

use std::sync::OnceLock;

use regex::Regex;

/// The labeled-identifier pattern: case-insensitive `Nomor SEP`, an optional
/// `:`/`-` separator padded by optional whitespace, then the identifier run.
fn sep_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Nomor\s*SEP\s*[:\-]?\s*([A-Za-z0-9][A-Za-z0-9-]*)").unwrap())
}

/// Find the first labeled identifier in `text` and return the raw capture.
///
/// Returns `None` when the label is absent from the text.
pub fn extract_identifier(text: &str) -> Option<String> {
    sep_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Strip every non-alphanumeric character from an identifier.
///
/// Case is preserved. The operation is idempotent:
/// `normalize_identifier(normalize_identifier(s)) == normalize_identifier(s)`.
pub fn normalize_identifier(raw: &str) -> String {
    raw.chars().filter(|c| c.is_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_identifier_with_colon_separator() {
        let text = "Lembar klaim\nNomor SEP: 0301R0011023V000001\nNama peserta";
        assert_eq!(
            extract_identifier(text).as_deref(),
            Some("0301R0011023V000001")
        );
    }

    #[test]
    fn extracts_identifier_with_dash_separator() {
        assert_eq!(
            extract_identifier("Nomor SEP - XY99").as_deref(),
            Some("XY99")
        );
    }

    #[test]
    fn extracts_identifier_without_separator() {
        assert_eq!(
            extract_identifier("nomor sep 12345").as_deref(),
            Some("12345")
        );
    }

    #[test]
    fn captures_hyphenated_identifier() {
        assert_eq!(
            extract_identifier("Nomor SEP: ABC-123").as_deref(),
            Some("ABC-123")
        );
    }

    #[test]
    fn label_is_case_insensitive() {
        assert_eq!(
            extract_identifier("NOMOR SEP: abc99").as_deref(),
            Some("abc99")
        );
    }

    #[test]
    fn missing_label_yields_none() {
        assert_eq!(extract_identifier("Nomor kartu: 123"), None);
        assert_eq!(extract_identifier(""), None);
    }

    #[test]
    fn first_match_wins() {
        let text = "Nomor SEP: AAA1\nNomor SEP: BBB2";
        assert_eq!(extract_identifier(text).as_deref(), Some("AAA1"));
    }

    #[test]
    fn normalize_strips_non_alphanumerics() {
        assert_eq!(normalize_identifier("ABC-123"), "ABC123");
        assert_eq!(normalize_identifier("a_b c.d"), "abcd");
        assert_eq!(normalize_identifier("0301R001"), "0301R001");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["ABC-123", "  x  ", "", "a1b2", "//--//"] {
            let once = normalize_identifier(s);
            assert_eq!(normalize_identifier(&once), once);
        }
    }

    #[test]
    fn normalize_preserves_case() {
        assert_eq!(normalize_identifier("AbC-dEf"), "AbCdEf");
    }
}
