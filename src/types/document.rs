//! Document type recovered from a corpus.

use serde::{Deserialize, Serialize};

use crate::DOCUMENT_KEY_PREFIX;

/// One logical document within a corpus.
///
/// Documents are created by the corpus splitter in corpus order and are never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Label taken from the marker line, or `document_<ordinal>` when absent
    pub label: String,

    /// 1-based position of the document's marker in the corpus
    pub ordinal: usize,

    /// Document body with surrounding whitespace trimmed
    pub raw_text: String,
}

impl Document {
    /// Create a document, falling back to a synthetic label when none is given.
    pub fn new(ordinal: usize, label: Option<&str>, raw_text: impl Into<String>) -> Self {
        let label = label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("document_{ordinal}"));

        Self {
            label,
            ordinal,
            raw_text: raw_text.into(),
        }
    }

    /// Key identifying this document, e.g. `DOCUMENT_3_report.pdf`.
    pub fn key(&self) -> String {
        format!("{}_{}_{}", DOCUMENT_KEY_PREFIX, self.ordinal, self.label)
    }

    /// Key made safe for use as a file stem.
    pub fn sanitized_key(&self) -> String {
        sanitize_key(&self.key())
    }

    /// Length of the body in characters.
    pub fn char_len(&self) -> usize {
        self.raw_text.chars().count()
    }
}

/// Replace every character that is not alphanumeric, space, `_` or `-` with `_`.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_uses_label_and_ordinal() {
        let doc = Document::new(1, Some("A"), "hello world");
        assert_eq!(doc.key(), "DOCUMENT_1_A");
        assert_eq!(doc.sanitized_key(), "DOCUMENT_1_A");
    }

    #[test]
    fn test_synthetic_label() {
        let doc = Document::new(4, None, "body");
        assert_eq!(doc.label, "document_4");

        let blank = Document::new(2, Some("   "), "body");
        assert_eq!(blank.label, "document_2");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        let doc = Document::new(2, Some("Q3 report/final.pdf"), "body");
        assert_eq!(doc.sanitized_key(), "DOCUMENT_2_Q3 report_final_pdf");
        assert_eq!(sanitize_key("a:b*c?d-e_f g"), "a_b_c_d-e_f g");
    }

    #[test]
    fn test_sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_key("Über café №1"), "Über café _1");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for key in ["DOCUMENT_1_A", "x/y\\z.txt", "  spaced  -- out ", "émoji 🚀 name", ""] {
            let once = sanitize_key(key);
            assert_eq!(sanitize_key(&once), once);
        }
    }

    #[test]
    fn test_char_len_counts_characters() {
        let doc = Document::new(1, None, "héllo");
        assert_eq!(doc.char_len(), 5);
        assert_eq!(doc.raw_text.len(), 6);
    }
}
