//! Document splitter for delimited corpora.

use regex::Regex;
use tracing::debug;

use crate::types::{ChunkError, Document, Result};
use crate::DEFAULT_DOCUMENT_MARKER;

/// Splits a corpus into documents at marker lines.
///
/// A marker line starts with the marker (leading spaces or tabs allowed) and
/// may carry the document label on the rest of the line:
///
/// ```text
/// DOCUMENT: annual-report.pdf
/// body text...
/// ```
///
/// The marker is only recognised at the start of a line, so the same text
/// appearing mid-sentence does not open a new document.
#[derive(Debug, Clone)]
pub struct DocumentSplitter {
    marker: String,
    pattern: Regex,
}

/// Position of a marker line and the label it carries.
struct Header<'a> {
    start: usize,
    end: usize,
    label: &'a str,
}

impl DocumentSplitter {
    /// Create a splitter for the given marker text.
    pub fn new(marker: &str) -> Result<Self> {
        let marker = marker.trim();
        if marker.is_empty() {
            return Err(ChunkError::invalid_config("document_marker must not be blank"));
        }

        let pattern = Regex::new(&format!(
            r"(?m)^[ \t]*{}[ \t]*(.*?)[ \t]*\r?$",
            regex::escape(marker)
        ))?;

        Ok(Self {
            marker: marker.to_string(),
            pattern,
        })
    }

    /// Get the marker text.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Split `corpus` into documents in corpus order.
    ///
    /// A corpus without any marker yields no documents. Documents whose body
    /// is blank are dropped; the remaining documents keep the ordinal of
    /// their marker.
    pub fn split(&self, corpus: &str) -> Vec<Document> {
        let headers: Vec<Header<'_>> = self
            .pattern
            .captures_iter(corpus)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(Header {
                    start: whole.start(),
                    end: whole.end(),
                    label: caps.get(1).map_or("", |m| m.as_str()),
                })
            })
            .collect();

        let mut documents = Vec::with_capacity(headers.len());

        for (i, header) in headers.iter().enumerate() {
            let ordinal = i + 1;
            let body_end = headers.get(i + 1).map_or(corpus.len(), |next| next.start);
            let body = corpus[header.end..body_end].trim();

            if body.is_empty() {
                debug!(ordinal, label = header.label, "Dropping document with empty body");
                continue;
            }

            documents.push(Document::new(ordinal, Some(header.label), body));
        }

        debug!(
            markers = headers.len(),
            documents = documents.len(),
            "Split corpus into documents"
        );

        documents
    }
}

impl Default for DocumentSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT_MARKER).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_document() {
        let documents = DocumentSplitter::default().split("DOCUMENT: A\nhello world");
        assert_eq!(documents, vec![Document::new(1, Some("A"), "hello world")]);
        assert_eq!(documents[0].key(), "DOCUMENT_1_A");
    }

    #[test]
    fn test_multiple_documents_in_order() {
        let corpus = "\nDOCUMENT: first.pdf\nAlpha text.\n\nMore alpha.\nDOCUMENT: second.pdf\nBeta text.\n";
        let documents = DocumentSplitter::default().split(corpus);

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].label, "first.pdf");
        assert_eq!(documents[0].raw_text, "Alpha text.\n\nMore alpha.");
        assert_eq!(documents[1].ordinal, 2);
        assert_eq!(documents[1].raw_text, "Beta text.");
    }

    #[test]
    fn test_no_markers_yields_nothing() {
        let documents = DocumentSplitter::default().split("just some text\nwith no markers");
        assert!(documents.is_empty());
    }

    #[test]
    fn test_text_before_first_marker_is_ignored() {
        let documents = DocumentSplitter::default().split("preamble\nDOCUMENT: x\nbody");
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].raw_text, "body");
    }

    #[test]
    fn test_missing_label_gets_synthetic_label() {
        let documents = DocumentSplitter::default().split("DOCUMENT:\nfirst body\nDOCUMENT:   \nsecond body");
        assert_eq!(documents[0].label, "document_1");
        assert_eq!(documents[0].raw_text, "first body");
        assert_eq!(documents[1].label, "document_2");
    }

    #[test]
    fn test_empty_documents_are_dropped() {
        let corpus = "DOCUMENT: empty\n   \n\nDOCUMENT: full\ncontent";
        let documents = DocumentSplitter::default().split(corpus);

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].label, "full");
        assert_eq!(documents[0].ordinal, 2);
        assert_eq!(documents[0].key(), "DOCUMENT_2_full");
    }

    #[test]
    fn test_marker_mid_line_is_not_a_boundary() {
        let corpus = "DOCUMENT: a\nThe word DOCUMENT: appears here.\n  DOCUMENT: b\nsecond";
        let documents = DocumentSplitter::default().split(corpus);

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].raw_text, "The word DOCUMENT: appears here.");
        assert_eq!(documents[1].label, "b");
    }

    #[test]
    fn test_crlf_line_endings() {
        let documents = DocumentSplitter::default().split("DOCUMENT: win\r\nline one\r\n");
        assert_eq!(documents[0].label, "win");
        assert_eq!(documents[0].raw_text, "line one");
    }

    #[test]
    fn test_custom_marker_is_escaped() {
        let splitter = DocumentSplitter::new("=== DOC (start) ===").unwrap();
        let documents = splitter.split("=== DOC (start) === notes\nbody\n=== DOC (start) ===\nother");

        assert_eq!(splitter.marker(), "=== DOC (start) ===");
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].label, "notes");
        assert_eq!(documents[1].label, "document_2");
    }

    #[test]
    fn test_blank_marker_rejected() {
        assert!(matches!(
            DocumentSplitter::new("  "),
            Err(ChunkError::InvalidConfig(_))
        ));
    }
}
