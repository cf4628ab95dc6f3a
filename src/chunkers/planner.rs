//! Chunk planner deciding between a single chunk and tiered splitting.

use anyhow::Result;
use tracing::debug;

use super::base::{char_len, Chunker};
use super::tiered_splitter::{split_tier, Tier};
use crate::types::{Chunk, ChunkParams, Document, Segment};

/// Plans the chunks of one document.
///
/// A document that fits under the ceiling is kept whole. Anything longer is
/// split at the paragraph tier, which falls back to sentences and then words
/// for units that are still too large.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkPlanner;

impl ChunkPlanner {
    /// Create a new chunk planner.
    pub fn new() -> Self {
        Self
    }

    /// Plan the chunk texts of `text`.
    pub fn plan(&self, text: &str, params: &ChunkParams) -> Vec<String> {
        self.plan_segments(text, params)
            .into_iter()
            .map(|segment| segment.text)
            .collect()
    }

    /// Plan the chunks of `text`, keeping track of carried overlap.
    pub fn plan_segments(&self, text: &str, params: &ChunkParams) -> Vec<Segment> {
        if char_len(text) <= params.max_chunk_size {
            return vec![Segment::new(text)];
        }

        split_tier(Tier::Paragraph, text, params)
    }
}

impl Chunker for ChunkPlanner {
    fn name(&self) -> &'static str {
        "tiered"
    }

    fn description(&self) -> &'static str {
        "Splits oversized documents by paragraph, then sentence, then word"
    }

    fn chunk(&self, document: &Document, params: &ChunkParams) -> Result<Vec<Chunk>> {
        if document.raw_text.is_empty() {
            return Ok(vec![]);
        }

        let segments = self.plan_segments(&document.raw_text, params);
        debug!(
            document = %document.key(),
            chars = document.char_len(),
            chunks = segments.len(),
            "Planned document chunks"
        );

        Ok(segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| Chunk::new(document, i + 1, segment))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_document(text: &str) -> Document {
        Document::new(1, Some("test"), text)
    }

    #[test]
    fn test_small_text_is_single_chunk() {
        let planner = ChunkPlanner::new();
        let text = "Hello, world!\n\nStill   the same  chunk.";
        let chunks = planner.plan(text, &ChunkParams::default());
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_exact_ceiling_is_single_chunk() {
        let planner = ChunkPlanner::new();
        let text = "z".repeat(50);
        let params = ChunkParams::new(50, 10).unwrap();
        assert_eq!(planner.plan(&text, &params), vec![text.clone()]);
    }

    #[test]
    fn test_paragraph_documents_split() {
        let planner = ChunkPlanner::new();
        let paragraphs: Vec<String> = ["a", "b", "c"].iter().map(|c| c.repeat(1800)).collect();
        let text = paragraphs.join("\n\n");

        let chunks = planner.plan(&text, &ChunkParams::new(4000, 200).unwrap());
        assert_eq!(
            chunks,
            vec![
                format!("{}\n\n{}", paragraphs[0], paragraphs[1]),
                paragraphs[2].clone(),
            ]
        );
    }

    #[test]
    fn test_oversized_token_escape_valve() {
        let planner = ChunkPlanner::new();
        let token = "q".repeat(5000);
        let chunks = planner.plan(&token, &ChunkParams::new(4000, 200).unwrap());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chars().count(), 5000);
    }

    #[test]
    fn test_chunk_numbering_is_contiguous() {
        let planner = ChunkPlanner::new();
        let text = (0..40)
            .map(|i| format!("Sentence number {i} talks about chunking."))
            .collect::<Vec<_>>()
            .join(" ");
        let document = create_document(&text);
        let params = ChunkParams::new(200, 50).unwrap();

        let chunks = planner.chunk(&document, &params).unwrap();
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence_index, i + 1);
            assert_eq!(chunk.document_ordinal, 1);
            assert_eq!(chunk.document_key, "DOCUMENT_1_test");
            assert_eq!(chunk.len(), chunk.text.chars().count());
            assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn test_chunk_overlap_is_tracked() {
        let planner = ChunkPlanner::new();
        let s3 = "Birds sing loudly every single morning near the quiet lake.";
        let document = create_document(&format!("Cats nap. Dogs run. {s3}"));

        let chunks = planner
            .chunk(&document, &ChunkParams::new(60, 50).unwrap())
            .unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].overlap_len, 0);
        assert_eq!(chunks[1].fresh_text(), s3);
        assert!(chunks[1].text.starts_with("Cats nap. Dogs run. "));
    }

    #[test]
    fn test_empty_document() {
        let planner = ChunkPlanner::new();
        let document = create_document("");
        assert!(planner.chunk(&document, &ChunkParams::default()).unwrap().is_empty());
    }
}
