//! Base trait for all chunkers.

use anyhow::Result;

use crate::types::{Chunk, ChunkParams, Document};

/// The core trait that all chunkers must implement.
///
/// A chunker takes a document and splits it into chunks that are suitable for
/// embedding and retrieval.
pub trait Chunker: Send + Sync {
    /// Get the name of this chunker.
    fn name(&self) -> &'static str;

    /// Chunk the given document with the provided parameters.
    ///
    /// # Arguments
    /// * `document` - The document to chunk
    /// * `params` - Size ceiling, overlap budget and overlap mode
    ///
    /// # Returns
    /// The document's chunks, numbered contiguously from 1. The tiered
    /// planner never fails; an error rejects the document and aborts the run
    /// as [`ChunkError::Chunking`](crate::types::ChunkError::Chunking).
    fn chunk(&self, document: &Document, params: &ChunkParams) -> Result<Vec<Chunk>>;

    /// Get the description of this chunker.
    fn description(&self) -> &'static str {
        "A text chunker"
    }
}

/// Length of `text` in characters.
///
/// All size budgets are expressed in characters, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
