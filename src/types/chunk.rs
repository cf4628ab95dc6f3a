//! Chunk type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ChunkParams, Document};

/// A planned piece of chunk text before document identity is attached.
///
/// `overlap_len` is the byte length of the prefix carried over from the
/// previous chunk, separator included, so `fresh()` is the text this chunk
/// contributes for the first time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub overlap_len: usize,
}

impl Segment {
    /// A segment that carries nothing from its predecessor.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            overlap_len: 0,
        }
    }

    /// Create a segment whose first `overlap_len` bytes repeat earlier text.
    pub fn with_overlap(text: impl Into<String>, overlap_len: usize) -> Self {
        Self {
            text: text.into(),
            overlap_len,
        }
    }

    /// Text that did not appear in the previous chunk.
    pub fn fresh(&self) -> &str {
        &self.text[self.overlap_len..]
    }

    /// Carried-over prefix, separator included.
    pub fn overlap(&self) -> &str {
        &self.text[..self.overlap_len]
    }
}

/// A chunk of a document.
///
/// Chunks are the unit of output: each is written to its own file and later
/// embedded and indexed independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk
    pub id: Uuid,

    /// Ordinal of the document this chunk belongs to
    pub document_ordinal: usize,

    /// Key of the document this chunk belongs to
    pub document_key: String,

    /// Position of this chunk within its document (1-based)
    pub sequence_index: usize,

    /// The chunk text
    pub text: String,

    /// Length of the text in characters
    pub char_count: usize,

    /// Bytes at the start of `text` repeated from the previous chunk
    pub overlap_len: usize,

    /// When this chunk was created
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    /// Attach document identity to a planned segment.
    pub fn new(document: &Document, sequence_index: usize, segment: Segment) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_ordinal: document.ordinal,
            document_key: document.key(),
            sequence_index,
            char_count: segment.text.chars().count(),
            overlap_len: segment.overlap_len,
            text: segment.text,
            created_at: Utc::now(),
        }
    }

    /// Get the length of the chunk in characters.
    pub fn len(&self) -> usize {
        self.char_count
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text that did not appear in the previous chunk.
    pub fn fresh_text(&self) -> &str {
        &self.text[self.overlap_len..]
    }
}

/// A document together with its ordered chunks.
#[derive(Debug, Clone)]
pub struct ChunkedDocument {
    pub document: Document,
    pub chunks: Vec<Chunk>,
}

/// Every chunked document of one corpus, in corpus order.
#[derive(Debug, Clone)]
pub struct ChunkedCorpus {
    pub params: ChunkParams,
    pub documents: Vec<ChunkedDocument>,
}

impl ChunkedCorpus {
    /// Total number of chunks across all documents.
    pub fn total_chunks(&self) -> usize {
        self.documents.iter().map(|d| d.chunks.len()).sum()
    }

    /// Check if the corpus produced no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
