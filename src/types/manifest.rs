//! Manifest records describing a completed run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OverlapMode;

/// Per-document entry of the run manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unsanitized document key
    pub key: String,

    /// Sanitized key used to name the chunk files
    pub file_stem: String,

    /// Document ordinal in the corpus
    pub ordinal: usize,

    /// Document label
    pub label: String,

    /// Number of chunks written for this document
    pub chunk_count: usize,

    /// Chunk file names in emission order
    pub files: Vec<String>,
}

/// Summary of one chunking run, written next to the chunk files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique identifier for this run
    pub run_id: Uuid,

    /// When the manifest was written
    pub generated_at: DateTime<Utc>,

    /// Ceiling used for the run
    pub max_chunk_size: usize,

    /// Overlap budget used for the run
    pub overlap_budget: usize,

    /// Overlap-carry policy used for the run
    pub overlap_mode: OverlapMode,

    /// Number of documents chunked
    pub total_documents: usize,

    /// Number of chunk files written
    pub total_chunks: usize,

    /// Per-document records in corpus order
    pub documents: Vec<DocumentRecord>,
}
