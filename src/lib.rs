//! Corpus Chunker Library
//!
//! Splits a flat corpus of delimited documents into bounded, slightly
//! overlapping chunks ready for embedding and retrieval. Oversized text is
//! split paragraph by paragraph, then sentence by sentence, then word by word.

pub mod batch;
pub mod chunkers;
pub mod corpus;
pub mod output;
pub mod pipeline;
pub mod types;

pub use types::{
    Chunk, ChunkError, ChunkParams, ChunkedCorpus, ChunkedDocument, ChunkingConfig, Document,
    OverlapMode, RunSummary, Segment,
};
pub use chunkers::{ChunkPlanner, Chunker, Tier};
pub use corpus::DocumentSplitter;
pub use output::ManifestEmitter;
pub use pipeline::ChunkingPipeline;
pub use batch::{BatchConfig, BatchProcessor, BatchResult, CorpusJob};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::types::*;
    pub use crate::chunkers::{ChunkPlanner, Chunker, Tier};
    pub use crate::corpus::DocumentSplitter;
    pub use crate::output::ManifestEmitter;
    pub use crate::pipeline::ChunkingPipeline;
    pub use crate::batch::*;
}

/// Default ceiling on chunk length, in characters
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 4000;

/// Default overlap budget, in characters
pub const DEFAULT_OVERLAP_BUDGET: usize = 200;

/// Default marker that opens each document in a corpus
pub const DEFAULT_DOCUMENT_MARKER: &str = "DOCUMENT:";

/// Prefix of every document key (`DOCUMENT_<ordinal>_<label>`)
pub const DOCUMENT_KEY_PREFIX: &str = "DOCUMENT";

/// Default destination directory for chunk files
pub const DEFAULT_OUTPUT_DIR: &str = "chunks";

/// Default number of corpora chunked at once in batch mode
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;
