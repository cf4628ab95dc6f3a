//! Core types for the chunking engine.

mod chunk;
mod config;
mod document;
mod error;
mod manifest;

pub use chunk::{Chunk, ChunkedCorpus, ChunkedDocument, Segment};
pub use config::{ChunkParams, ChunkingConfig, OverlapMode};
pub use document::{sanitize_key, Document};
pub use error::{ChunkError, Result};
pub use manifest::{DocumentRecord, RunSummary};
