//! Error types for the chunking engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by a chunking run.
///
/// A corpus without document markers and documents with empty bodies are not
/// errors; they simply produce no chunks.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// Chunking parameters or options failed validation
    #[error("invalid chunking configuration: {0}")]
    InvalidConfig(String),

    /// Layered settings could not be loaded or deserialized
    #[error("failed to load settings: {0}")]
    Settings(#[from] ::config::ConfigError),

    /// The document marker did not compile into a pattern
    #[error("invalid document marker pattern: {0}")]
    Marker(#[from] regex::Error),

    /// The corpus file could not be read
    #[error("failed to read corpus {path}: {source}")]
    ReadCorpus {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A chunk, summary or manifest file could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON manifest could not be serialized
    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A chunker rejected a document
    #[error(transparent)]
    Chunking(#[from] anyhow::Error),

    /// A batch worker panicked or was cancelled
    #[error("chunking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ChunkError {
    /// Build a configuration error from any displayable reason.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        ChunkError::InvalidConfig(reason.into())
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, ChunkError>;
