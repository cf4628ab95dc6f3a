//! End-to-end chunking of one corpus.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::chunkers::{ChunkPlanner, Chunker};
use crate::corpus::DocumentSplitter;
use crate::output::ManifestEmitter;
use crate::types::{
    ChunkError, ChunkParams, ChunkedCorpus, ChunkedDocument, ChunkingConfig, Result, RunSummary,
};

/// Splits a corpus into documents, plans their chunks and writes them out.
pub struct ChunkingPipeline {
    splitter: DocumentSplitter,
    planner: ChunkPlanner,
    params: ChunkParams,
}

impl ChunkingPipeline {
    /// Create a pipeline with validated parameters and a document marker.
    pub fn new(params: ChunkParams, document_marker: &str) -> Result<Self> {
        Ok(Self {
            splitter: DocumentSplitter::new(document_marker)?,
            planner: ChunkPlanner::new(),
            params,
        })
    }

    /// Validate `config` and build a pipeline from it.
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        let params = config.validate()?;
        Self::new(params, &config.document_marker)
    }

    /// Get the run parameters.
    pub fn params(&self) -> &ChunkParams {
        &self.params
    }

    /// Chunk every document of `corpus` in memory.
    pub fn chunk_corpus(&self, corpus: &str) -> Result<ChunkedCorpus> {
        let documents = self.splitter.split(corpus);
        if documents.is_empty() {
            warn!(marker = self.splitter.marker(), "No documents found in corpus");
        }

        let mut chunked = Vec::with_capacity(documents.len());
        for document in documents {
            let chunks = self.planner.chunk(&document, &self.params)?;
            chunked.push(ChunkedDocument { document, chunks });
        }

        Ok(ChunkedCorpus {
            params: self.params,
            documents: chunked,
        })
    }

    /// Chunk `corpus` and write the result into `output_dir`.
    pub fn run(&self, corpus: &str, output_dir: &Path) -> Result<RunSummary> {
        let chunked = self.chunk_corpus(corpus)?;
        let summary = ManifestEmitter::new(output_dir).emit(&chunked)?;

        info!(
            documents = summary.total_documents,
            chunks = summary.total_chunks,
            "Processed corpus"
        );

        Ok(summary)
    }

    /// Read the corpus at `input` and write its chunks into `output_dir`.
    pub fn run_file(&self, input: &Path, output_dir: &Path) -> Result<RunSummary> {
        let corpus = fs::read_to_string(input).map_err(|source| ChunkError::ReadCorpus {
            path: input.to_path_buf(),
            source,
        })?;

        info!(
            input = %input.display(),
            bytes = corpus.len(),
            chunker = self.planner.name(),
            strategy = self.planner.description(),
            "Chunking corpus"
        );

        self.run(&corpus, output_dir)
    }
}
