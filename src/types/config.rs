//! Configuration types for chunking.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ChunkError, Result};
use crate::{
    DEFAULT_BATCH_CONCURRENCY, DEFAULT_DOCUMENT_MARKER, DEFAULT_MAX_CHUNK_SIZE,
    DEFAULT_OUTPUT_DIR, DEFAULT_OVERLAP_BUDGET,
};

/// Name of the settings file looked up when none is given explicitly.
const DEFAULT_SETTINGS_FILE: &str = "chunker";

/// Prefix of environment variables that override settings.
const ENV_PREFIX: &str = "CHUNKER";

/// How trailing text of a flushed chunk is carried into the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapMode {
    /// Paragraphs carry the last unit, sentences the last one or two units,
    /// words a greedy window under the overlap budget.
    #[default]
    Tiered,
    /// Every tier carries a greedy window of trailing units under the budget.
    SlidingWindow,
}

impl std::fmt::Display for OverlapMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlapMode::Tiered => write!(f, "tiered"),
            OverlapMode::SlidingWindow => write!(f, "sliding_window"),
        }
    }
}

impl FromStr for OverlapMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "tiered" => Ok(OverlapMode::Tiered),
            "sliding_window" | "sliding" => Ok(OverlapMode::SlidingWindow),
            other => Err(format!(
                "unknown overlap mode `{other}` (expected `tiered` or `sliding_window`)"
            )),
        }
    }
}

/// Raw chunking settings as loaded from defaults, file and environment.
///
/// Sizes are kept signed so that negative values coming from a file or the
/// environment reach [`ChunkingConfig::validate`] and are rejected there with
/// a readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Ceiling on chunk length in characters
    pub max_chunk_size: i64,

    /// Threshold governing how much trailing text is carried over
    pub overlap_budget: i64,

    /// Marker line that opens each document in the corpus
    pub document_marker: String,

    /// Overlap-carry policy
    pub overlap_mode: OverlapMode,

    /// Destination directory for chunk files
    pub output_dir: String,

    /// Number of corpora processed at once in batch mode
    pub batch_concurrency: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE as i64,
            overlap_budget: DEFAULT_OVERLAP_BUDGET as i64,
            document_marker: DEFAULT_DOCUMENT_MARKER.to_string(),
            overlap_mode: OverlapMode::default(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

impl ChunkingConfig {
    /// Load settings from an optional TOML file and `CHUNKER_*` variables.
    ///
    /// An explicit `settings_file` must exist; otherwise `chunker.toml` in the
    /// working directory is used when present. Environment variables win over
    /// the file, and missing keys fall back to the built-in defaults.
    pub fn load(settings_file: Option<&Path>) -> Result<Self> {
        let file_source = match settings_file {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };

        let settings = ::config::Config::builder()
            .add_source(file_source)
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Check the settings and turn them into run parameters.
    pub fn validate(&self) -> Result<ChunkParams> {
        if self.max_chunk_size <= 0 {
            return Err(ChunkError::invalid_config(format!(
                "max_chunk_size must be positive, got {}",
                self.max_chunk_size
            )));
        }
        if self.overlap_budget < 0 {
            return Err(ChunkError::invalid_config(format!(
                "overlap_budget must not be negative, got {}",
                self.overlap_budget
            )));
        }
        if self.document_marker.trim().is_empty() {
            return Err(ChunkError::invalid_config("document_marker must not be blank"));
        }
        if self.batch_concurrency == 0 {
            return Err(ChunkError::invalid_config("batch_concurrency must be at least 1"));
        }

        Ok(ChunkParams::new(self.max_chunk_size as usize, self.overlap_budget as usize)?
            .with_overlap_mode(self.overlap_mode))
    }
}

/// Validated parameters for a single chunking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkParams {
    /// Maximum characters per chunk
    pub max_chunk_size: usize,

    /// Overlap threshold in characters
    pub overlap_budget: usize,

    /// Overlap-carry policy
    pub overlap_mode: OverlapMode,
}

impl ChunkParams {
    /// Create parameters, rejecting a zero ceiling or a budget not below it.
    pub fn new(max_chunk_size: usize, overlap_budget: usize) -> Result<Self> {
        if max_chunk_size == 0 {
            return Err(ChunkError::invalid_config("max_chunk_size must be positive, got 0"));
        }
        if overlap_budget >= max_chunk_size {
            return Err(ChunkError::invalid_config(format!(
                "overlap_budget ({overlap_budget}) must be smaller than max_chunk_size ({max_chunk_size})"
            )));
        }

        Ok(Self {
            max_chunk_size,
            overlap_budget,
            overlap_mode: OverlapMode::default(),
        })
    }

    /// Set the overlap mode.
    pub fn with_overlap_mode(mut self, overlap_mode: OverlapMode) -> Self {
        self.overlap_mode = overlap_mode;
        self
    }
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            overlap_budget: DEFAULT_OVERLAP_BUDGET,
            overlap_mode: OverlapMode::default(),
        }
    }
}
