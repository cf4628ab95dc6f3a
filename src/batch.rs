//! Batch processing of independent corpora.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::pipeline::ChunkingPipeline;
use crate::types::{ChunkError, Result, RunSummary};
use crate::DEFAULT_BATCH_CONCURRENCY;

/// Configuration for batch processing.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum corpora chunked concurrently
    pub concurrency: usize,
    /// Whether to continue when a corpus fails
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_BATCH_CONCURRENCY,
            continue_on_error: true,
        }
    }
}

/// One corpus file and the directory its chunks go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
}

/// Outcome of a successfully chunked corpus.
#[derive(Debug, Clone)]
pub struct CorpusReport {
    pub input: PathBuf,
    pub summary: RunSummary,
}

/// Error during batch processing.
#[derive(Debug, Clone)]
pub struct BatchError {
    pub input: PathBuf,
    pub error: String,
}

/// Result of batch processing.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub total_corpora: usize,
    pub processed_corpora: usize,
    pub failed_corpora: usize,
    pub total_documents: usize,
    pub total_chunks: usize,
    pub reports: Vec<CorpusReport>,
    pub errors: Vec<BatchError>,
}

/// Runs the chunking pipeline over several corpora at once.
///
/// Each corpus is chunked on its own blocking task; corpora share nothing
/// but the read-only pipeline.
pub struct BatchProcessor {
    pipeline: Arc<ChunkingPipeline>,
    config: BatchConfig,
}

impl BatchProcessor {
    /// Create a new batch processor.
    pub fn new(pipeline: Arc<ChunkingPipeline>, config: BatchConfig) -> Self {
        Self { pipeline, config }
    }

    /// Chunk every job, at most `concurrency` at a time.
    ///
    /// With `continue_on_error` unset, the first failure is returned and the
    /// remaining jobs are abandoned. Reports are sorted by input path.
    pub async fn process_batch(&self, jobs: Vec<CorpusJob>) -> Result<BatchResult> {
        let total_corpora = jobs.len();
        info!(total_corpora, concurrency = self.config.concurrency, "Starting batch processing");

        let mut outcomes = stream::iter(jobs.into_iter().map(|job| {
            let pipeline = Arc::clone(&self.pipeline);
            async move {
                let input = job.input.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    pipeline.run_file(&job.input, &job.output_dir)
                })
                .await;
                (input, outcome)
            }
        }))
        .buffer_unordered(self.config.concurrency.max(1));

        let mut reports = Vec::new();
        let mut errors = Vec::new();

        while let Some((input, outcome)) = outcomes.next().await {
            match outcome.map_err(ChunkError::from).and_then(|result| result) {
                Ok(summary) => reports.push(CorpusReport { input, summary }),
                Err(e) => {
                    if !self.config.continue_on_error {
                        return Err(e);
                    }

                    warn!(input = %input.display(), error = %e, "Failed to chunk corpus");
                    errors.push(BatchError {
                        input,
                        error: e.to_string(),
                    });
                }
            }
        }

        reports.sort_by(|a, b| a.input.cmp(&b.input));
        errors.sort_by(|a, b| a.input.cmp(&b.input));

        let result = BatchResult {
            total_corpora,
            processed_corpora: reports.len(),
            failed_corpora: errors.len(),
            total_documents: reports.iter().map(|r| r.summary.total_documents).sum(),
            total_chunks: reports.iter().map(|r| r.summary.total_chunks).sum(),
            reports,
            errors,
        };

        info!(
            processed = result.processed_corpora,
            failed = result.failed_corpora,
            documents = result.total_documents,
            chunks = result.total_chunks,
            "Batch processing complete"
        );

        Ok(result)
    }
}

/// Assign an output directory to each input.
///
/// A single input writes straight into `output_dir`. Several inputs each get
/// a subdirectory named after the file stem, suffixed with the input's
/// position when two inputs share a stem. A suffixed name that collides with
/// another input's stem is suffixed again until every directory is distinct.
pub fn plan_jobs(inputs: &[PathBuf], output_dir: &Path) -> Vec<CorpusJob> {
    if let [input] = inputs {
        return vec![CorpusJob {
            input: input.clone(),
            output_dir: output_dir.to_path_buf(),
        }];
    }

    let stems: Vec<String> = inputs.iter().map(|input| corpus_stem(input)).collect();
    let mut stem_counts: HashMap<&str, usize> = HashMap::new();
    for stem in &stems {
        *stem_counts.entry(stem.as_str()).or_insert(0) += 1;
    }

    // Unique stems keep their bare name, so reserve those first.
    let mut taken: HashSet<String> = stems
        .iter()
        .filter(|stem| stem_counts[stem.as_str()] == 1)
        .cloned()
        .collect();

    inputs
        .iter()
        .zip(&stems)
        .enumerate()
        .map(|(i, (input, stem))| {
            let dir_name = if stem_counts[stem.as_str()] > 1 {
                let mut name = format!("{stem}_{}", i + 1);
                while taken.contains(&name) {
                    name.push('_');
                    name.push_str(&(i + 1).to_string());
                }
                taken.insert(name.clone());
                name
            } else {
                stem.clone()
            };
            CorpusJob {
                input: input.clone(),
                output_dir: output_dir.join(dir_name),
            }
        })
        .collect()
}

fn corpus_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string())
}
