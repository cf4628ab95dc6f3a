//! Manifest emitter writing chunk files and run summaries to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{ChunkError, ChunkedCorpus, ChunkedDocument, DocumentRecord, Result, RunSummary};

/// Plain-text summary written next to the chunk files.
pub const SUMMARY_FILE_NAME: &str = "_chunking_summary.txt";

/// Machine-readable manifest written next to the chunk files.
pub const MANIFEST_FILE_NAME: &str = "_chunking_manifest.json";

/// Writes one file per chunk plus a summary of the run.
///
/// Files are named after the document's sanitized key: `<key>.txt` when the
/// document produced a single chunk, `<key>_part<N>.txt` otherwise. Any write
/// failure aborts the run; a directory left behind by a failed run should not
/// be trusted.
pub struct ManifestEmitter {
    output_dir: PathBuf,
}

impl ManifestEmitter {
    /// Create an emitter writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Get the destination directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write every chunk of `corpus`, then the summary and the manifest.
    pub fn emit(&self, corpus: &ChunkedCorpus) -> Result<RunSummary> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ChunkError::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut records = Vec::with_capacity(corpus.documents.len());
        for document in &corpus.documents {
            records.push(self.write_document(document)?);
        }

        let summary = RunSummary {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            max_chunk_size: corpus.params.max_chunk_size,
            overlap_budget: corpus.params.overlap_budget,
            overlap_mode: corpus.params.overlap_mode,
            total_documents: records.len(),
            total_chunks: records.iter().map(|r| r.chunk_count).sum(),
            documents: records,
        };

        self.write_file(SUMMARY_FILE_NAME, &render_summary(&summary))?;
        self.write_file(MANIFEST_FILE_NAME, &serde_json::to_string_pretty(&summary)?)?;

        info!(
            output_dir = %self.output_dir.display(),
            documents = summary.total_documents,
            chunks = summary.total_chunks,
            "Wrote chunk manifest"
        );

        Ok(summary)
    }

    fn write_document(&self, chunked: &ChunkedDocument) -> Result<DocumentRecord> {
        let file_stem = chunked.document.sanitized_key();
        let total = chunked.chunks.len();
        let mut files = Vec::with_capacity(total);

        for chunk in &chunked.chunks {
            let file_name = chunk_file_name(&file_stem, chunk.sequence_index, total);
            self.write_file(&file_name, &chunk.text)?;
            files.push(file_name);
        }

        debug!(document = %file_stem, chunks = total, "Wrote document chunks");

        Ok(DocumentRecord {
            key: chunked.document.key(),
            file_stem,
            ordinal: chunked.document.ordinal,
            label: chunked.document.label.clone(),
            chunk_count: total,
            files,
        })
    }

    fn write_file(&self, file_name: &str, contents: &str) -> Result<()> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, contents).map_err(|source| ChunkError::Write { path, source })
    }
}

/// File name of chunk `index` (1-based) out of `total` for a document.
pub fn chunk_file_name(file_stem: &str, index: usize, total: usize) -> String {
    if total == 1 {
        format!("{file_stem}.txt")
    } else {
        format!("{file_stem}_part{index}.txt")
    }
}

/// Render the plain-text run summary.
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str("Chunking Summary\n");
    out.push_str(&"=".repeat(80));
    out.push('\n');
    out.push_str(&format!(
        "Max size: {} | Overlap: {}\n",
        summary.max_chunk_size, summary.overlap_budget
    ));
    out.push_str(&format!(
        "Docs: {} | Chunks: {}\n\n",
        summary.total_documents, summary.total_chunks
    ));
    for record in &summary.documents {
        out.push_str(&format!("{}: {} chunk(s)\n", record.key, record.chunk_count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkParams, Document, Segment};
    use pretty_assertions::assert_eq;

    fn chunked(document: Document, texts: &[&str]) -> ChunkedDocument {
        let chunks = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(&document, i + 1, Segment::new(*text)))
            .collect();
        ChunkedDocument { document, chunks }
    }

    fn sample_corpus() -> ChunkedCorpus {
        ChunkedCorpus {
            params: ChunkParams::default(),
            documents: vec![
                chunked(Document::new(1, Some("A"), "hello world"), &["hello world"]),
                chunked(
                    Document::new(2, Some("report/v2.pdf"), "one two"),
                    &["one", "two"],
                ),
            ],
        }
    }

    #[test]
    fn test_chunk_file_names() {
        assert_eq!(chunk_file_name("DOCUMENT_1_A", 1, 1), "DOCUMENT_1_A.txt");
        assert_eq!(chunk_file_name("DOCUMENT_1_A", 1, 3), "DOCUMENT_1_A_part1.txt");
        assert_eq!(chunk_file_name("DOCUMENT_1_A", 3, 3), "DOCUMENT_1_A_part3.txt");
    }

    #[test]
    fn test_emit_writes_chunks_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("chunks");
        let summary = ManifestEmitter::new(&out).emit(&sample_corpus()).unwrap();

        assert_eq!(summary.total_documents, 2);
        assert_eq!(summary.total_chunks, 3);
        assert_eq!(
            fs::read_to_string(out.join("DOCUMENT_1_A.txt")).unwrap(),
            "hello world"
        );
        assert_eq!(
            fs::read_to_string(out.join("DOCUMENT_2_report_v2_pdf_part1.txt")).unwrap(),
            "one"
        );
        assert_eq!(
            fs::read_to_string(out.join("DOCUMENT_2_report_v2_pdf_part2.txt")).unwrap(),
            "two"
        );
        assert_eq!(
            summary.documents[1].files,
            vec![
                "DOCUMENT_2_report_v2_pdf_part1.txt".to_string(),
                "DOCUMENT_2_report_v2_pdf_part2.txt".to_string(),
            ]
        );

        let text = fs::read_to_string(out.join(SUMMARY_FILE_NAME)).unwrap();
        let expected = format!(
            "Chunking Summary\n{}\nMax size: 4000 | Overlap: 200\nDocs: 2 | Chunks: 3\n\nDOCUMENT_1_A: 1 chunk(s)\nDOCUMENT_2_report/v2.pdf: 2 chunk(s)\n",
            "=".repeat(80)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_emit_writes_json_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let summary = ManifestEmitter::new(dir.path()).emit(&sample_corpus()).unwrap();

        let raw = fs::read_to_string(dir.path().join(MANIFEST_FILE_NAME)).unwrap();
        let parsed: RunSummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.run_id, summary.run_id);
        assert_eq!(parsed.documents, summary.documents);

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["overlap_mode"], "tiered");
        assert_eq!(value["documents"][0]["file_stem"], "DOCUMENT_1_A");
    }

    #[test]
    fn test_emit_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = ChunkedCorpus {
            params: ChunkParams::default(),
            documents: vec![],
        };
        let summary = ManifestEmitter::new(dir.path()).emit(&corpus).unwrap();

        assert_eq!(summary.total_chunks, 0);
        assert!(dir.path().join(SUMMARY_FILE_NAME).exists());
    }

    #[test]
    fn test_unwritable_destination_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-directory");
        fs::write(&blocker, "occupied").unwrap();

        let err = ManifestEmitter::new(&blocker).emit(&sample_corpus()).unwrap_err();
        match err {
            ChunkError::Write { path, .. } => assert_eq!(path, blocker),
            other => panic!("unexpected error: {other}"),
        }
    }
}
