//! Output sinks for chunked corpora.

mod manifest;

pub use manifest::{
    chunk_file_name, render_summary, ManifestEmitter, MANIFEST_FILE_NAME, SUMMARY_FILE_NAME,
};
