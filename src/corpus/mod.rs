//! Corpus parsing: recovering documents from a delimited text blob.

mod splitter;

pub use splitter::DocumentSplitter;
