//! Chunk planning and tiered splitting.

mod base;
mod planner;
mod tiered_splitter;

pub use base::{char_len, Chunker};
pub use planner::ChunkPlanner;
pub use tiered_splitter::{split_tier, Tier};
