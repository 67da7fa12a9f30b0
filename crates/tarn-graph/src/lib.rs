//! Worklist collections for Tarn's graph passes.
//!
//! - [`Heap`]: priority queue, min- or max-ordered, FIFO among equal priorities
//! - [`InvalidatableQueue`]: FIFO queue with O(1) logical removal
//! - [`Lineage`]: rooted discovery tree with path-to-root and leaf pruning

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod heap;
pub mod lineage;
pub mod queue;

pub use heap::{Heap, HeapOrder};
pub use lineage::Lineage;
pub use queue::InvalidatableQueue;
