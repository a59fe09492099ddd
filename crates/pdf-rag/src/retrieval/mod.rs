//! Vector storage and similarity search

pub mod index;

pub use index::{IndexedVector, SearchResult, VectorIndex};
