//! pdf-rag: PDF question answering with retrieval-augmented generation
//!
//! Ingests PDF documents, splits them into semantically coherent chunks
//! along embedding-distance breakpoints, indexes the chunks for
//! similarity search, and answers questions by conditioning an LLM on the
//! retrieved passages. A separate feedback store records per-answer
//! ratings for later analysis.
//!
//! The embedding and generation models are consumed through the
//! [`providers::EmbeddingProvider`] and [`providers::GeneratorProvider`]
//! traits; a local Ollama backend is bundled.

pub mod config;
pub mod error;
pub mod feedback;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use feedback::{FeedbackStore, Rating};
pub use generation::{ChatSession, RetrievalChain};
pub use ingestion::IngestionCoordinator;
pub use retrieval::VectorIndex;
pub use types::{Chunk, DocumentInput, PageBlock};
