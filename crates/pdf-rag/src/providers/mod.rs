//! Provider abstractions for embeddings and answer generation
//!
//! Trait-based capability interfaces so the pipeline stays independent of
//! the model backend. The bundled implementation talks to a local Ollama
//! server.

pub mod embedding;
pub mod generator;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use generator::GeneratorProvider;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaGenerator, OllamaProvider};
