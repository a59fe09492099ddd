//! In-memory vector index with exact nearest-neighbor search

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

/// A chunk plus its embedding, as stored in the index
#[derive(Debug, Clone)]
pub struct IndexedVector {
    /// The indexed chunk
    pub chunk: Chunk,
    /// Embedding of the chunk text
    pub embedding: Vec<f32>,
}

/// Search result with the matched chunk and its cosine distance to the
/// query (lower is closer)
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub distance: f32,
}

/// Immutable vector index over one ingestion batch.
///
/// Built once per batch and replaced wholesale on re-ingestion; there is
/// no delete or update. Search is an exact scan with cosine distance,
/// which is plenty for the per-session index sizes this serves.
pub struct VectorIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    dimensions: usize,
    entries: Vec<IndexedVector>,
}

impl VectorIndex {
    /// Embed every chunk and build the index.
    ///
    /// Fails if `chunks` is empty: no retriever can be constructed from
    /// zero vectors, and callers are expected to route an empty corpus to
    /// a distinct "no documents" path instead.
    pub async fn build(
        embedder: Arc<dyn EmbeddingProvider>,
        chunks: Vec<Chunk>,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::index_build("cannot build an index over zero chunks"));
        }

        let dimensions = embedder.dimensions();
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                if embedding.len() != dimensions {
                    return Err(Error::embedding(format!(
                        "expected {}-dimensional embedding, got {}",
                        dimensions,
                        embedding.len()
                    )));
                }
                Ok(IndexedVector { chunk, embedding })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("built vector index over {} chunks", entries.len());

        Ok(Self {
            embedder,
            dimensions,
            entries,
        })
    }

    /// Rank all entries by ascending cosine distance to the query
    /// embedding and return the closest `k`. Ties keep indexing order
    /// (stable sort).
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                distance: cosine_distance(query, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        results
    }

    /// Embed the query text and return the `k` closest chunks
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        let embedding = self.embedder.embed(query).await?;
        Ok(self
            .search(&embedding, k)
            .into_iter()
            .map(|r| r.chunk)
            .collect())
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty (never true for a successfully built index)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimensionality of the index
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Cosine distance between two vectors: 0 for identical direction, 1 for
/// orthogonal. Zero-magnitude vectors are treated as maximally distant.
pub(crate) fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|y| y * y).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}
