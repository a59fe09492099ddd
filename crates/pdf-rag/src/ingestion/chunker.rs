//! Semantic chunking along embedding-distance breakpoints
//!
//! Boundaries fall where adjacent sentence buffers are semantically far
//! apart, instead of at fixed character counts.

use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::retrieval::index::cosine_distance;
use crate::types::{Chunk, PageBlock};

/// Splits a document's pages into semantically coherent chunks
pub struct SemanticChunker {
    embedder: Arc<dyn EmbeddingProvider>,
    config: ChunkingConfig,
}

impl SemanticChunker {
    /// Create a new chunker over an embedding capability
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, config: ChunkingConfig) -> Self {
        Self { embedder, config }
    }

    /// Split one document's page blocks into chunks.
    ///
    /// A document with no extractable text yields zero chunks; a document
    /// with a single sentence buffer yields exactly one chunk.
    pub async fn split(&self, blocks: &[PageBlock]) -> Result<Vec<Chunk>> {
        let Some(document_id) = blocks.first().map(|b| b.document_id) else {
            return Ok(Vec::new());
        };

        let text = blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let buffers = self.sentence_buffers(&text);
        if buffers.len() <= 1 {
            return Ok(vec![Chunk::new(document_id, 0, text)]);
        }

        let buffer_texts: Vec<String> = buffers
            .iter()
            .map(|&(start, end)| text[start..end].to_string())
            .collect();
        let embeddings = self.embedder.embed_batch(&buffer_texts).await?;

        let distances: Vec<f32> = embeddings
            .windows(2)
            .map(|pair| cosine_distance(&pair[0], &pair[1]))
            .collect();
        let threshold = breakpoint_threshold(&distances, self.config.breakpoint_percentile);

        tracing::debug!(
            "{} buffers, breakpoint threshold {:.4} at p{}",
            buffers.len(),
            threshold,
            self.config.breakpoint_percentile
        );

        let spans = self.split_spans(&buffers, &distances, threshold);
        let spans = self.merge_short_spans(&text, spans);

        Ok(spans
            .into_iter()
            .map(|(start, end)| Chunk::new(document_id, start, text[start..end].to_string()))
            .collect())
    }

    /// Group the text's sentences into buffers of `buffer_size`, each as a
    /// contiguous byte span. Spans tile the whole text.
    fn sentence_buffers(&self, text: &str) -> Vec<(usize, usize)> {
        let buffer_size = self.config.buffer_size.max(1);
        let sentences: Vec<(usize, &str)> = text.split_sentence_bound_indices().collect();

        sentences
            .chunks(buffer_size)
            .map(|group| {
                let (first_offset, _) = group[0];
                let (last_offset, last_text) = group[group.len() - 1];
                (first_offset, last_offset + last_text.len())
            })
            .collect()
    }

    /// Cut the buffer sequence at every pair whose distance exceeds the
    /// threshold, returning contiguous byte spans.
    fn split_spans(
        &self,
        buffers: &[(usize, usize)],
        distances: &[f32],
        threshold: f32,
    ) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut span_start = buffers[0].0;

        for (i, &distance) in distances.iter().enumerate() {
            if distance > threshold {
                spans.push((span_start, buffers[i].1));
                span_start = buffers[i + 1].0;
            }
        }
        spans.push((span_start, buffers[buffers.len() - 1].1));

        spans
    }

    /// Merge spans shorter than `min_chunk_size` characters into the
    /// following span. The document's final span is emitted as-is even if
    /// short.
    fn merge_short_spans(&self, text: &str, spans: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
        let mut merged = Vec::with_capacity(spans.len());
        let mut pending: Option<usize> = None;

        for (i, &(start, end)) in spans.iter().enumerate() {
            let start = pending.take().unwrap_or(start);
            let is_last = i == spans.len() - 1;
            let char_len = text[start..end].chars().count();

            if char_len < self.config.min_chunk_size && !is_last {
                pending = Some(start);
            } else {
                merged.push((start, end));
            }
        }

        merged
    }
}

/// Percentile of the distance distribution, with linear interpolation
/// between adjacent order statistics.
fn breakpoint_threshold(distances: &[f32], percentile: f64) -> f32 {
    let mut sorted = distances.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = percentile.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = (rank - lo as f64) as f32;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
