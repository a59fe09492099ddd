//! Batch ingestion: concurrent per-document extraction and chunking,
//! one combined index, one retrieval chain

use futures_util::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use uuid::Uuid;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::RetrievalChain;
use crate::providers::{EmbeddingProvider, GeneratorProvider};
use crate::retrieval::VectorIndex;
use crate::types::{Chunk, DocumentInput};

use super::chunker::SemanticChunker;
use super::extractor::PdfExtractor;

/// Coarse progress granularity: ten steps per document, reported as a
/// global fraction. A user-facing approximation, not an exact metric.
const PROGRESS_STEPS_PER_DOCUMENT: usize = 10;

/// Orchestrates one ingestion batch: fan-out extraction and chunking per
/// document, fan-in, then a single combined index and chain.
///
/// Only one batch may be in flight per coordinator instance; a second
/// `ingest` call waits for the first to finish. A started batch runs to
/// completion or failure (no mid-batch cancellation).
pub struct IngestionCoordinator {
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GeneratorProvider>,
    config: RagConfig,
    batch_lock: Mutex<()>,
}

impl IngestionCoordinator {
    /// Create a coordinator over the model capabilities
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GeneratorProvider>,
        config: RagConfig,
    ) -> Self {
        Self {
            embedder,
            generator,
            config,
            batch_lock: Mutex::new(()),
        }
    }

    /// Ingest a batch of PDFs and build one retrieval chain over all of
    /// them.
    ///
    /// Returns the chain plus per-document chunk counts in input order.
    /// If any document fails extraction the whole batch is rejected with
    /// the first failing document's error; the resulting index never
    /// silently omits a document.
    pub async fn ingest<F>(
        &self,
        documents: Vec<DocumentInput>,
        on_progress: F,
    ) -> Result<(RetrievalChain, Vec<usize>)>
    where
        F: Fn(f32) + Send + Sync,
    {
        let _batch = self.batch_lock.lock().await;

        let chunker = SemanticChunker::new(self.embedder.clone(), self.config.chunking.clone());
        let semaphore = Arc::new(Semaphore::new(
            self.config.processing.effective_parallel_files(),
        ));
        let total_steps = (documents.len() * PROGRESS_STEPS_PER_DOCUMENT).max(1);
        let steps_done = AtomicUsize::new(0);

        on_progress(0.0);

        let tasks = documents.iter().map(|doc| {
            let semaphore = Arc::clone(&semaphore);
            let chunker = &chunker;
            let steps_done = &steps_done;
            let on_progress = &on_progress;

            async move {
                let _permit = semaphore.acquire().await.unwrap();

                tracing::info!("ingesting '{}' ({} bytes)", doc.name, doc.data.len());
                let document_id = Uuid::new_v4();
                let blocks = PdfExtractor::extract(document_id, &doc.data)?;
                let chunks = chunker.split(&blocks).await?;

                for _ in 0..PROGRESS_STEPS_PER_DOCUMENT {
                    let done = steps_done.fetch_add(1, Ordering::Relaxed) + 1;
                    on_progress(done as f32 / total_steps as f32);
                }

                Ok::<Vec<Chunk>, Error>(chunks)
            }
        });

        let results = join_all(tasks).await;

        let mut per_document = Vec::with_capacity(documents.len());
        for (doc, result) in documents.iter().zip(results) {
            match result {
                Ok(chunks) => per_document.push(chunks),
                Err(e) => return Err(Error::ingestion(doc.name.clone(), e)),
            }
        }

        let chunk_counts: Vec<usize> = per_document.iter().map(Vec::len).collect();
        let combined: Vec<Chunk> = per_document.into_iter().flatten().collect();

        tracing::info!(
            "building combined index: {} chunks from {} documents",
            combined.len(),
            chunk_counts.len()
        );

        let index = VectorIndex::build(self.embedder.clone(), combined).await?;
        on_progress(1.0);

        let chain = RetrievalChain::new(
            Arc::new(index),
            self.generator.clone(),
            self.config.retrieval.top_k,
        );

        Ok((chain, chunk_counts))
    }
}
