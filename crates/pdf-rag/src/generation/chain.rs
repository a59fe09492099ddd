//! End-to-end question answering over one vector index

use std::sync::Arc;

use crate::error::Result;
use crate::providers::GeneratorProvider;
use crate::retrieval::VectorIndex;

use super::prompt::PromptBuilder;

/// Marker some generators echo before their actual answer when they
/// repeat the templated prompt
const ANSWER_MARKER: &str = "Answer:";

/// Retrieval-augmented question answering: retrieve, assemble the prompt,
/// generate.
///
/// Stateless once constructed; safe to reuse across many questions.
pub struct RetrievalChain {
    index: Arc<VectorIndex>,
    generator: Arc<dyn GeneratorProvider>,
    top_k: usize,
}

impl RetrievalChain {
    /// Bind an index and a generator into a question-answering chain
    pub fn new(
        index: Arc<VectorIndex>,
        generator: Arc<dyn GeneratorProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            generator,
            top_k,
        }
    }

    /// Answer a question from the indexed documents.
    ///
    /// Generator failures propagate; callers that keep a transcript should
    /// record the error text in place of the answer (see `ChatSession`).
    pub async fn answer(&self, question: &str) -> Result<String> {
        let chunks = self.index.similarity_search(question, self.top_k).await?;
        let context = PromptBuilder::build_context(&chunks);
        let prompt = PromptBuilder::build_qa_prompt(question, &context);

        let output = self.generator.generate(&prompt).await?;
        Ok(strip_echoed_prompt(&output))
    }

    /// The bound vector index
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }
}

/// Keep only the text after the first `Answer:` marker when the generator
/// echoed the templated prompt; otherwise return the whole output trimmed.
fn strip_echoed_prompt(output: &str) -> String {
    match output.find(ANSWER_MARKER) {
        Some(pos) => output[pos + ANSWER_MARKER.len()..].trim().to_string(),
        None => output.trim().to_string(),
    }
}
