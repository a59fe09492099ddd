//! Prompt templates for retrieval-augmented generation

use crate::types::Chunk;

/// Prompt builder for document-grounded question answering
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the retrieved context: chunk texts in ranked order, separated
    /// by a blank line
    pub fn build_context(chunks: &[Chunk]) -> String {
        chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Render the question-answering prompt.
    ///
    /// The template ends with an `Answer:` label; some models echo the
    /// whole templated prompt back, which the chain strips before
    /// returning the answer.
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Based on the following context, answer the question. Only use information from the context.

Context:
{context}

Question: {question}

Answer:"#
        )
    }
}
