//! Chat session state: an explicit transcript instead of ambient globals

use chrono::{DateTime, Utc};

use crate::error::Result;

use super::chain::RetrievalChain;

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One transcript entry
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only conversation transcript
#[derive(Debug, Default)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user turn
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatRole::User, content.into());
    }

    /// Record an assistant turn
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatRole::Assistant, content.into());
    }

    fn push(&mut self, role: ChatRole, content: String) {
        self.messages.push(ChatMessage {
            role,
            content,
            timestamp: Utc::now(),
        });
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop the whole transcript
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// A retrieval chain plus its conversation transcript.
///
/// Generation failures are recorded as assistant turns containing the
/// error text, so a reader of the transcript sees why no answer appeared.
pub struct ChatSession {
    chain: RetrievalChain,
    history: ChatHistory,
}

impl ChatSession {
    /// Start a session over a freshly built chain
    pub fn new(chain: RetrievalChain) -> Self {
        Self {
            chain,
            history: ChatHistory::new(),
        }
    }

    /// Ask a question, recording both turns in the transcript
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        self.history.push_user(question);

        match self.chain.answer(question).await {
            Ok(answer) => {
                self.history.push_assistant(answer.clone());
                Ok(answer)
            }
            Err(e) => {
                self.history.push_assistant(e.to_string());
                Err(e)
            }
        }
    }

    /// The conversation transcript
    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Reset the transcript, keeping the chain
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// The underlying chain
    pub fn chain(&self) -> &RetrievalChain {
        &self.chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::VectorIndex;
    use crate::testutil::{CannedGenerator, FailingGenerator, KeywordEmbedder};
    use crate::types::Chunk;
    use std::sync::Arc;
    use uuid::Uuid;

    async fn index() -> Arc<VectorIndex> {
        Arc::new(
            VectorIndex::build(
                Arc::new(KeywordEmbedder),
                vec![Chunk::new(
                    Uuid::new_v4(),
                    0,
                    "Cats purr softly.".to_string(),
                )],
            )
            .await
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn ask_records_both_turns() {
        let chain = RetrievalChain::new(
            index().await,
            Arc::new(CannedGenerator::new("Answer: They do.")),
            4,
        );
        let mut session = ChatSession::new(chain);

        let answer = session.ask("Do cats purr?").await.unwrap();

        assert_eq!(answer, "They do.");
        let messages = session.history().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "Do cats purr?");
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, "They do.");
    }

    #[tokio::test]
    async fn generation_failure_is_recorded_in_the_transcript() {
        let chain = RetrievalChain::new(index().await, Arc::new(FailingGenerator), 4);
        let mut session = ChatSession::new(chain);

        let result = session.ask("Do cats purr?").await;
        assert!(result.is_err());

        let messages = session.history().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert!(messages[1].content.contains("Answer generation failed"));
    }

    #[tokio::test]
    async fn clear_history_empties_the_transcript() {
        let chain = RetrievalChain::new(
            index().await,
            Arc::new(CannedGenerator::new("ok")),
            4,
        );
        let mut session = ChatSession::new(chain);

        session.ask("Do cats purr?").await.unwrap();
        assert!(!session.history().is_empty());

        session.clear_history();
        assert!(session.history().is_empty());
    }
}
