//! Prompt assembly, the retrieval chain, and chat session state

pub mod chain;
pub mod prompt;
pub mod session;

pub use chain::RetrievalChain;
pub use prompt::PromptBuilder;
pub use session::{ChatHistory, ChatMessage, ChatRole, ChatSession};
