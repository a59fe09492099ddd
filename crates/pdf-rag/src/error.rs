//! Error types for the RAG pipeline

use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// PDF extraction error (unparseable bytes or zero-page document)
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Index build error (empty chunk set)
    #[error("Index build failed: {0}")]
    IndexBuild(String),

    /// Batch ingestion error, wrapping the first failing document's error
    #[error("Ingestion failed for '{filename}': {source}")]
    Ingestion {
        filename: String,
        #[source]
        source: Box<Error>,
    },

    /// Answer generation error
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// Feedback log read/write error
    #[error("Feedback persistence failed: {0}")]
    Persistence(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an index build error
    pub fn index_build(message: impl Into<String>) -> Self {
        Self::IndexBuild(message.into())
    }

    /// Create an ingestion error wrapping a document-level failure
    pub fn ingestion(filename: impl Into<String>, source: Error) -> Self {
        Self::Ingestion {
            filename: filename.into(),
            source: Box::new(source),
        }
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create a persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }
}
