//! Document ingestion: PDF extraction, semantic chunking, batch coordination

pub mod chunker;
pub mod extractor;
pub mod pipeline;

pub use chunker::SemanticChunker;
pub use extractor::PdfExtractor;
pub use pipeline::IngestionCoordinator;
