//! Document, page, and chunk types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One document submitted for ingestion: a caller-supplied name and the
/// raw PDF bytes. Names are labels only and are not validated for
/// uniqueness.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Caller-supplied label (typically the uploaded filename)
    pub name: String,
    /// Raw PDF bytes
    pub data: Vec<u8>,
}

impl DocumentInput {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Text of one physical PDF page, in page order. Pages with no extractable
/// text are still emitted with an empty `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBlock {
    /// Document the page belongs to
    pub document_id: Uuid,
    /// 1-indexed physical page number
    pub page_number: u32,
    /// Extracted page text (may be empty)
    pub text: String,
}

/// A contiguous span of document text treated as one retrieval unit.
///
/// Chunks from one document are non-overlapping, ordered by
/// `start_offset`, and `text` is an exact substring of the document's
/// concatenated page text starting at that byte offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Byte offset of `text` within the concatenated document text
    pub start_offset: usize,
    /// Chunk text
    pub text: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(document_id: Uuid, start_offset: usize, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            start_offset,
            text,
        }
    }
}
