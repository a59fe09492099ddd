//! PDF text extraction with page tracking

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::PageBlock;

/// PDF extractor producing one text block per physical page
pub struct PdfExtractor;

impl PdfExtractor {
    /// Extract page-level text blocks from raw PDF bytes.
    ///
    /// Fails if the bytes are not a parseable PDF or the document has no
    /// pages. Pages whose text cannot be extracted (scanned/image-only
    /// pages) are emitted with empty text rather than treated as errors.
    pub fn extract(document_id: Uuid, data: &[u8]) -> Result<Vec<PageBlock>> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::extraction(format!("not a parseable PDF: {}", e)))?;

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(Error::extraction("PDF contains no pages"));
        }

        let page_texts = match pdf_extract::extract_text_from_mem_by_pages(data) {
            Ok(texts) => texts,
            Err(e) => {
                tracing::warn!("pdf-extract failed: {}, falling back to lopdf", e);
                pages
                    .keys()
                    .map(|&page_number| doc.extract_text(&[page_number]).unwrap_or_default())
                    .collect()
            }
        };

        let blocks = pages
            .keys()
            .enumerate()
            .map(|(i, &page_number)| PageBlock {
                document_id,
                page_number,
                text: normalize_text(page_texts.get(i).map(String::as_str).unwrap_or("")),
            })
            .collect();

        Ok(blocks)
    }
}

/// Clean up extracted text: strip NULs, trim line whitespace, drop blank lines
fn normalize_text(raw: &str) -> String {
    raw.replace('\0', "")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
