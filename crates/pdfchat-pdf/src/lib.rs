//! PDF ingestion
//!
//! Turns an uploaded PDF into one plain-text string: the extracted text of
//! every page, concatenated in page order. The extraction algorithm itself
//! belongs to `lopdf`; this crate only adapts it to the chat error taxonomy.

use lopdf::Document;
use pdfchat_types::{ChatError, Result};

/// Anything that can turn PDF bytes into text
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Extractor backed by `lopdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let document = Document::load_mem(bytes)
            .map_err(|e| ChatError::Extraction(format!("unreadable document: {}", e)))?;

        if document.is_encrypted() {
            return Err(ChatError::Extraction("document is encrypted".to_string()));
        }

        let mut text = String::new();
        // get_pages is keyed by page number, so iteration is already in page order
        for page_number in document.get_pages().keys() {
            let page_text = document.extract_text(&[*page_number]).map_err(|e| {
                ChatError::Extraction(format!("page {}: {}", page_number, e))
            })?;
            text.push_str(&page_text);
        }

        Ok(text)
    }
}

/// Extract text with the default extractor
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    LopdfExtractor.extract(bytes)
}
