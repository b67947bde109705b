//! Plain text extraction strategy.

use std::path::Path;
use std::time::Instant;

use crate::detect::DocumentType;
use crate::error::Result;
use crate::model::{DocumentMetadata, ExtractionMethod, ExtractionResult, PageContent};
use crate::options::ProcessingOptions;
use crate::parser::text::read_text;
use crate::segment::split_text_pages;

use super::Extractor;

/// Decodes a text file and splits it into logical pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor.
    pub fn new() -> Self {
        Self
    }

    fn pages(&self, path: &Path, options: &ProcessingOptions) -> Result<(usize, Vec<PageContent>)> {
        let content = read_text(path, &options.encoding, options.error_handling)?;
        let chunks = split_text_pages(&content);
        let total_pages = chunks.len();

        let pages = chunks
            .into_iter()
            .take(options.page_limit(total_pages))
            .enumerate()
            .map(|(i, chunk)| PageContent::text_only(i + 1, chunk))
            .collect();

        Ok((total_pages, pages))
    }
}

impl Extractor for TextExtractor {
    fn document_type(&self) -> DocumentType {
        DocumentType::Txt
    }

    fn extract(&self, path: &Path, options: &ProcessingOptions) -> ExtractionResult {
        let start = Instant::now();
        let doc_type = self.document_type().as_str();

        match self.pages(path, options) {
            Ok((total_pages, pages)) => {
                let metadata = DocumentMetadata::new(
                    path,
                    doc_type,
                    ExtractionMethod::PlainText,
                    total_pages,
                    pages.len(),
                    start.elapsed().as_secs_f64(),
                );
                ExtractionResult::success(metadata, pages)
            }
            Err(e) => ExtractionResult::failure(
                DocumentMetadata::failed(path, doc_type, start.elapsed().as_secs_f64()),
                format!("TXT extraction failed: {}", e),
            ),
        }
    }
}
