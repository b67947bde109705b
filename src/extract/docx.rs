//! DOCX extraction strategy.

use std::path::Path;
use std::time::Instant;

use crate::detect::DocumentType;
use crate::error::Result;
use crate::model::{DocumentMetadata, ExtractionMethod, ExtractionResult, PageContent};
use crate::options::ProcessingOptions;
use crate::parser::docx::read_paragraphs;
use crate::segment::group_paragraphs;

use super::Extractor;

/// Reads DOCX body paragraphs and groups them into logical pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new DOCX extractor.
    pub fn new() -> Self {
        Self
    }

    fn pages(&self, path: &Path, options: &ProcessingOptions) -> Result<(usize, Vec<PageContent>)> {
        let paragraphs = read_paragraphs(path)?;
        let groups = group_paragraphs(&paragraphs);
        let total_pages = groups.len();

        let pages = groups
            .iter()
            .take(options.page_limit(total_pages))
            .enumerate()
            .map(|(i, text)| PageContent::text_only(i + 1, text))
            .collect();

        Ok((total_pages, pages))
    }
}

impl Extractor for DocxExtractor {
    fn document_type(&self) -> DocumentType {
        DocumentType::Docx
    }

    fn extract(&self, path: &Path, options: &ProcessingOptions) -> ExtractionResult {
        let start = Instant::now();
        let doc_type = self.document_type().as_str();

        match self.pages(path, options) {
            Ok((total_pages, pages)) => {
                let metadata = DocumentMetadata::new(
                    path,
                    doc_type,
                    ExtractionMethod::DocxXml,
                    total_pages,
                    pages.len(),
                    start.elapsed().as_secs_f64(),
                );
                ExtractionResult::success(metadata, pages)
            }
            Err(e) => ExtractionResult::failure(
                DocumentMetadata::failed(path, doc_type, start.elapsed().as_secs_f64()),
                format!("DOCX extraction failed: {}", e),
            ),
        }
    }
}
