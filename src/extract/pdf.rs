//! PDF extraction strategy: primary backend with a fallback.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

use crate::detect::DocumentType;
use crate::error::{Error, Result};
use crate::model::{DocumentMetadata, ExtractionMethod, ExtractionResult, PageContent};
use crate::options::ProcessingOptions;
use crate::parser::{LopdfBackend, PdfBackend, PdfContent, PdfExtractBackend};

use super::Extractor;

/// Extracts PDF pages, falling back to a second backend when the first fails.
pub struct PdfExtractor {
    primary: Box<dyn PdfBackend>,
    fallback: Box<dyn PdfBackend>,
}

impl PdfExtractor {
    /// Create an extractor with the lopdf primary and pdf-extract fallback.
    pub fn new() -> Self {
        Self::with_backends(LopdfBackend::new(), PdfExtractBackend)
    }

    /// Create an extractor with custom backends.
    pub fn with_backends(
        primary: impl PdfBackend + 'static,
        fallback: impl PdfBackend + 'static,
    ) -> Self {
        Self {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }
    }

    /// Run the primary backend, then the fallback if it fails.
    ///
    /// When both fail the primary error is returned.
    fn run(&self, path: &Path, options: &ProcessingOptions) -> Result<(ExtractionMethod, PdfContent)> {
        let primary_err = match guarded(self.primary.as_ref(), path, options) {
            Ok(content) => return Ok((self.primary.method(), content)),
            Err(e) => e,
        };

        log::warn!(
            "{} failed for {}: {}; trying {}",
            self.primary.method(),
            path.display(),
            primary_err,
            self.fallback.method()
        );

        match guarded(self.fallback.as_ref(), path, options) {
            Ok(content) => Ok((self.fallback.method(), content)),
            Err(fallback_err) => {
                log::error!(
                    "{} also failed for {}: {}",
                    self.fallback.method(),
                    path.display(),
                    fallback_err
                );
                Err(primary_err)
            }
        }
    }
}

/// Run a backend, turning a panic inside the PDF library into an error.
fn guarded(backend: &dyn PdfBackend, path: &Path, options: &ProcessingOptions) -> Result<PdfContent> {
    catch_unwind(AssertUnwindSafe(|| backend.extract(path, options)))
        .map_err(|_| Error::PdfParse(format!("{} backend panicked", backend.method())))?
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PdfExtractor {
    fn document_type(&self) -> DocumentType {
        DocumentType::Pdf
    }

    fn extract(&self, path: &Path, options: &ProcessingOptions) -> ExtractionResult {
        let start = Instant::now();
        let doc_type = self.document_type().as_str();

        match self.run(path, options) {
            Ok((method, content)) => {
                let pages: Vec<PageContent> = content
                    .pages
                    .into_iter()
                    .enumerate()
                    .map(|(i, page)| PageContent::new(i + 1, &page.text, page.tables))
                    .collect();

                let metadata = DocumentMetadata::new(
                    path,
                    doc_type,
                    method,
                    content.total_pages,
                    pages.len(),
                    start.elapsed().as_secs_f64(),
                );
                ExtractionResult::success(metadata, pages)
            }
            Err(e) => ExtractionResult::failure(
                DocumentMetadata::failed(path, doc_type, start.elapsed().as_secs_f64()),
                format!("PDF extraction failed: {}", e),
            ),
        }
    }
}
