//! PDF backend abstraction layer.
//!
//! A backend turns a PDF file into per-page text and tables. The PDF
//! extractor holds a primary and a fallback backend behind this trait so
//! either can be swapped out.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::detect::detect_pdf_from_path;
use crate::error::{Error, Result};
use crate::model::{ExtractionMethod, Table};
use crate::options::ProcessingOptions;

use super::layout::{spans_to_text, SpanExtractor};
use super::table_detector::TableDetector;

/// Text and tables of one PDF page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    /// Page text, untrimmed
    pub text: String,
    /// Tables detected on the page
    pub tables: Vec<Table>,
}

impl PdfPage {
    /// A page without tables.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tables: Vec::new(),
        }
    }
}

/// Pages read from a PDF, already capped by the page limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfContent {
    /// Page count of the whole document
    pub total_pages: usize,
    /// Pages in document order
    pub pages: Vec<PdfPage>,
}

/// Abstract interface for reading a PDF file.
pub trait PdfBackend: Send + Sync {
    /// Method tag reported when this backend produces the result.
    fn method(&self) -> ExtractionMethod;

    /// Read at most `options.page_limit(total)` pages from `path`.
    fn extract(&self, path: &Path, options: &ProcessingOptions) -> Result<PdfContent>;
}

/// Primary backend: content-stream spans via lopdf, with table detection.
#[derive(Debug, Clone, Default)]
pub struct LopdfBackend {
    detector: TableDetector,
}

impl LopdfBackend {
    /// Create a backend with the default table detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PdfBackend for LopdfBackend {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Lopdf
    }

    fn extract(&self, path: &Path, options: &ProcessingOptions) -> Result<PdfContent> {
        let format = detect_pdf_from_path(path)?;
        log::debug!("PDF version {}: {}", format.version, path.display());

        let doc = LopdfDocument::load(path)?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let page_ids = doc.get_pages();
        let total_pages = page_ids.len();
        let limit = options.page_limit(total_pages);

        let extractor = SpanExtractor::new(&doc);
        let mut pages = Vec::with_capacity(limit);

        for (&page_num, &page_id) in page_ids.iter().take(limit) {
            let spans = extractor.page_spans(page_id)?;
            let tables = if options.extract_tables {
                self.detector.detect_tables(&spans)
            } else {
                Vec::new()
            };
            log::debug!(
                "Page {}: {} spans, {} tables",
                page_num,
                spans.len(),
                tables.len()
            );

            pages.push(PdfPage {
                text: spans_to_text(&spans),
                tables,
            });
        }

        Ok(PdfContent { total_pages, pages })
    }
}

/// Fallback backend: per-page plain text via pdf-extract. Never yields tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractBackend;

impl PdfBackend for PdfExtractBackend {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PdfExtract
    }

    fn extract(&self, path: &Path, options: &ProcessingOptions) -> Result<PdfContent> {
        // pdf-extract panics on some malformed inputs
        let texts = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_by_pages(path)))
            .map_err(|_| Error::TextExtract("pdf-extract panicked".to_string()))??;

        let total_pages = texts.len();
        let limit = options.page_limit(total_pages);
        let pages = texts.into_iter().take(limit).map(PdfPage::text).collect();

        Ok(PdfContent { total_pages, pages })
    }
}
