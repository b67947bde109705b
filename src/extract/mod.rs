//! Extraction strategies and the engine that dispatches between them.
//!
//! Each supported [`DocumentType`] has one strategy implementing
//! [`Extractor`]. The [`ExtractionEngine`] owns one of each, checks the input
//! path, and hands the file to the matching strategy.
//!
//! # Example
//!
//! ```no_run
//! use docparse::{ExtractionEngine, ProcessingOptions};
//!
//! let engine = ExtractionEngine::new();
//! let result = engine.extract("report.pdf", &ProcessingOptions::new().with_max_pages(5));
//! println!("{} pages", result.page_count());
//! ```

mod docx;
mod pdf;
mod txt;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use txt::TextExtractor;

use std::path::Path;

use rayon::prelude::*;

use crate::detect::{extension_of, DocumentType};
use crate::model::{DocumentMetadata, ExtractionResult};
use crate::options::ProcessingOptions;

/// A format-specific extraction strategy.
///
/// Strategies never fail: errors become a failed [`ExtractionResult`].
pub trait Extractor: Send + Sync {
    /// The document type this strategy handles.
    fn document_type(&self) -> DocumentType;

    /// Extract the document at `path`.
    fn extract(&self, path: &Path, options: &ProcessingOptions) -> ExtractionResult;
}

/// Dispatches documents to the strategy for their type.
pub struct ExtractionEngine {
    pdf: PdfExtractor,
    txt: TextExtractor,
    docx: DocxExtractor,
}

impl ExtractionEngine {
    /// Create an engine with the default strategies.
    pub fn new() -> Self {
        Self::with_pdf(PdfExtractor::new())
    }

    /// Create an engine with a custom PDF strategy.
    pub fn with_pdf(pdf: PdfExtractor) -> Self {
        Self {
            pdf,
            txt: TextExtractor::new(),
            docx: DocxExtractor::new(),
        }
    }

    fn extractor_for(&self, doc_type: DocumentType) -> &dyn Extractor {
        match doc_type {
            DocumentType::Pdf => &self.pdf,
            DocumentType::Txt => &self.txt,
            DocumentType::Docx => &self.docx,
        }
    }

    /// Extract one document.
    pub fn extract<P: AsRef<Path>>(&self, path: P, options: &ProcessingOptions) -> ExtractionResult {
        let path = path.as_ref();
        log::info!("Starting extraction for: {}", path.display());

        if !path.is_file() {
            log::error!("File not found: {}", path.display());
            return ExtractionResult::failure(
                DocumentMetadata::failed(path, "unknown", 0.0),
                "File not found",
            );
        }

        let extension = extension_of(path);
        let Some(doc_type) = DocumentType::from_extension(&extension) else {
            log::error!("Unsupported file type: {}", extension);
            return ExtractionResult::failure(
                DocumentMetadata::failed(path, extension.as_str(), 0.0),
                format!("Unsupported file type: {}", extension),
            );
        };

        let result = self.extractor_for(doc_type).extract(path, options);

        if result.success {
            log::info!(
                "Successfully extracted {} pages from {}",
                result.metadata.pages_processed,
                result.metadata.filename
            );
        } else {
            log::error!(
                "Extraction failed for {}: {}",
                result.metadata.filename,
                result.error_message.as_deref().unwrap_or_default()
            );
        }

        result
    }

    /// Extract several documents in parallel, one document per worker.
    ///
    /// Results are returned in the order of `paths`.
    pub fn extract_batch<P>(&self, paths: &[P], options: &ProcessingOptions) -> Vec<ExtractionResult>
    where
        P: AsRef<Path> + Sync,
    {
        paths
            .par_iter()
            .map(|path| self.extract(path, options))
            .collect()
    }

    /// Check if a path has a supported extension.
    pub fn is_supported<P: AsRef<Path>>(&self, path: P) -> bool {
        DocumentType::from_path(path).is_some()
    }

    /// Supported extensions, lowercase without dots.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        DocumentType::ALL.iter().map(DocumentType::as_str).collect()
    }
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}
