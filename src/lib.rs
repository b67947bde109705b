//! # docparse
//!
//! Document text extraction for PDF, plain text, and DOCX files.
//!
//! Every document is turned into the same paginated result: a list of
//! logical pages with text, word and character counts, and (for PDF)
//! detected tables, plus metadata describing the extraction.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docparse::{extract_document, render, ProcessingOptions};
//!
//! fn main() -> docparse::Result<()> {
//!     let options = ProcessingOptions::new().with_max_pages(10);
//!     let result = extract_document("report.pdf", &options);
//!
//!     if result.success {
//!         println!("{}", render::to_json(&result, render::JsonFormat::Pretty)?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Formats
//!
//! - **PDF**: content-stream text with stream-mode table detection, falling
//!   back to a text-only reader when the document cannot be parsed
//! - **TXT**: any WHATWG encoding label, pages split on form feeds, triple
//!   newlines, or fixed-size windows
//! - **DOCX**: body paragraphs, pages split on blank paragraphs

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod options;
pub mod parser;
pub mod render;
pub mod segment;

// Re-export commonly used types
pub use detect::{DocumentType, PdfFormat};
pub use error::{Error, Result};
pub use extract::{DocxExtractor, ExtractionEngine, Extractor, PdfExtractor, TextExtractor};
pub use model::{DocumentMetadata, ExtractionMethod, ExtractionResult, PageContent, Table};
pub use options::{DecodeErrorPolicy, ProcessingOptions};
pub use render::JsonFormat;

use std::path::Path;

/// Extract a document with a default engine.
///
/// # Example
///
/// ```no_run
/// use docparse::{extract_document, ProcessingOptions};
///
/// let result = extract_document("notes.txt", &ProcessingOptions::default());
/// for page in &result.pages {
///     println!("page {}: {} words", page.page_number, page.word_count);
/// }
/// ```
pub fn extract_document<P: AsRef<Path>>(path: P, options: &ProcessingOptions) -> ExtractionResult {
    ExtractionEngine::new().extract(path, options)
}

/// Extract a document and render the result as JSON.
///
/// # Example
///
/// ```no_run
/// use docparse::{extract_to_json, JsonFormat, ProcessingOptions};
///
/// let json = extract_to_json("report.docx", &ProcessingOptions::default(), JsonFormat::Compact)?;
/// std::fs::write("report.json", json)?;
/// # Ok::<(), docparse::Error>(())
/// ```
pub fn extract_to_json<P: AsRef<Path>>(
    path: P,
    options: &ProcessingOptions,
    format: JsonFormat,
) -> Result<String> {
    render::to_json(&extract_document(path, options), format)
}

/// Supported document formats, as lowercase extensions.
pub fn supported_formats() -> Vec<&'static str> {
    ExtractionEngine::new().supported_extensions()
}

/// Get the library version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_supported_formats() {
        assert_eq!(supported_formats(), vec!["pdf", "txt", "docx"]);
    }

    #[test]
    fn test_extract_document_missing_file() {
        let result = extract_document("does-not-exist.txt", &ProcessingOptions::default());
        assert!(!result.success);
        assert_eq!(result.error_message.as_deref(), Some("File not found"));
    }

    #[test]
    fn test_extract_to_json_reports_failure() {
        let json = extract_to_json(
            "does-not-exist.docx",
            &ProcessingOptions::default(),
            JsonFormat::Compact,
        )
        .unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"error_message\":\"File not found\""));
    }
}
