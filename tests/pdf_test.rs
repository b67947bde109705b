//! Integration tests for PDF extraction.

mod common;

use std::path::Path;

use docparse::error::{Error, Result};
use docparse::parser::{PdfBackend, PdfContent, PdfExtractBackend, PdfPage};
use docparse::{ExtractionEngine, ExtractionMethod, PdfExtractor, ProcessingOptions};

/// Primary backend that always fails.
struct FailingBackend;

impl PdfBackend for FailingBackend {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Lopdf
    }

    fn extract(&self, _path: &Path, _options: &ProcessingOptions) -> Result<PdfContent> {
        Err(Error::PdfParse("trailer not found".to_string()))
    }
}

/// Fallback backend returning fixed pages.
struct CannedBackend;

impl PdfBackend for CannedBackend {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PdfExtract
    }

    fn extract(&self, _path: &Path, options: &ProcessingOptions) -> Result<PdfContent> {
        let pages = ["recovered one", "recovered two"];
        Ok(PdfContent {
            total_pages: pages.len(),
            pages: pages
                .iter()
                .take(options.page_limit(pages.len()))
                .map(|text| PdfPage::text(*text))
                .collect(),
        })
    }
}

#[test]
fn test_five_page_pdf_with_page_cap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("five.pdf");
    common::write_simple_pdf(
        &path,
        &["Page one", "Page two", "Page three", "Page four", "Page five"],
    );

    let options = ProcessingOptions::new().with_max_pages(1);
    let result = ExtractionEngine::new().extract(&path, &options);

    assert!(result.success, "{:?}", result.error_message);
    assert_eq!(result.metadata.document_type, "pdf");
    assert_eq!(result.metadata.extraction_method, ExtractionMethod::Lopdf);
    assert_eq!(result.metadata.total_pages, 5);
    assert_eq!(result.metadata.pages_processed, 1);
    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.pages[0].page_number, 1);
    assert_eq!(result.pages[0].text, "Page one");
    assert_eq!(result.pages[0].word_count, 2);
}

#[test]
fn test_zero_page_cap_means_all_pages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("three.pdf");
    common::write_simple_pdf(&path, &["alpha", "beta", "gamma"]);

    let options = ProcessingOptions::new().with_max_pages(0);
    let result = ExtractionEngine::new().extract(&path, &options);

    assert_eq!(result.metadata.pages_processed, 3);
    let numbers: Vec<usize> = result.pages.iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(result.pages[2].text, "gamma");
}

#[test]
fn test_lines_are_read_top_to_bottom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lines.pdf");
    // Drawn out of order on purpose
    common::write_pdf(
        &path,
        &[vec![(72, 680, "third"), (72, 720, "first"), (72, 700, "second")]],
    );

    let result = ExtractionEngine::new().extract(&path, &ProcessingOptions::default());
    assert_eq!(result.pages[0].text, "first\nsecond\nthird");
}

fn table_page() -> Vec<(i64, i64, &'static str)> {
    vec![
        (150, 740, "Staff"),
        (72, 700, "Name"),
        (272, 700, "Age"),
        (72, 686, "Alice"),
        (272, 686, "30"),
        (72, 672, "Bob"),
        (272, 672, "25"),
    ]
}

#[test]
fn test_table_detection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.pdf");
    common::write_pdf(&path, &[table_page()]);

    let result = ExtractionEngine::new().extract(&path, &ProcessingOptions::default());
    assert!(result.success, "{:?}", result.error_message);

    let page = &result.pages[0];
    assert_eq!(page.text, "Staff\nName Age\nAlice 30\nBob 25");
    assert_eq!(page.tables_count, 1);
    assert_eq!(
        page.tables[0],
        vec![
            vec!["Name".to_string(), "Age".to_string()],
            vec!["Alice".to_string(), "30".to_string()],
            vec!["Bob".to_string(), "25".to_string()],
        ]
    );
}

#[test]
fn test_tables_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.pdf");
    common::write_pdf(&path, &[table_page()]);

    let options = ProcessingOptions::new().with_tables(false);
    let result = ExtractionEngine::new().extract(&path, &options);

    assert!(result.success);
    assert_eq!(result.pages[0].tables_count, 0);
    assert!(result.pages[0].tables.is_empty());
    assert_eq!(result.total_tables(), 0);
}

#[test]
fn test_page_without_contents_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.pdf");
    common::write_pdf(&path, &[vec![(72, 720, "Cover")], vec![]]);

    let result = ExtractionEngine::new().extract(&path, &ProcessingOptions::default());
    assert!(result.success, "{:?}", result.error_message);
    assert_eq!(result.page_count(), 2);
    assert_eq!(result.pages[1].text, "");
    assert_eq!(result.pages[1].word_count, 0);
}

#[test]
fn test_fallback_after_primary_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    common::write_simple_pdf(&path, &["unused"]);

    let engine =
        ExtractionEngine::with_pdf(PdfExtractor::with_backends(FailingBackend, CannedBackend));
    let result = engine.extract(&path, &ProcessingOptions::new().with_max_pages(1));

    assert!(result.success);
    assert_eq!(result.metadata.extraction_method, ExtractionMethod::PdfExtract);
    assert_eq!(result.metadata.total_pages, 2);
    assert_eq!(result.metadata.pages_processed, 1);
    assert_eq!(result.pages[0].text, "recovered one");
    assert!(result.pages[0].tables.is_empty());
}

#[test]
fn test_fallback_reads_real_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    common::write_simple_pdf(&path, &["Hello fallback", "Second page"]);

    let engine =
        ExtractionEngine::with_pdf(PdfExtractor::with_backends(FailingBackend, PdfExtractBackend));
    let result = engine.extract(&path, &ProcessingOptions::default());

    assert!(result.success, "{:?}", result.error_message);
    assert_eq!(result.metadata.extraction_method, ExtractionMethod::PdfExtract);
    assert_eq!(result.metadata.total_pages, 2);
    assert!(result.pages[0].text.contains("Hello"));
}

#[test]
fn test_double_failure_reports_primary_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    common::write_simple_pdf(&path, &["unused"]);

    let engine =
        ExtractionEngine::with_pdf(PdfExtractor::with_backends(FailingBackend, FailingBackend));
    let result = engine.extract(&path, &ProcessingOptions::default());

    assert!(!result.success);
    assert!(result.pages.is_empty());
    assert_eq!(result.metadata.pages_processed, 0);
    assert_eq!(result.metadata.extraction_method, ExtractionMethod::Failed);
    assert_eq!(
        result.error_message.as_deref(),
        Some("PDF extraction failed: PDF parsing error: trailer not found")
    );
}

#[test]
fn test_corrupt_pdf_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(dir.path(), "broken.pdf", b"%PDF-1.7\n%%%% not a real body");

    let result = ExtractionEngine::new().extract(&path, &ProcessingOptions::default());

    assert!(!result.success);
    assert_eq!(result.metadata.document_type, "pdf");
    assert_eq!(result.metadata.extraction_method, ExtractionMethod::Failed);
    assert_eq!(result.metadata.file_size, 29);
    let message = result.error_message.unwrap();
    assert!(message.starts_with("PDF extraction failed: "), "{}", message);
}

#[test]
fn test_non_pdf_content_with_pdf_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(dir.path(), "fake.PDF", b"this is plain text");

    let result = ExtractionEngine::new().extract(&path, &ProcessingOptions::default());

    assert!(!result.success);
    assert_eq!(
        result.error_message.as_deref(),
        Some("PDF extraction failed: Unknown file format: not a valid PDF")
    );
}
