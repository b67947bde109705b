//! Document-level metadata.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tag naming the backend that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Primary PDF backend (lopdf content streams + table detection)
    Lopdf,
    /// Fallback PDF backend (pdf-extract, text only)
    PdfExtract,
    /// Plain text decoding
    PlainText,
    /// DOCX paragraph stream
    DocxXml,
    /// Extraction did not succeed
    Failed,
}

impl ExtractionMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Lopdf => "lopdf",
            ExtractionMethod::PdfExtract => "pdf_extract",
            ExtractionMethod::PlainText => "plain_text",
            ExtractionMethod::DocxXml => "docx_xml",
            ExtractionMethod::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata describing one extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// File name without directories
    pub filename: String,

    /// File size in bytes (0 if the file did not exist)
    pub file_size: u64,

    /// Pages identified in the document, before any cap
    pub total_pages: usize,

    /// Pages actually emitted
    pub pages_processed: usize,

    /// Capture time, RFC 3339 in UTC
    pub extraction_timestamp: String,

    /// Backend that produced the pages
    pub extraction_method: ExtractionMethod,

    /// Wall-clock seconds spent in the strategy
    pub processing_time: f64,

    /// `pdf`, `txt`, `docx`, `unknown`, or the unrecognized extension
    pub document_type: String,
}

impl DocumentMetadata {
    /// Metadata for a successful extraction of `path`.
    pub fn new(
        path: &Path,
        document_type: impl Into<String>,
        method: ExtractionMethod,
        total_pages: usize,
        pages_processed: usize,
        processing_time: f64,
    ) -> Self {
        Self {
            filename: file_name(path),
            file_size: file_size(path),
            total_pages,
            pages_processed,
            extraction_timestamp: timestamp_now(),
            extraction_method: method,
            processing_time,
            document_type: document_type.into(),
        }
    }

    /// Metadata for a failed extraction of `path`.
    pub fn failed(path: &Path, document_type: impl Into<String>, processing_time: f64) -> Self {
        Self::new(
            path,
            document_type,
            ExtractionMethod::Failed,
            0,
            0,
            processing_time,
        )
    }
}

/// Final path component, lossily converted.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Size on disk, 0 when the file cannot be inspected.
fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
