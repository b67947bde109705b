//! Top-level extraction result.

use super::{DocumentMetadata, PageContent};
use serde::{Deserialize, Serialize};

/// Complete result of extracting one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Document metadata
    pub metadata: DocumentMetadata,

    /// Extracted pages in order (empty on failure)
    pub pages: Vec<PageContent>,

    /// Whether extraction succeeded
    pub success: bool,

    /// Failure description, `None` on success
    pub error_message: Option<String>,
}

impl ExtractionResult {
    /// A successful result.
    pub fn success(metadata: DocumentMetadata, pages: Vec<PageContent>) -> Self {
        Self {
            metadata,
            pages,
            success: true,
            error_message: None,
        }
    }

    /// A failed result. Pages are always empty and nothing counts as processed.
    pub fn failure(mut metadata: DocumentMetadata, message: impl Into<String>) -> Self {
        metadata.pages_processed = 0;
        Self {
            metadata,
            pages: Vec::new(),
            success: false,
            error_message: Some(message.into()),
        }
    }

    /// Number of pages emitted.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Sum of word counts over all pages.
    pub fn total_words(&self) -> usize {
        self.pages.iter().map(|p| p.word_count).sum()
    }

    /// Sum of character counts over all pages.
    pub fn total_characters(&self) -> usize {
        self.pages.iter().map(|p| p.character_count).sum()
    }

    /// Sum of table counts over all pages.
    pub fn total_tables(&self) -> usize {
        self.pages.iter().map(|p| p.tables_count).sum()
    }

    /// Text of all pages separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
