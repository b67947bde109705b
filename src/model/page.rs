//! Page-level types.

use serde::{Deserialize, Serialize};

/// A table as an ordered list of rows, each an ordered list of cell strings.
pub type Table = Vec<Vec<String>>;

/// One logical page of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed, sequential)
    pub page_number: usize,

    /// Page text with leading/trailing whitespace removed
    pub text: String,

    /// Whitespace-separated token count of `text`
    pub word_count: usize,

    /// Number of characters in `text`
    pub character_count: usize,

    /// Number of entries in `tables`
    pub tables_count: usize,

    /// Tables detected on the page
    pub tables: Vec<Table>,
}

impl PageContent {
    /// Build a page from raw text, trimming it and deriving the counts.
    pub fn new(page_number: usize, text: &str, tables: Vec<Table>) -> Self {
        let text = text.trim();
        Self {
            page_number,
            text: text.to_string(),
            word_count: text.split_whitespace().count(),
            character_count: text.chars().count(),
            tables_count: tables.len(),
            tables,
        }
    }

    /// Build a page without tables.
    pub fn text_only(page_number: usize, text: &str) -> Self {
        Self::new(page_number, text, Vec::new())
    }

    /// Check if the page has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
