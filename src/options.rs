//! Per-call processing options.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Options for a single extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Maximum number of pages to emit (`None` or `0` = no cap)
    pub max_pages: Option<usize>,

    /// Whether to run table detection (PDF only)
    pub extract_tables: bool,

    /// Encoding label used to decode text files (TXT only)
    pub encoding: String,

    /// How undecodable bytes are handled (TXT only)
    pub error_handling: DecodeErrorPolicy,
}

impl ProcessingOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of processed pages.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Enable or disable table extraction.
    pub fn with_tables(mut self, extract: bool) -> Self {
        self.extract_tables = extract;
        self
    }

    /// Set the text encoding label (e.g. "utf-8", "windows-1252").
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Set the decode error policy.
    pub fn with_error_handling(mut self, policy: DecodeErrorPolicy) -> Self {
        self.error_handling = policy;
        self
    }

    /// Number of pages to process out of `total`.
    pub fn page_limit(&self, total: usize) -> usize {
        match self.max_pages {
            Some(max) if max > 0 => max.min(total),
            _ => total,
        }
    }
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            max_pages: None,
            extract_tables: true,
            encoding: "utf-8".to_string(),
            error_handling: DecodeErrorPolicy::Ignore,
        }
    }
}

/// Policy for byte sequences that are invalid in the requested encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrorPolicy {
    /// Drop malformed sequences
    #[default]
    Ignore,
    /// Fail the extraction
    Strict,
    /// Substitute U+FFFD
    Replace,
}

impl DecodeErrorPolicy {
    /// Wire name of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeErrorPolicy::Ignore => "ignore",
            DecodeErrorPolicy::Strict => "strict",
            DecodeErrorPolicy::Replace => "replace",
        }
    }
}

impl FromStr for DecodeErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(DecodeErrorPolicy::Ignore),
            "strict" => Ok(DecodeErrorPolicy::Strict),
            "replace" => Ok(DecodeErrorPolicy::Replace),
            other => Err(format!("unknown error handling policy: {}", other)),
        }
    }
}

impl std::fmt::Display for DecodeErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
