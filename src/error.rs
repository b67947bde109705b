//! Error types for the docparse library.
//!
//! These errors never cross the public `extract` boundary: every strategy
//! turns them into a failed [`ExtractionResult`](crate::ExtractionResult).
//! They are public so that backends and helpers can be used on their own.

use std::io;
use thiserror::Error;

/// Result type alias for docparse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file content is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version header is malformed.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure or content streams.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// The requested text encoding label is not known.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Bytes could not be decoded with the requested encoding.
    #[error("Decoding error: {0}")]
    Decode(String),

    /// The DOCX container is not a readable ZIP archive.
    #[error("Invalid archive: {0}")]
    Archive(String),

    /// Malformed XML inside a DOCX part.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// A required DOCX part is missing from the archive.
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Error during JSON rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<pdf_extract::OutputError> for Error {
    fn from(err: pdf_extract::OutputError) -> Self {
        Error::TextExtract(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Archive(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
