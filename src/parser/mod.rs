//! Format readers used by the extraction strategies.

mod backend;
pub mod docx;
mod layout;
mod table_detector;
pub mod text;

pub use backend::{LopdfBackend, PdfBackend, PdfContent, PdfExtractBackend, PdfPage};
pub use layout::{group_spans_into_lines, spans_to_text, SpanExtractor, TextLine, TextSpan};
pub use table_detector::{DetectedTable, TableDetector, TableDetectorConfig, TableRowData};
