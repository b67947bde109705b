//! Result model shared by every extraction strategy.
//!
//! These types are the wire contract with the frontend: field names and
//! nesting serialize exactly as declared, `error_message` included as `null`
//! on success.

mod metadata;
mod page;
mod result;

pub use metadata::{DocumentMetadata, ExtractionMethod};
pub use page::{PageContent, Table};
pub use result::ExtractionResult;
