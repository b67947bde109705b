//! Rendering of extraction results.

mod json;

pub use json::{to_json, to_json_array, JsonFormat};
