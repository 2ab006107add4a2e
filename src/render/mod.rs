//! Rendering module for converting outlines to output formats.

mod json;
mod markdown;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
