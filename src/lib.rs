//! # docoutline
//!
//! Infers a hierarchical outline (title plus H1–H3 headings with page
//! numbers) from PDF documents that carry no usable bookmarks.
//!
//! Headings are found two ways and unioned: lines set noticeably larger than
//! the document's body text, and lines whose wording looks structural
//! (numbering, "Chapter 3", short all-caps lines). The candidates are then
//! cleaned, deduplicated, bounded and sorted.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docoutline::{extract_outline_file, render};
//!
//! fn main() -> docoutline::Result<()> {
//!     let outline = extract_outline_file("document.pdf");
//!
//!     let json = render::to_json(&outline, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Never fails on bad input**: unreadable documents yield an empty outline
//! - **Source-agnostic engine**: anything implementing [`DocumentSource`]
//! - **Tunable heuristics**: every threshold lives in [`OutlineConfig`]
//! - **Parallel processing**: uses Rayon to classify pages

pub mod analysis;
pub mod config;
pub mod detect;
pub mod error;
pub mod extractor;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analysis::FontProfile;
pub use config::OutlineConfig;
pub use detect::{has_pdf_extension, is_pdf_bytes, sniff_bytes, sniff_path, PdfHeader};
pub use error::{Error, Result};
pub use extractor::{ExtractionStats, OutlineExtractor};
pub use model::{
    Detector, DocumentInfo, Glyph, HeadingCandidate, HeadingLevel, Outline, PageContent,
};
pub use parser::{DocumentSource, MemorySource, PdfSource};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the outline of a PDF file with default settings.
///
/// Unreadable or non-PDF files yield [`Outline::empty`].
///
/// # Example
///
/// ```no_run
/// use docoutline::extract_outline_file;
///
/// let outline = extract_outline_file("document.pdf");
/// println!("{} headings", outline.len());
/// ```
pub fn extract_outline_file<P: AsRef<Path>>(path: P) -> Outline {
    OutlineExtractor::default().extract_file(path)
}

/// Extract the outline of an in-memory PDF with default settings.
///
/// # Example
///
/// ```no_run
/// use docoutline::extract_outline_bytes;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let outline = extract_outline_bytes(&data);
/// ```
pub fn extract_outline_bytes(data: &[u8]) -> Outline {
    OutlineExtractor::default().extract_bytes(data)
}

/// Extract the outline of any [`DocumentSource`] with default settings.
pub fn extract_outline<S: DocumentSource>(source: &S) -> Outline {
    OutlineExtractor::default().extract(source)
}

/// Render the outline of a PDF file as JSON.
///
/// # Example
///
/// ```no_run
/// use docoutline::{to_json, JsonFormat};
///
/// let json = to_json("document.pdf", JsonFormat::Compact).unwrap();
/// std::fs::write("outline.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    render::to_json(&extract_outline_file(path), format)
}
