//! Document access.

mod backend;
mod pdf_source;

pub use backend::{decode_text_simple, DocumentSource, MemorySource};
pub use pdf_source::PdfSource;
