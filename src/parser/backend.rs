//! Document source abstraction.
//!
//! The engine never touches a PDF library directly: it asks a
//! [`DocumentSource`] for metadata and, page by page, for positioned glyphs
//! plus a plain-text extraction. [`PdfSource`](super::PdfSource) is the
//! lopdf-backed implementation; [`MemorySource`] serves callers that already
//! hold glyphs (and tests).

use crate::error::{Error, Result};
use crate::model::{DocumentInfo, PageContent};

/// Abstract interface for page-rendered document access.
pub trait DocumentSource {
    /// Document-level metadata.
    fn info(&self) -> DocumentInfo;

    /// Total number of pages.
    fn page_count(&self) -> u32;

    /// Fetch one page (1-indexed).
    ///
    /// An `Err` here is a page-level failure: the extractor logs it and moves
    /// on to the next page.
    fn page(&self, number: u32) -> Result<PageContent>;
}

/// A document held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    info: DocumentInfo,
    pages: Vec<PageContent>,
}

impl MemorySource {
    /// Create a source from pages; pages are renumbered 1..=n in order.
    pub fn new(pages: Vec<PageContent>) -> Self {
        let pages: Vec<PageContent> = pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                page.number = i as u32 + 1;
                page
            })
            .collect();
        let info = DocumentInfo::with_pages(pages.len() as u32);
        Self { info, pages }
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.info.title = Some(title.into());
        self
    }

    /// Replace the metadata wholesale; the page count is kept in sync.
    pub fn with_info(mut self, info: DocumentInfo) -> Self {
        self.info = DocumentInfo {
            page_count: self.pages.len() as u32,
            ..info
        };
        self
    }
}

impl DocumentSource for MemorySource {
    fn info(&self) -> DocumentInfo {
        self.info.clone()
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<PageContent> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }
}

impl<S: DocumentSource + ?Sized> DocumentSource for &S {
    fn info(&self) -> DocumentInfo {
        (**self).info()
    }

    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page(&self, number: u32) -> Result<PageContent> {
        (**self).page(number)
    }
}

/// Simple text decoding fallback when no font encoding is available.
///
/// Tries UTF-16BE (with BOM), then UTF-8, then Latin-1, which also covers
/// the printable range of PDFDocEncoding.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}
