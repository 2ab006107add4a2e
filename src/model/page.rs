//! Page- and document-level inputs.

use serde::{Deserialize, Serialize};

use super::Glyph;

/// Everything the engine needs from one rendered page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points; `0.0` when unknown
    pub height: f32,

    /// Positioned characters, in any order
    pub glyphs: Vec<Glyph>,

    /// Plain-text extraction of the page, lines separated by `\n`
    pub text: String,
}

impl PageContent {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            glyphs: Vec::new(),
            text: String::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Attach glyphs.
    pub fn with_glyphs(mut self, glyphs: Vec<Glyph>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Attach the plain-text extraction.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Height used for region heuristics: the declared height, or the lowest
    /// glyph edge when the page does not declare one.
    pub fn effective_height(&self) -> f32 {
        if self.height.is_finite() && self.height > 0.0 {
            return self.height;
        }
        self.glyphs
            .iter()
            .map(|g| g.bottom)
            .filter(|b| b.is_finite())
            .fold(0.0, f32::max)
    }

    /// Check if the page has neither glyphs nor text.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty() && self.text.trim().is_empty()
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Title from the document information dictionary
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Total number of pages
    pub page_count: u32,
}

impl DocumentInfo {
    /// Metadata carrying only a page count.
    pub fn with_pages(page_count: u32) -> Self {
        Self {
            page_count,
            ..Default::default()
        }
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
