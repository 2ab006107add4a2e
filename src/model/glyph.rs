//! Positioned glyphs.

use serde::{Deserialize, Serialize};

/// One rendered character with its position and font size.
///
/// Vertical offsets are measured top-down from the upper edge of the page,
/// so `top < bottom` for every well-formed glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// The character (occasionally a ligature or multi-char cluster)
    pub text: String,
    /// Left edge
    pub x0: f32,
    /// Upper edge
    pub top: f32,
    /// Lower edge
    pub bottom: f32,
    /// Font size in points; `0.0` when unknown
    pub size: f32,
}

impl Glyph {
    /// Create a glyph whose box spans exactly one font size vertically.
    pub fn new(text: impl Into<String>, x0: f32, top: f32, size: f32) -> Self {
        Self {
            text: text.into(),
            x0,
            top,
            bottom: top + size,
            size,
        }
    }

    /// Whether the glyph carries a usable font size.
    pub fn is_sized(&self) -> bool {
        self.size.is_finite() && self.size > 0.0
    }

    /// Split a run of text into one glyph per character.
    ///
    /// Character advances are not known to the caller, so each character is
    /// assumed to be `advance` wide.
    pub fn run(text: &str, x0: f32, top: f32, size: f32, advance: f32) -> Vec<Self> {
        text.chars()
            .enumerate()
            .map(|(i, c)| Self::new(c.to_string(), x0 + advance * i as f32, top, size))
            .collect()
    }
}
