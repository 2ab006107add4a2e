//! Heading candidates and the final outline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Relative structural prominence of a heading (H1 > H2 > H3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Nesting depth, starting at 1 for H1.
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Parse `"H1"`..`"H3"` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H1" => Some(HeadingLevel::H1),
            "H2" => Some(HeadingLevel::H2),
            "H3" => Some(HeadingLevel::H3),
            _ => None,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

/// Which detector emitted a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detector {
    /// Line font size relative to the document's font profile
    Font,
    /// Textual structure (numbering, keywords, capitalisation)
    Pattern,
    /// Produced outside the engine (e.g. deserialized)
    #[default]
    External,
}

/// An unverified heading detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    pub level: HeadingLevel,
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    #[serde(skip)]
    pub detector: Detector,
}

impl HeadingCandidate {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            detector: Detector::External,
        }
    }

    pub(crate) fn detected(
        level: HeadingLevel,
        text: impl Into<String>,
        page: u32,
        detector: Detector,
    ) -> Self {
        Self {
            detector,
            ..Self::new(level, text, page)
        }
    }
}

/// The inferred outline of one document.
///
/// Serializes as `{"title": "...", "outline": [{"level", "text", "page"}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Selected title, `""` when none was found
    pub title: String,

    /// Headings sorted by page, then text
    #[serde(rename = "outline")]
    pub headings: Vec<HeadingCandidate>,
}

impl Outline {
    /// The zero-value outline returned for unreadable documents.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(title: impl Into<String>, headings: Vec<HeadingCandidate>) -> Self {
        Self {
            title: title.into(),
            headings,
        }
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    /// Check if the outline has neither a title nor headings.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.headings.is_empty()
    }
}
