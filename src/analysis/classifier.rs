//! Heading detection.
//!
//! Two independent detectors look at every page:
//!
//! - [`FontDetector`] groups glyphs into lines and flags lines whose average
//!   font size stands out against the document's [`FontProfile`].
//! - [`PatternDetector`] scans the page's plain text for structural patterns
//!   (section numbering, chapter keywords, capitalisation) and ignores fonts
//!   entirely, which keeps flat-typography documents such as forms covered.
//!
//! Their outputs are concatenated; duplicates are resolved by the refiner.

use regex::Regex;

use super::fonts::FontProfile;
use super::lines::group_lines;
use super::text::{alpha_count, char_len, has_alpha, is_upper};
use crate::config::OutlineConfig;
use crate::model::{Detector, HeadingCandidate, HeadingLevel, PageContent};

/// Flags lines set noticeably larger than the document's body text.
pub struct FontDetector<'c> {
    config: &'c OutlineConfig,
}

impl<'c> FontDetector<'c> {
    pub fn new(config: &'c OutlineConfig) -> Self {
        Self { config }
    }

    /// Detect heading candidates on one page.
    ///
    /// Without a profile (too few sized glyphs in the document) this yields
    /// nothing rather than guessing.
    pub fn detect(&self, page: &PageContent, profile: Option<&FontProfile>) -> Vec<HeadingCandidate> {
        let Some(profile) = profile else {
            return vec![];
        };

        let mut headings = Vec::new();
        for line in group_lines(&page.glyphs, self.config.line_tolerance) {
            let text = line.text();
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let Some(size) = line.average_size() else {
                continue;
            };

            if profile.is_heading_size(size, self.config) && self.is_heading_text(text) {
                headings.push(HeadingCandidate::detected(
                    profile.level_for(size, self.config),
                    text,
                    page.number,
                    Detector::Font,
                ));
            }
        }
        headings
    }

    /// Minimal sanity check for a font-detected line: bounded length, at
    /// least one letter, and mostly letters.
    pub fn is_heading_text(&self, text: &str) -> bool {
        let len = char_len(text);
        if len < self.config.heading_min_chars || len > self.config.heading_max_chars {
            return false;
        }
        if !has_alpha(text) {
            return false;
        }
        alpha_count(text) as f32 / len as f32 >= self.config.min_alpha_ratio
    }
}

/// Matches structural heading patterns in plain text, independent of fonts.
pub struct PatternDetector {
    numbered: Regex,
    numbered_sub: Regex,
    keyword: Regex,
    all_caps: Regex,
    title_phrase: Regex,
    numbered_h1: Regex,
    numbered_h2: Regex,
}

impl PatternDetector {
    pub fn new() -> Self {
        Self {
            numbered: Regex::new(r"^\d+\.?\s+[A-Z]").expect("numbered pattern"),
            numbered_sub: Regex::new(r"^\d+\.\d+\s+[A-Z]").expect("sub-numbered pattern"),
            keyword: Regex::new(r"^(Chapter|Section|Part|Appendix)\s+\d+")
                .expect("keyword pattern"),
            all_caps: Regex::new(r"^[A-Z][A-Z\s]{4,29}$").expect("all-caps pattern"),
            title_phrase: Regex::new(r"^[A-Z][a-z]+(\s+[A-Z][a-z]+){1,4}$")
                .expect("title phrase pattern"),
            numbered_h1: Regex::new(r"^\d+\.\s+").expect("numbered level pattern"),
            numbered_h2: Regex::new(r"^\d+\.\d+\s+").expect("sub-numbered level pattern"),
        }
    }

    /// Detect heading candidates in a page's plain text.
    pub fn detect(&self, page: &PageContent) -> Vec<HeadingCandidate> {
        page.text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && self.matches(line))
            .map(|line| {
                HeadingCandidate::detected(self.level(line), line, page.number, Detector::Pattern)
            })
            .collect()
    }

    /// Whether a trimmed line looks like a heading.
    pub fn matches(&self, line: &str) -> bool {
        self.numbered.is_match(line)
            || self.numbered_sub.is_match(line)
            || self.keyword.is_match(line)
            || self.all_caps.is_match(line)
            || self.title_phrase.is_match(line)
    }

    /// Level of a matched line, derived from which rule it satisfies.
    pub fn level(&self, line: &str) -> HeadingLevel {
        if self.numbered_h1.is_match(line) {
            HeadingLevel::H1
        } else if self.numbered_h2.is_match(line) {
            HeadingLevel::H2
        } else if line.starts_with("Chapter") || line.starts_with("CHAPTER") {
            HeadingLevel::H1
        } else if line.starts_with("Section") || line.starts_with("SECTION") {
            HeadingLevel::H2
        } else if is_upper(line) && char_len(line) > 10 {
            HeadingLevel::H1
        } else {
            HeadingLevel::H3
        }
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs both detectors over a page and unions their candidates.
pub struct HeadingDetector<'c> {
    font: FontDetector<'c>,
    pattern: PatternDetector,
}

impl<'c> HeadingDetector<'c> {
    pub fn new(config: &'c OutlineConfig) -> Self {
        Self {
            font: FontDetector::new(config),
            pattern: PatternDetector::new(),
        }
    }

    /// Font candidates first, then pattern candidates, each in page order.
    pub fn detect(&self, page: &PageContent, profile: Option<&FontProfile>) -> Vec<HeadingCandidate> {
        let mut headings = self.font.detect(page, profile);
        headings.extend(self.pattern.detect(page));
        headings
    }
}
