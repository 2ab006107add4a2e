//! Title selection.
//!
//! The metadata title wins when it looks like a real title; otherwise the
//! largest text in the upper region of the first page is used. When neither
//! yields anything reasonable the title is empty, never invented.

use regex::Regex;

use super::text::{char_len, collapse_whitespace, has_alpha};
use crate::config::OutlineConfig;
use crate::model::{Glyph, PageContent};

/// Placeholder titles that authoring tools write when the user never set one.
const PLACEHOLDER_TITLES: &[&str] = &["untitled", "document", "pdf", "file"];

/// Chooses and cleans a document title.
pub struct TitleSelector<'c> {
    config: &'c OutlineConfig,
    file_suffix: Regex,
    word_prefix: Regex,
}

impl<'c> TitleSelector<'c> {
    pub fn new(config: &'c OutlineConfig) -> Self {
        Self {
            config,
            file_suffix: Regex::new(r"(?i)\.(pdf|doc|docx|txt)$").expect("file suffix pattern"),
            word_prefix: Regex::new(r"(?i)^Microsoft Word - ").expect("word prefix pattern"),
        }
    }

    /// Select a title from metadata, then from the first page.
    pub fn select(&self, metadata_title: Option<&str>, first_page: Option<&PageContent>) -> String {
        if let Some(title) = metadata_title
            .map(str::trim)
            .filter(|t| self.is_reasonable(t))
            .map(|t| self.clean(t))
            .filter(|t| self.is_usable(t))
        {
            log::debug!("Title taken from metadata: {:?}", title);
            return title;
        }

        if let Some(title) = first_page
            .and_then(|page| self.largest_font_text(page))
            .map(|t| self.clean(&t))
            .filter(|t| self.is_usable(t))
        {
            log::debug!("Title taken from first page: {:?}", title);
            return title;
        }

        String::new()
    }

    /// Whether a string could plausibly be a title.
    pub fn is_reasonable(&self, text: &str) -> bool {
        let len = char_len(text);
        if len < self.config.title_min_chars || len > self.config.title_max_chars {
            return false;
        }
        if is_placeholder(text) {
            return false;
        }
        has_alpha(text)
    }

    /// Clean a raw title: collapse whitespace, strip file artifacts, and
    /// truncate long titles with an ellipsis.
    pub fn clean(&self, title: &str) -> String {
        let title = collapse_whitespace(title);
        let title = self.file_suffix.replace(&title, "");
        let title = self.word_prefix.replace(&title, "");

        let limit = self.config.title_truncate_chars;
        let title = if char_len(&title) > limit {
            let cut: String = title.chars().take(limit).collect();
            format!("{}...", cut.trim_end())
        } else {
            title.into_owned()
        };

        title.trim().to_string()
    }

    /// Largest-font text in the upper region of a page.
    ///
    /// Glyphs are grouped by `(size, rounded top)` in first-seen order; the
    /// groups sharing the largest size are tried in that order and the first
    /// reasonable one wins.
    pub fn largest_font_text(&self, page: &PageContent) -> Option<String> {
        let upper_limit = page.effective_height() * self.config.title_region_ratio;

        let mut groups: Vec<((f32, i64), Vec<&Glyph>)> = Vec::new();
        for glyph in page.glyphs.iter().filter(|g| self.in_title_region(g, upper_limit)) {
            let key = (glyph.size, glyph.top.round() as i64);
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(glyph),
                None => groups.push((key, vec![glyph])),
            }
        }

        let max_size = groups
            .iter()
            .map(|((size, _), _)| *size)
            .max_by(f32::total_cmp)?;

        groups
            .iter()
            .filter(|((size, _), _)| *size == max_size)
            .map(|(_, members)| {
                members
                    .iter()
                    .map(|g| g.text.as_str())
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .find(|candidate| self.is_reasonable(candidate))
    }

    fn in_title_region(&self, glyph: &Glyph, upper_limit: f32) -> bool {
        if !glyph.top.is_finite() || !glyph.size.is_finite() || glyph.top > upper_limit {
            return false;
        }
        match self.config.title_max_top {
            Some(max_top) => glyph.top < max_top,
            None => true,
        }
    }

    fn is_usable(&self, title: &str) -> bool {
        !title.is_empty() && !is_placeholder(title)
    }
}

fn is_placeholder(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    PLACEHOLDER_TITLES.contains(&lowered.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_page(glyphs: Vec<Glyph>) -> PageContent {
        PageContent::letter(1).with_glyphs(glyphs)
    }

    #[test]
    fn test_metadata_title_preferred() {
        let config = OutlineConfig::default();
        let selector = TitleSelector::new(&config);
        let page = title_page(Glyph::run("Cover Text", 72.0, 50.0, 30.0, 15.0));
        assert_eq!(
            selector.select(Some("  Annual   Report 2024 "), Some(&page)),
            "Annual Report 2024"
        );
    }

    #[test]
    fn test_placeholder_metadata_falls_back_to_page() {
        let config = OutlineConfig::default();
        let selector = TitleSelector::new(&config);
        let mut glyphs = Glyph::run("Field Guide", 72.0, 60.0, 28.0, 14.0);
        glyphs.extend(Glyph::run("by the authors", 72.0, 100.0, 12.0, 6.0));
        let page = title_page(glyphs);

        assert_eq!(selector.select(Some("Untitled"), Some(&page)), "Field Guide");
        assert_eq!(selector.select(Some("  "), Some(&page)), "Field Guide");
        assert_eq!(selector.select(None, Some(&page)), "Field Guide");
    }

    #[test]
    fn test_glyphs_below_title_region_ignored() {
        let config = OutlineConfig::default();
        let selector = TitleSelector::new(&config);
        let mut glyphs = Glyph::run("Small Header", 72.0, 40.0, 12.0, 6.0);
        // 792 * 0.3 = 237.6: the big text is too low on the page.
        glyphs.extend(Glyph::run("Huge Footer", 72.0, 600.0, 40.0, 20.0));
        let page = title_page(glyphs);

        assert_eq!(selector.select(None, Some(&page)), "Small Header");
    }

    #[test]
    fn test_absolute_title_cutoff() {
        let config = OutlineConfig::default().with_title_max_top(50.0);
        let selector = TitleSelector::new(&config);
        let mut glyphs = Glyph::run("Running Head", 72.0, 20.0, 10.0, 5.0);
        glyphs.extend(Glyph::run("Real Title", 72.0, 120.0, 24.0, 12.0));
        let page = title_page(glyphs);

        assert_eq!(selector.select(None, Some(&page)), "Running Head");
    }

    #[test]
    fn test_unreasonable_candidates_give_empty_title() {
        let config = OutlineConfig::default();
        let selector = TitleSelector::new(&config);
        let page = title_page(Glyph::run("2024", 72.0, 50.0, 30.0, 15.0));

        assert_eq!(selector.select(None, Some(&page)), "");
        assert_eq!(selector.select(None, None), "");
        assert_eq!(selector.select(Some("12"), None), "");
    }

    #[test]
    fn test_clean_strips_artifacts() {
        let config = OutlineConfig::default();
        let selector = TitleSelector::new(&config);
        assert_eq!(
            selector.clean("Microsoft Word - Quarterly Plan.DOCX"),
            "Quarterly Plan"
        );
        assert_eq!(selector.clean("report.pdf"), "report");
    }

    #[test]
    fn test_clean_truncates_long_titles() {
        let config = OutlineConfig::default();
        let selector = TitleSelector::new(&config);
        let long = "Word ".repeat(39); // 195 characters
        let cleaned = selector.clean(&long);
        assert!(cleaned.ends_with("..."));
        assert!(char_len(&cleaned) <= 153);
    }

    #[test]
    fn test_cleaned_placeholder_rejected() {
        let config = OutlineConfig::default();
        let selector = TitleSelector::new(&config);
        // "document.pdf" cleans down to the placeholder "document".
        assert_eq!(selector.select(Some("document.pdf"), None), "");
    }

    #[test]
    fn test_reasonable_title() {
        let config = OutlineConfig::default();
        let selector = TitleSelector::new(&config);
        assert!(selector.is_reasonable("Design Notes"));
        assert!(!selector.is_reasonable("Hi"));
        assert!(!selector.is_reasonable("DOCUMENT"));
        assert!(!selector.is_reasonable("1234"));
        assert!(!selector.is_reasonable(&"x".repeat(201)));
    }
}
