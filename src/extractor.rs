//! The extraction driver.
//!
//! Fetches pages from a [`DocumentSource`], builds a document-wide
//! [`FontProfile`], classifies every page, selects a title and refines the
//! candidates into an [`Outline`].

use std::io::Read;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::{CandidateRefiner, FontProfile, HeadingDetector, TitleSelector};
use crate::config::OutlineConfig;
use crate::error::Result;
use crate::model::{Detector, HeadingCandidate, Outline, PageContent};
use crate::parser::{DocumentSource, PdfSource};

/// Counters gathered during one extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionStats {
    /// Pages the document reports
    pub pages_available: u32,
    /// Pages fetched (bounded by `max_pages`)
    pub pages_processed: u32,
    /// Pages whose fetch failed and were treated as empty
    pub pages_failed: u32,
    /// Raw candidates from the font detector
    pub font_candidates: usize,
    /// Raw candidates from the pattern detector
    pub pattern_candidates: usize,
    /// Headings in the final outline
    pub headings_kept: usize,
    /// Document font profile, if enough glyphs were sized
    pub font_profile: Option<FontProfile>,
}

/// Infers outlines from documents.
///
/// # Example
///
/// ```no_run
/// use docoutline::{OutlineConfig, OutlineExtractor};
///
/// let extractor = OutlineExtractor::new(OutlineConfig::default().with_max_pages(20));
/// let outline = extractor.extract_file("report.pdf");
/// for heading in &outline.headings {
///     println!("{} {} (p. {})", heading.level, heading.text, heading.page);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    config: OutlineConfig,
}

impl OutlineExtractor {
    pub fn new(config: OutlineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Extract an outline; any document-level failure yields
    /// [`Outline::empty`].
    pub fn extract<S: DocumentSource>(&self, source: &S) -> Outline {
        self.extract_with_stats(source).0
    }

    /// Extract an outline together with extraction counters.
    pub fn extract_with_stats<S: DocumentSource>(&self, source: &S) -> (Outline, ExtractionStats) {
        let mut stats = ExtractionStats {
            pages_available: source.page_count(),
            ..Default::default()
        };

        let pages = self.fetch_pages(source, &mut stats);
        let profile = FontProfile::from_pages(&pages, self.config.min_font_samples);
        stats.font_profile = profile;
        match &profile {
            Some(p) => log::debug!(
                "Font profile: median {:.1}, p75 {:.1} over {} glyphs",
                p.median,
                p.p75,
                p.samples
            ),
            None => log::debug!("Too few sized glyphs for a font profile"),
        }

        let candidates = self.classify(&pages, profile.as_ref());
        stats.font_candidates = count_by(&candidates, Detector::Font);
        stats.pattern_candidates = count_by(&candidates, Detector::Pattern);

        let info = source.info();
        let title = TitleSelector::new(&self.config).select(info.title.as_deref(), pages.first());
        let headings = CandidateRefiner::new(&self.config).refine(candidates);
        stats.headings_kept = headings.len();

        log::info!(
            "Processed {}/{} pages: {} font and {} pattern candidates, {} headings kept",
            stats.pages_processed,
            stats.pages_available,
            stats.font_candidates,
            stats.pattern_candidates,
            stats.headings_kept
        );

        (Outline::new(title, headings), stats)
    }

    /// Open and extract a PDF file, returning [`Outline::empty`] on failure.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Outline {
        let path = path.as_ref();
        self.try_extract_file(path).unwrap_or_else(|e| {
            log::warn!("Outline extraction failed for {}: {}", path.display(), e);
            Outline::empty()
        })
    }

    /// Extract a PDF held in memory, returning [`Outline::empty`] on failure.
    pub fn extract_bytes(&self, data: &[u8]) -> Outline {
        self.try_extract_bytes(data).unwrap_or_else(|e| {
            log::warn!("Outline extraction failed: {}", e);
            Outline::empty()
        })
    }

    /// Open and extract a PDF file, propagating document-level errors.
    pub fn try_extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Outline> {
        let source = PdfSource::open(path)?;
        Ok(self.extract(&source))
    }

    /// Extract a PDF held in memory, propagating document-level errors.
    pub fn try_extract_bytes(&self, data: &[u8]) -> Result<Outline> {
        let source = PdfSource::from_bytes(data)?;
        Ok(self.extract(&source))
    }

    /// Extract a PDF from a reader, propagating document-level errors.
    pub fn try_extract_reader<R: Read>(&self, reader: R) -> Result<Outline> {
        let source = PdfSource::from_reader(reader)?;
        Ok(self.extract(&source))
    }

    fn fetch_pages<S: DocumentSource>(&self, source: &S, stats: &mut ExtractionStats) -> Vec<PageContent> {
        let count = source.page_count().min(self.config.max_pages);
        let mut pages = Vec::with_capacity(count as usize);

        for number in 1..=count {
            let page = match source.page(number) {
                Ok(page) => page,
                Err(e) => {
                    log::debug!("Skipping page {}: {}", number, e);
                    stats.pages_failed += 1;
                    PageContent::new(number, 0.0, 0.0)
                }
            };
            pages.push(page);

            if number % 10 == 0 {
                log::debug!("Fetched {}/{} pages", number, count);
            }
        }

        stats.pages_processed = count;
        pages
    }

    fn classify(&self, pages: &[PageContent], profile: Option<&FontProfile>) -> Vec<HeadingCandidate> {
        let detector = HeadingDetector::new(&self.config);

        if self.config.parallel {
            pages
                .par_iter()
                .map(|page| detector.detect(page, profile))
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect()
        } else {
            pages
                .iter()
                .flat_map(|page| detector.detect(page, profile))
                .collect()
        }
    }
}

fn count_by(candidates: &[HeadingCandidate], detector: Detector) -> usize {
    candidates.iter().filter(|c| c.detector == detector).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{DocumentInfo, Glyph, HeadingLevel};
    use crate::parser::MemorySource;

    fn body(top: f32) -> Vec<Glyph> {
        Glyph::run("ordinary paragraph text", 72.0, top, 10.0, 5.0)
    }

    fn page_with_heading(heading: &str) -> PageContent {
        let mut glyphs = Glyph::run(heading, 72.0, 300.0, 16.0, 8.0);
        for i in 0..4 {
            glyphs.extend(body(340.0 + i as f32 * 14.0));
        }
        PageContent::letter(1).with_glyphs(glyphs)
    }

    struct BrokenPages;

    impl DocumentSource for BrokenPages {
        fn info(&self) -> DocumentInfo {
            DocumentInfo::with_pages(3)
        }

        fn page_count(&self) -> u32 {
            3
        }

        fn page(&self, number: u32) -> Result<PageContent> {
            Err(Error::PdfParse(format!("page {} is damaged", number)))
        }
    }

    #[test]
    fn test_extract_counts_candidates() {
        let source = MemorySource::new(vec![
            page_with_heading("Background"),
            page_with_heading("Results"),
        ]);
        let (outline, stats) = OutlineExtractor::default().extract_with_stats(&source);

        assert_eq!(stats.pages_available, 2);
        assert_eq!(stats.pages_processed, 2);
        assert_eq!(stats.pages_failed, 0);
        assert_eq!(stats.font_candidates, 2);
        assert!(stats.font_profile.is_some());
        assert_eq!(stats.headings_kept, outline.len());
        assert_eq!(outline.headings[0].text, "Background");
        assert_eq!(outline.headings[0].page, 1);
        assert_eq!(outline.headings[1].text, "Results");
        assert_eq!(outline.headings[1].page, 2);
    }

    #[test]
    fn test_max_pages_bounds_work() {
        let pages = (0..5).map(|_| page_with_heading("Methods")).collect();
        let source = MemorySource::new(pages);
        let extractor = OutlineExtractor::new(OutlineConfig::default().with_max_pages(2));
        let (_, stats) = extractor.extract_with_stats(&source);

        assert_eq!(stats.pages_available, 5);
        assert_eq!(stats.pages_processed, 2);
    }

    #[test]
    fn test_failed_pages_are_empty() {
        let (outline, stats) = OutlineExtractor::default().extract_with_stats(&BrokenPages);
        assert_eq!(stats.pages_failed, 3);
        assert!(outline.is_empty());
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let source = MemorySource::new(vec![
            page_with_heading("Overview"),
            page_with_heading("Design"),
            page_with_heading("Evaluation"),
        ]);
        let parallel = OutlineExtractor::default().extract(&source);
        let sequential = OutlineExtractor::new(OutlineConfig::default().sequential()).extract(&source);
        assert_eq!(parallel, sequential);
        assert!(parallel
            .headings
            .iter()
            .all(|h| h.level == HeadingLevel::H1));
    }

    #[test]
    fn test_extract_bytes_invalid_is_empty() {
        let outline = OutlineExtractor::default().extract_bytes(b"not a pdf at all");
        assert_eq!(outline, Outline::empty());
        assert!(OutlineExtractor::default()
            .try_extract_bytes(b"not a pdf at all")
            .is_err());
    }
}
