//! Heuristic configuration for outline inference.

/// Every threshold the engine uses, with documented defaults.
///
/// The configuration is built once and handed to
/// [`OutlineExtractor`](crate::OutlineExtractor) by value; nothing mutates it
/// during extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineConfig {
    /// Pages processed per document (default 50)
    pub max_pages: u32,

    /// Headings kept per outline (default 100)
    pub max_headings: usize,

    /// Vertical distance within which glyphs share a line (default 3.0)
    pub line_tolerance: f32,

    /// Sized glyphs required before a font profile is trusted (default 20)
    pub min_font_samples: usize,

    /// Relative heading threshold: `median × ratio` (default 1.1)
    pub threshold_ratio: f32,

    /// Absolute heading threshold: `median + delta` (default 1.0)
    pub threshold_min_delta: f32,

    /// Lines at or above `p75 × ratio` are H1 (default 1.2)
    pub h1_p75_ratio: f32,

    /// Lines at or above `median × ratio` are H2 (default 1.3)
    pub h2_median_ratio: f32,

    /// Shortest font-detected heading, in characters (default 3)
    pub heading_min_chars: usize,

    /// Longest font-detected heading, in characters (default 100)
    pub heading_max_chars: usize,

    /// Minimum share of alphabetic characters in a font-detected heading (default 0.3)
    pub min_alpha_ratio: f32,

    /// Shortest refined candidate, in characters (default 3)
    pub candidate_min_chars: usize,

    /// Longest refined candidate, in characters (default 120)
    pub candidate_max_chars: usize,

    /// Alphabetic characters a refined candidate needs (default 2)
    pub candidate_min_letters: usize,

    /// Fraction of the first page searched for a title (default 0.3)
    pub title_region_ratio: f32,

    /// Optional absolute cutoff: title glyphs must have `top` below this
    pub title_max_top: Option<f32>,

    /// Shortest acceptable title (default 3)
    pub title_min_chars: usize,

    /// Longest acceptable raw title (default 200)
    pub title_max_chars: usize,

    /// Cleaned titles longer than this are cut and suffixed with `...` (default 150)
    pub title_truncate_chars: usize,

    /// Classify pages on the rayon thread pool (default true)
    pub parallel: bool,
}

impl OutlineConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cutoff.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set the maximum number of headings kept.
    pub fn with_max_headings(mut self, headings: usize) -> Self {
        self.max_headings = headings;
        self
    }

    /// Set the line grouping tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance.max(0.0);
        self
    }

    /// Set the minimum sample count for font statistics.
    pub fn with_min_font_samples(mut self, samples: usize) -> Self {
        self.min_font_samples = samples;
        self
    }

    /// Set the fraction of the first page searched for a title.
    pub fn with_title_region(mut self, ratio: f32) -> Self {
        self.title_region_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Restrict title glyphs to those starting above an absolute offset.
    pub fn with_title_max_top(mut self, top: f32) -> Self {
        self.title_max_top = Some(top);
        self
    }

    /// Enable or disable parallel page classification.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page classification.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Font size at or above which a line is considered a heading.
    pub fn heading_threshold(&self, median: f32) -> f32 {
        (median * self.threshold_ratio).max(median + self.threshold_min_delta)
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_headings: 100,
            line_tolerance: 3.0,
            min_font_samples: 20,
            threshold_ratio: 1.1,
            threshold_min_delta: 1.0,
            h1_p75_ratio: 1.2,
            h2_median_ratio: 1.3,
            heading_min_chars: 3,
            heading_max_chars: 100,
            min_alpha_ratio: 0.3,
            candidate_min_chars: 3,
            candidate_max_chars: 120,
            candidate_min_letters: 2,
            title_region_ratio: 0.3,
            title_max_top: None,
            title_min_chars: 3,
            title_max_chars: 200,
            title_truncate_chars: 150,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = OutlineConfig::new()
            .with_max_pages(10)
            .with_max_headings(25)
            .with_title_region(1.5)
            .with_title_max_top(200.0)
            .sequential();

        assert_eq!(config.max_pages, 10);
        assert_eq!(config.max_headings, 25);
        assert_eq!(config.title_region_ratio, 1.0);
        assert_eq!(config.title_max_top, Some(200.0));
        assert!(!config.parallel);
    }

    #[test]
    fn test_default_config() {
        let config = OutlineConfig::default();
        assert_eq!(config.max_pages, 50);
        assert_eq!(config.max_headings, 100);
        assert_eq!(config.min_font_samples, 20);
        assert!(config.parallel);
    }

    #[test]
    fn test_heading_threshold_uses_larger_floor() {
        let config = OutlineConfig::default();
        // Small median: the absolute +1 dominates.
        assert!((config.heading_threshold(6.0) - 7.0).abs() < 1e-5);
        // Large median: the relative 10% dominates.
        assert!((config.heading_threshold(20.0) - 22.0).abs() < 1e-4);
    }
}
