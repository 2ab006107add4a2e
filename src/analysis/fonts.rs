//! Document-wide font size statistics.

use serde::{Deserialize, Serialize};

use crate::config::OutlineConfig;
use crate::model::{Glyph, HeadingLevel, PageContent};

/// Median and 75th-percentile font size over a document's glyphs.
///
/// Built once per document and only read afterwards; both values are order
/// statistics of the observed sizes, never interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontProfile {
    pub median: f32,
    pub p75: f32,
    /// Number of sized glyphs the profile was computed from
    pub samples: usize,
}

impl FontProfile {
    /// Compute a profile from raw sizes.
    ///
    /// Non-positive and non-finite sizes are ignored. Returns `None` when
    /// fewer than `min_samples` sizes remain: too little data to separate
    /// headings from body text.
    pub fn from_sizes<I>(sizes: I, min_samples: usize) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut sizes: Vec<f32> = sizes
            .into_iter()
            .filter(|s| s.is_finite() && *s > 0.0)
            .collect();

        if sizes.is_empty() || sizes.len() < min_samples {
            return None;
        }

        sizes.sort_by(f32::total_cmp);
        let n = sizes.len();
        let p75_index = ((n as f64 * 0.75) as usize).min(n - 1);

        Some(Self {
            median: sizes[n / 2],
            p75: sizes[p75_index],
            samples: n,
        })
    }

    /// Compute a profile over every glyph of the given pages.
    pub fn from_pages(pages: &[PageContent], min_samples: usize) -> Option<Self> {
        Self::from_sizes(
            pages
                .iter()
                .flat_map(|p| p.glyphs.iter())
                .map(|g: &Glyph| g.size),
            min_samples,
        )
    }

    /// Font size a line must reach to count as a heading.
    pub fn heading_threshold(&self, config: &OutlineConfig) -> f32 {
        config.heading_threshold(self.median)
    }

    /// Whether a line of this size is large enough to be a heading.
    pub fn is_heading_size(&self, size: f32, config: &OutlineConfig) -> bool {
        size >= self.heading_threshold(config)
    }

    /// Map a heading-sized line to a level by its size relative to the profile.
    pub fn level_for(&self, size: f32, config: &OutlineConfig) -> HeadingLevel {
        if size >= self.p75 * config.h1_p75_ratio {
            HeadingLevel::H1
        } else if size >= self.median * config.h2_median_ratio {
            HeadingLevel::H2
        } else {
            HeadingLevel::H3
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(spec: &[(f32, usize)]) -> Vec<f32> {
        spec.iter()
            .flat_map(|&(size, count)| std::iter::repeat(size).take(count))
            .collect()
    }

    #[test]
    fn test_requires_minimum_samples() {
        assert!(FontProfile::from_sizes(sizes(&[(12.0, 19)]), 20).is_none());
        assert!(FontProfile::from_sizes(sizes(&[(12.0, 20)]), 20).is_some());
        assert!(FontProfile::from_sizes(Vec::new(), 0).is_none());
    }

    #[test]
    fn test_ignores_unsized_glyphs() {
        let mut all = sizes(&[(12.0, 19)]);
        all.extend([0.0, -3.0, f32::NAN]);
        assert!(FontProfile::from_sizes(all, 20).is_none());
    }

    #[test]
    fn test_index_percentiles() {
        // 10 values: median = sorted[5], p75 = sorted[7]
        let values: Vec<f32> = (1..=10).map(|v| v as f32).collect();
        let profile = FontProfile::from_sizes(values, 1).unwrap();
        assert_eq!(profile.median, 6.0);
        assert_eq!(profile.p75, 8.0);
        assert_eq!(profile.samples, 10);
    }

    #[test]
    fn test_level_assignment() {
        let config = OutlineConfig::default();
        let profile = FontProfile::from_sizes(sizes(&[(10.0, 80), (14.0, 20)]), 20).unwrap();
        assert_eq!(profile.median, 10.0);
        assert_eq!(profile.p75, 10.0);

        assert!(!profile.is_heading_size(10.5, &config));
        assert!(profile.is_heading_size(11.2, &config));

        assert_eq!(profile.level_for(12.5, &config), HeadingLevel::H1);
        assert_eq!(profile.level_for(11.5, &config), HeadingLevel::H3);

        let spread = FontProfile {
            median: 10.0,
            p75: 12.0,
            samples: 100,
        };
        assert_eq!(spread.level_for(14.5, &config), HeadingLevel::H1);
        assert_eq!(spread.level_for(13.5, &config), HeadingLevel::H2);
        assert_eq!(spread.level_for(12.9, &config), HeadingLevel::H3);
    }
}
