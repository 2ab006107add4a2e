//! Candidate refinement: turns noisy per-line detections into the final
//! bounded, deduplicated and sorted heading list.
//!
//! Stages, in order:
//!
//! 1. structural filter (drop candidates missing level, text or page)
//! 2. quality filter (length, letters, junk prefixes)
//! 3. normalization (whitespace, control characters, trailing punctuation)
//! 4. deduplication on a punctuation- and case-insensitive key
//! 5. bounding to `max_headings` by a small additive score
//! 6. ordering by `(page, text)`
//!
//! Running stages 2–6 over their own output changes nothing.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::text::{alpha_count, char_len, collapse_whitespace, is_control, is_title_case};
use crate::config::OutlineConfig;
use crate::model::{Detector, HeadingCandidate, HeadingLevel};

/// Prefixes that never start a heading, whatever the document.
const JUNK_PREFIXES: &[&str] = &["©", "www.", "http"];

/// A candidate whose fields may be missing, as received from a producer
/// that is not the built-in detector (e.g. deserialized JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub level: Option<HeadingLevel>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(skip)]
    pub detector: Detector,
}

impl From<HeadingCandidate> for RawCandidate {
    fn from(candidate: HeadingCandidate) -> Self {
        Self {
            level: Some(candidate.level),
            text: Some(candidate.text),
            page: Some(candidate.page),
            detector: candidate.detector,
        }
    }
}

/// The refinement pipeline.
pub struct CandidateRefiner<'c> {
    config: &'c OutlineConfig,
    numbered_prefix: Regex,
}

impl<'c> CandidateRefiner<'c> {
    pub fn new(config: &'c OutlineConfig) -> Self {
        Self {
            config,
            numbered_prefix: Regex::new(r"^\d+\.").expect("numbered prefix pattern"),
        }
    }

    /// Run all stages over detector output.
    pub fn refine(&self, candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
        self.refine_raw(candidates.into_iter().map(RawCandidate::from))
    }

    /// Run all stages, starting with the structural filter.
    pub fn refine_raw<I>(&self, raw: I) -> Vec<HeadingCandidate>
    where
        I: IntoIterator<Item = RawCandidate>,
    {
        let complete = raw.into_iter().filter_map(structural_filter);

        let cleaned: Vec<HeadingCandidate> = complete
            .filter(|c| self.passes_quality(c.text.trim()))
            .map(|mut c| {
                c.text = normalize_text(&c.text);
                c
            })
            .filter(|c| self.passes_quality(&c.text))
            .collect();

        let unique = deduplicate(cleaned);
        let mut kept = self.bound(unique);
        sort_outline(&mut kept);
        kept
    }

    /// Universal quality predicate: bounded length, enough letters, no junk.
    pub fn passes_quality(&self, text: &str) -> bool {
        let len = char_len(text);
        if len < self.config.candidate_min_chars || len > self.config.candidate_max_chars {
            return false;
        }
        if alpha_count(text) < self.config.candidate_min_letters {
            return false;
        }
        !is_junk(text)
    }

    /// Keep at most `max_headings`, preferring higher scores and, among
    /// equal scores, earlier candidates.
    pub fn bound(&self, headings: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
        let max = self.config.max_headings;
        if headings.len() <= max {
            return headings;
        }

        log::debug!("Bounding {} headings to {}", headings.len(), max);
        let mut scored: Vec<(u32, HeadingCandidate)> =
            headings.into_iter().map(|h| (self.score(&h.text), h)).collect();
        // Stable: ties keep their original relative order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(max).map(|(_, h)| h).collect()
    }

    /// Ranking score used when there are too many headings.
    pub fn score(&self, text: &str) -> u32 {
        let mut score = 0;
        if self.numbered_prefix.is_match(text) {
            score += 3;
        }
        if (5..=50).contains(&char_len(text)) {
            score += 1;
        }
        if is_title_case(text) {
            score += 1;
        }
        score
    }
}

fn structural_filter(raw: RawCandidate) -> Option<HeadingCandidate> {
    match raw {
        RawCandidate {
            level: Some(level),
            text: Some(text),
            page: Some(page),
            detector,
        } if page > 0 => Some(HeadingCandidate::detected(level, text, page, detector)),
        _ => None,
    }
}

fn is_junk(text: &str) -> bool {
    text.trim().is_empty() || JUNK_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}

/// Drop control characters, collapse whitespace and strip any trailing run
/// of `:`/`;`/`,` mixed with spaces.
///
/// Control characters that are also whitespace (tab, newline) separate
/// words like a space does.
pub fn normalize_text(text: &str) -> String {
    let visible: String = text
        .chars()
        .filter(|c| c.is_whitespace() || !is_control(*c))
        .collect();
    collapse_whitespace(&visible)
        .trim_end_matches(|c: char| matches!(c, ':' | ';' | ',') || c.is_whitespace())
        .to_string()
}

/// Comparison key: punctuation removed, lowercased, trimmed.
pub fn dedup_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Keep the first occurrence of every key; candidates with an empty key are
/// dropped.
pub fn deduplicate(headings: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
    let mut seen = HashSet::new();
    headings
        .into_iter()
        .filter(|h| {
            let key = dedup_key(&h.text);
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

/// Sort by page, then text, so output does not depend on detector order.
pub fn sort_outline(headings: &mut [HeadingCandidate]) {
    headings.sort_by(|a, b| a.page.cmp(&b.page).then_with(|| a.text.cmp(&b.text)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel::{H1, H2, H3};

    fn candidate(level: HeadingLevel, text: &str, page: u32) -> HeadingCandidate {
        HeadingCandidate::new(level, text, page)
    }

    fn texts(headings: &[HeadingCandidate]) -> Vec<&str> {
        headings.iter().map(|h| h.text.as_str()).collect()
    }

    #[test]
    fn test_structural_filter_drops_incomplete() {
        let config = OutlineConfig::default();
        let refiner = CandidateRefiner::new(&config);
        let raw = vec![
            RawCandidate {
                level: Some(H1),
                text: Some("Overview".into()),
                page: Some(1),
                ..Default::default()
            },
            RawCandidate {
                level: None,
                text: Some("No Level".into()),
                page: Some(1),
                ..Default::default()
            },
            RawCandidate {
                level: Some(H2),
                text: None,
                page: Some(1),
                ..Default::default()
            },
            RawCandidate {
                level: Some(H2),
                text: Some("No Page".into()),
                page: None,
                ..Default::default()
            },
            RawCandidate {
                level: Some(H2),
                text: Some("Page Zero".into()),
                page: Some(0),
                ..Default::default()
            },
        ];

        let refined = refiner.refine_raw(raw);
        assert_eq!(texts(&refined), vec!["Overview"]);
    }

    #[test]
    fn test_raw_candidate_from_json() {
        let raw: Vec<RawCandidate> =
            serde_json::from_str(r#"[{"level":"H1","text":"Scope","page":2},{"text":"Lost"}]"#)
                .unwrap();
        assert_eq!(raw[0].level, Some(H1));
        assert_eq!(raw[1].page, None);
    }

    #[test]
    fn test_quality_filter() {
        let config = OutlineConfig::default();
        let refiner = CandidateRefiner::new(&config);
        assert!(refiner.passes_quality("Results"));
        assert!(!refiner.passes_quality("Ab"));
        assert!(!refiner.passes_quality("A 1"));
        assert!(!refiner.passes_quality(&"x".repeat(121)));
        assert!(!refiner.passes_quality("© 2024 Example Corp"));
        assert!(!refiner.passes_quality("www.example.com"));
        assert!(!refiner.passes_quality("https://example.com/docs"));
        assert!(!refiner.passes_quality("     "));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Key   Findings:  "), "Key Findings");
        assert_eq!(normalize_text("Notes;,:"), "Notes");
        assert_eq!(normalize_text("Tab\u{0007}le\u{0085}"), "Table");
        assert_eq!(normalize_text("Ratio: 3:1"), "Ratio: 3:1");
        assert_eq!(normalize_text("Scope \u{1} Aims"), "Scope Aims");
        assert_eq!(normalize_text("Results: \u{1}"), "Results");
        assert_eq!(normalize_text("Results: ,"), "Results");
        assert_eq!(normalize_text("Line\tBreak\nHere"), "Line Break Here");
    }

    #[test]
    fn test_dedup_key() {
        assert_eq!(dedup_key("Summary:"), "summary");
        assert_eq!(dedup_key("  SUMMARY "), "summary");
        assert_eq!(dedup_key("1.2 Scope & Aims"), "12 scope  aims");
        assert_eq!(dedup_key("snake_case"), "snake_case");
    }

    #[test]
    fn test_first_occurrence_survives() {
        let config = OutlineConfig::default();
        let refiner = CandidateRefiner::new(&config);
        let refined = refiner.refine(vec![
            candidate(H2, "Summary:", 3),
            candidate(H1, "summary", 1),
        ]);

        assert_eq!(refined.len(), 1);
        assert_eq!(refined[0].text, "Summary");
        assert_eq!(refined[0].page, 3);
        assert_eq!(refined[0].level, H2);
    }

    #[test]
    fn test_normalization_can_fail_quality() {
        let config = OutlineConfig::default();
        let refiner = CandidateRefiner::new(&config);
        // Passes quality as "ab:" but not once the colon is stripped.
        assert!(refiner.refine(vec![candidate(H3, "ab:", 1)]).is_empty());
    }

    #[test]
    fn test_sorted_by_page_then_text() {
        let config = OutlineConfig::default();
        let refiner = CandidateRefiner::new(&config);
        let refined = refiner.refine(vec![
            candidate(H1, "Zeta Section", 2),
            candidate(H1, "Beta Section", 1),
            candidate(H1, "Alpha Section", 2),
            candidate(H1, "Gamma Section", 1),
        ]);
        assert_eq!(
            texts(&refined),
            vec!["Beta Section", "Gamma Section", "Alpha Section", "Zeta Section"]
        );
    }

    #[test]
    fn test_bounding_prefers_numbered_then_original_order() {
        let config = OutlineConfig::default().with_max_headings(3);
        let refiner = CandidateRefiner::new(&config);
        let refined = refiner.refine(vec![
            candidate(H3, "plain lowercase words", 1), // 1
            candidate(H1, "2. Methods", 1),            // 5
            candidate(H2, "Key Results", 1),           // 2
            candidate(H2, "Open Questions", 1),        // 2
            candidate(H1, "1. Introduction", 1),       // 5
        ]);

        assert_eq!(
            texts(&refined),
            vec!["1. Introduction", "2. Methods", "Key Results"]
        );
    }

    #[test]
    fn test_score() {
        let config = OutlineConfig::default();
        let refiner = CandidateRefiner::new(&config);
        assert_eq!(refiner.score("1. Introduction"), 5);
        assert_eq!(refiner.score("Background"), 2);
        assert_eq!(refiner.score("see"), 0);
        assert_eq!(refiner.score(&"long lowercase ".repeat(5)), 0);
    }

    #[test]
    fn test_refiner_is_idempotent() {
        let config = OutlineConfig::default().with_max_headings(4);
        let refiner = CandidateRefiner::new(&config);
        let unbounded_config = OutlineConfig::default();
        let unbounded = CandidateRefiner::new(&unbounded_config);
        let input = vec![
            candidate(H1, "  Chapter 1 ", 1),
            candidate(H2, "Summary:", 2),
            candidate(H2, "summary", 3),
            candidate(H3, "ab:", 3),
            candidate(H1, "2. Design", 2),
            candidate(H3, "Data Sources;", 4),
            candidate(H3, "www.example.com", 4),
            candidate(H2, "Appendix A", 5),
            candidate(H2, "Glossary,", 5),
            candidate(H3, "Scope \u{1} Aims", 6),
            candidate(H3, "Results: \u{1}", 6),
            candidate(H3, "Findings: ,", 7),
        ];

        let all = unbounded.refine(input.clone());
        assert_eq!(all, unbounded.refine(all.clone()));

        let once = refiner.refine(input);
        let twice = refiner.refine(once.clone());
        assert_eq!(once, twice);
        assert!(once.len() <= 4);
    }

    #[test]
    fn test_control_characters_do_not_defeat_dedup() {
        let config = OutlineConfig::default();
        let refiner = CandidateRefiner::new(&config);
        let refined = refiner.refine(vec![
            candidate(H2, "Scope \u{1} Aims", 1),
            candidate(H2, "Scope Aims", 2),
        ]);

        assert_eq!(refined, vec![candidate(H2, "Scope Aims", 1)]);
    }
}
