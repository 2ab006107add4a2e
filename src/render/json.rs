//! JSON rendering for outlines.

use crate::error::{Error, Result};
use crate::model::Outline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
pub fn to_json(outline: &Outline, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outline),
        JsonFormat::Compact => serde_json::to_string(outline),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingCandidate, HeadingLevel};

    fn sample() -> Outline {
        Outline::new(
            "Field Guide",
            vec![HeadingCandidate::new(HeadingLevel::H1, "1. Birds", 2)],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        assert_eq!(JsonFormat::default(), JsonFormat::Pretty);
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Field Guide\""));
        assert!(json.contains("\"outline\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Field Guide","outline":[{"level":"H1","text":"1. Birds","page":2}]}"#
        );
    }

    #[test]
    fn test_empty_outline_json() {
        let json = to_json(&Outline::empty(), JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"title":"","outline":[]}"#);
    }
}
