//! Small text predicates shared by the detectors, the title selector and the
//! refiner. Lengths are always counted in characters, never bytes.

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn alpha_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

pub(crate) fn has_alpha(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// Every cased run starts with an uppercase letter followed only by
/// lowercase letters, and at least one cased letter exists.
///
/// Digits and punctuation separate words, so `"1. Introduction"` and
/// `"Terms-Of-Use"` qualify while `"Table of Contents"` does not.
pub(crate) fn is_title_case(text: &str) -> bool {
    let mut previous_cased = false;
    let mut seen_cased = false;

    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            seen_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            seen_cased = true;
        } else {
            previous_cased = false;
        }
    }

    seen_cased
}

/// At least one cased letter, and no lowercase ones.
pub(crate) fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Collapse runs of whitespace into single spaces and trim.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// C0 controls, DEL and C1 controls.
pub(crate) fn is_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1F}' | '\u{7F}'..='\u{9F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert!(is_title_case("Introduction"));
        assert!(is_title_case("1. Introduction"));
        assert!(is_title_case("Terms-Of-Use"));
        assert!(!is_title_case("Table of Contents"));
        assert!(!is_title_case("INTRODUCTION"));
        assert!(!is_title_case("McDonald"));
        assert!(!is_title_case("123"));
    }

    #[test]
    fn test_upper() {
        assert!(is_upper("CHAPTER ONE"));
        assert!(is_upper("PART 2:"));
        assert!(!is_upper("Chapter"));
        assert!(!is_upper("2024"));
    }

    #[test]
    fn test_counts_use_characters() {
        assert_eq!(char_len("Über"), 4);
        assert_eq!(alpha_count("a1-b2 ç"), 3);
        assert!(has_alpha("42 é"));
        assert!(!has_alpha("42 %"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
