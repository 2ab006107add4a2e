//! Markdown table of contents for outlines.

use crate::error::Result;
use crate::model::{HeadingCandidate, Outline};

/// Convert an outline to a Markdown table of contents.
pub fn to_markdown(outline: &Outline) -> Result<String> {
    Ok(MarkdownRenderer::new().render(outline))
}

/// Renders an outline as a nested bullet list, one entry per heading.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    indent: usize,
    show_pages: bool,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            indent: 2,
            show_pages: true,
        }
    }

    /// Spaces per nesting level.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Whether entries end with `(p. N)`.
    pub fn with_page_numbers(mut self, show: bool) -> Self {
        self.show_pages = show;
        self
    }

    pub fn render(&self, outline: &Outline) -> String {
        let mut output = String::new();

        if !outline.title.is_empty() {
            output.push_str("# ");
            output.push_str(&escape_markdown(&outline.title));
            output.push_str("\n\n");
        }

        for heading in &outline.headings {
            output.push_str(&self.entry(heading));
            output.push('\n');
        }

        output
    }

    fn entry(&self, heading: &HeadingCandidate) -> String {
        let depth = (heading.level.depth() as usize).saturating_sub(1);
        let mut line = " ".repeat(depth * self.indent);
        line.push_str("- ");
        line.push_str(&escape_markdown(&heading.text));
        if self.show_pages {
            line.push_str(&format!(" (p. {})", heading.page));
        }
        line
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape characters that would otherwise start inline formatting.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel::{H1, H2, H3};

    fn outline() -> Outline {
        Outline::new(
            "Operations Manual",
            vec![
                HeadingCandidate::new(H1, "1. Setup", 1),
                HeadingCandidate::new(H2, "1.1 Wiring", 2),
                HeadingCandidate::new(H3, "Ground_loop checks", 3),
            ],
        )
    }

    #[test]
    fn test_markdown_toc() {
        let md = to_markdown(&outline()).unwrap();
        assert_eq!(
            md,
            "# Operations Manual\n\n\
             - 1. Setup (p. 1)\n  \
             - 1.1 Wiring (p. 2)\n    \
             - Ground\\_loop checks (p. 3)\n"
        );
    }

    #[test]
    fn test_markdown_without_title_or_pages() {
        let mut untitled = outline();
        untitled.title.clear();
        let md = MarkdownRenderer::new()
            .with_indent(4)
            .with_page_numbers(false)
            .render(&untitled);
        assert!(md.starts_with("- 1. Setup\n"));
        assert!(md.contains("\n    - 1.1 Wiring\n"));
    }

    #[test]
    fn test_markdown_empty_outline() {
        assert_eq!(to_markdown(&Outline::empty()).unwrap(), "");
    }
}
