//! Markdown converter using markdown-rs (wooorm/markdown-rs).
//!
//! This converter renders Markdown to HTML in-process with the `markdown`
//! crate, so no external program is needed for the most common dialect.

use markdown::{CompileOptions, Options, ParseOptions, to_html_with_options};

use crate::{ConversionInput, ConvertedMarkup, MarkupConverter, MarkupError};

/// Markdown converter implementation.
///
/// Uses `markdown-rs` for rendering, with:
/// - CommonMark
/// - GFM (tables, strikethrough, autolinks, task lists, footnotes)
/// - Raw HTML passed through untouched
pub struct MarkdownConverter;

impl MarkdownConverter {
    /// Creates a new Markdown converter with default options.
    pub fn new() -> Self {
        Self
    }

    /// Gets default render options (GFM with raw HTML passthrough).
    fn default_options() -> Options {
        Options {
            parse: ParseOptions::gfm(),
            compile: CompileOptions {
                allow_dangerous_html: true,
                allow_dangerous_protocol: true,
                ..CompileOptions::gfm()
            },
        }
    }

    /// Renders Markdown source to an HTML string.
    pub fn render(&self, source: &str) -> Result<String, MarkupError> {
        to_html_with_options(source, &Self::default_options())
            .map_err(|e| MarkupError::invalid_source(e.to_string()))
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupConverter for MarkdownConverter {
    fn name(&self) -> &str {
        "markdown"
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConvertedMarkup, MarkupError> {
        self.render(input.content).map(ConvertedMarkup::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn render(source: &str) -> String {
        MarkdownConverter::new().render(source).unwrap()
    }

    #[test]
    fn test_render_heading_and_paragraph() {
        let html = render("# Title\n\nHello world.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Hello world.</p>"));
    }

    #[test]
    fn test_render_link() {
        let html = render("See [docs](https://example.com) for more.");
        assert!(html.contains(r#"<a href="https://example.com">docs</a>"#));
    }

    #[test]
    fn test_render_table() {
        let html = render("| Header |\n|--------|\n| Cell   |");
        assert!(html.contains("<th>Header</th>"));
        assert!(html.contains("<td>Cell</td>"));
    }

    #[test]
    fn test_render_strikethrough() {
        let html = render("~~gone~~");
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_render_raw_html_passthrough() {
        let html = render("<div class=\"note\">\n\nInside\n\n</div>");
        assert!(html.contains("<div class=\"note\">"));
    }

    #[test]
    fn test_render_code_block() {
        let html = render("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre><code class=\"language-rust\">"));
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_convert_trait() {
        let converter = MarkdownConverter;
        let input = ConversionInput {
            path: Path::new("doc.md"),
            content: "*em*",
        };
        let out = converter.convert(&input).unwrap();
        assert!(out.to_string_lossy().contains("<em>em</em>"));
        assert_eq!(converter.name(), "markdown");
    }
}
