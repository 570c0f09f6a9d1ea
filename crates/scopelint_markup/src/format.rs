//! Markup dialects and their per-format conventions.

use std::fmt;

/// A supported markup dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Markdown,
    ReStructuredText,
    AsciiDoc,
    Xml,
    Dita,
    Html,
}

impl Format {
    /// Every supported format, in detection order.
    pub const ALL: [Format; 6] = [
        Format::Markdown,
        Format::ReStructuredText,
        Format::AsciiDoc,
        Format::Xml,
        Format::Dita,
        Format::Html,
    ];

    /// Returns the file extensions handled by this format.
    ///
    /// Extensions do not include the leading dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Markdown => &["md", "markdown", "mdown", "mkdn", "mkd"],
            Format::ReStructuredText => &["rst", "rest"],
            Format::AsciiDoc => &["adoc", "asciidoc", "asc"],
            Format::Xml => &["xml"],
            Format::Dita => &["dita"],
            Format::Html => &["html", "htm", "xhtml"],
        }
    }

    /// Detects the format of a file extension (case-insensitive, no leading dot).
    pub fn from_extension(extension: &str) -> Option<Format> {
        Self::ALL.into_iter().find(|format| {
            format
                .extensions()
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(extension))
        })
    }

    /// The canonical extension of this format, without the leading dot.
    pub fn canonical_extension(&self) -> &'static str {
        self.extensions()[0]
    }

    /// The canonical extension with its leading dot, used for glob matching.
    pub fn dotted_extension(&self) -> String {
        format!(".{}", self.canonical_extension())
    }

    /// Delimiter used to mark inline code in this format's source syntax.
    pub fn inline_code_delimiter(&self) -> Option<&'static str> {
        match self {
            Format::Markdown | Format::AsciiDoc => Some("`"),
            Format::ReStructuredText => Some("``"),
            _ => None,
        }
    }

    /// Wraps `text` in this format's inline-code delimiter.
    pub fn codify(&self, text: &str) -> String {
        match self.inline_code_delimiter() {
            Some(delim) => format!("{delim}{text}{delim}"),
            None => text.to_string(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Markdown => "markdown",
            Format::ReStructuredText => "restructuredtext",
            Format::AsciiDoc => "asciidoc",
            Format::Xml => "xml",
            Format::Dita => "dita",
            Format::Html => "html",
        };
        f.write_str(name)
    }
}
