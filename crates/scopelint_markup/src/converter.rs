//! Converter trait definition.

use std::path::{Path, PathBuf};

use crate::external::{AsciiDocConverter, DitaConverter, RstConverter, XsltConverter};
use crate::tools::ToolResolver;
use crate::{Format, MarkdownConverter, MarkupError};

/// The document handed to a converter.
#[derive(Debug, Clone, Copy)]
pub struct ConversionInput<'a> {
    /// Path of the original document.
    pub path: &'a Path,
    /// Preprocessed source text.
    pub content: &'a str,
}

/// HTML-equivalent markup produced by a converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedMarkup {
    bytes: Vec<u8>,
}

impl ConvertedMarkup {
    /// Wraps converter output.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Returns the converted bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the converted markup as text, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the converter produced no output.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Trait for converting a markup dialect into HTML.
///
/// Implementations either render in-process (Markdown), pipe the source
/// through an external program (reStructuredText, AsciiDoc, XML), or build
/// the document into a directory and read the generated page back (DITA,
/// prebuilt Sphinx output).
///
/// # Example
///
/// ```rust,ignore
/// use scopelint_markup::{ConversionInput, ConvertedMarkup, MarkupConverter, MarkupError};
///
/// struct Passthrough;
///
/// impl MarkupConverter for Passthrough {
///     fn name(&self) -> &str {
///         "passthrough"
///     }
///
///     fn convert(&self, input: &ConversionInput<'_>) -> Result<ConvertedMarkup, MarkupError> {
///         Ok(ConvertedMarkup::new(input.content))
///     }
/// }
/// ```
pub trait MarkupConverter {
    /// Returns the name of this converter.
    fn name(&self) -> &str;

    /// Converts the document into HTML-equivalent markup.
    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConvertedMarkup, MarkupError>;
}

/// Settings the external converters need from the linter configuration.
#[derive(Debug, Clone, Default)]
pub struct ConverterOptions {
    /// Directory holding a prebuilt Sphinx build (`<dir>/html/<stem>.html`).
    pub sphinx_build_dir: Option<PathBuf>,
    /// XSLT sheet used for XML documents.
    pub transform: Option<PathBuf>,
}

/// HTML documents are already in the common representation.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlConverter;

impl MarkupConverter for HtmlConverter {
    fn name(&self) -> &str {
        "html"
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConvertedMarkup, MarkupError> {
        Ok(ConvertedMarkup::new(input.content))
    }
}

/// Selects the converter for a format.
pub fn select_converter(
    format: Format,
    options: &ConverterOptions,
    resolver: &ToolResolver,
) -> Box<dyn MarkupConverter> {
    match format {
        Format::Markdown => Box::new(MarkdownConverter::new()),
        Format::ReStructuredText => Box::new(RstConverter::new(
            resolver.clone(),
            options.sphinx_build_dir.clone(),
        )),
        Format::AsciiDoc => Box::new(AsciiDocConverter::new(resolver.clone())),
        Format::Xml => Box::new(XsltConverter::new(
            resolver.clone(),
            options.transform.clone(),
        )),
        Format::Dita => Box::new(DitaConverter::new(resolver.clone())),
        Format::Html => Box::new(HtmlConverter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Format::Markdown, "markdown")]
    #[case(Format::ReStructuredText, "rst2html")]
    #[case(Format::AsciiDoc, "asciidoctor")]
    #[case(Format::Xml, "xsltproc")]
    #[case(Format::Dita, "dita")]
    #[case(Format::Html, "html")]
    fn test_select_converter(#[case] format: Format, #[case] name: &str) {
        let converter =
            select_converter(format, &ConverterOptions::default(), &ToolResolver::new(vec![]));
        assert_eq!(converter.name(), name);
    }

    #[test]
    fn test_html_passthrough() {
        let input = ConversionInput {
            path: Path::new("page.html"),
            content: "<p>Hi</p>",
        };
        let out = HtmlConverter.convert(&input).unwrap();
        assert_eq!(out.as_bytes(), b"<p>Hi</p>");
        assert_eq!(out.len(), 9);
        assert!(!out.is_empty());
    }
}
