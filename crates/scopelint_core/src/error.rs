//! Linter error types.

use std::path::Path;

use scopelint_markup::MarkupError;
use thiserror::Error;

/// Errors that can occur while linting a document.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The file extension maps to no supported format.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A required external converter is not installed.
    #[error("{tool} not found")]
    ToolMissing { tool: String },

    /// The converter failed on this document.
    #[error("{path}:{line}: {message}")]
    Conversion {
        path: String,
        line: usize,
        message: String,
    },

    /// The source could not be parsed.
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// Reading converter output from disk failed.
    #[error("Filesystem error for {path}: {message}")]
    Filesystem { path: String, message: String },

    /// File I/O error.
    #[error("File error: {0}")]
    File(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat(extension.into())
    }

    /// Attaches the document path to a markup error.
    ///
    /// Conversion failures are reported at line 1 because converter output
    /// carries no source positions.
    pub fn from_markup(path: &Path, err: MarkupError) -> Self {
        let path = path.display().to_string();
        match err {
            MarkupError::InvalidPattern { .. } | MarkupError::MissingTransform => {
                Self::Config(err.to_string())
            }
            MarkupError::ToolMissing { tool } => Self::ToolMissing { tool },
            MarkupError::ConversionFailed { .. } => Self::Conversion {
                path,
                line: 1,
                message: err.to_string(),
            },
            MarkupError::InvalidSource(message) => Self::Parse { path, message },
            MarkupError::Filesystem(message) => Self::Filesystem { path, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_markup_conversion() {
        let err = LinterError::from_markup(
            Path::new("docs/a.adoc"),
            MarkupError::conversion_failed("asciidoctor", "boom"),
        );
        assert_eq!(err.to_string(), "docs/a.adoc:1: asciidoctor failed: boom");
    }

    #[test]
    fn test_from_markup_mapping() {
        let path = Path::new("a.xml");
        assert!(matches!(
            LinterError::from_markup(path, MarkupError::MissingTransform),
            LinterError::Config(_)
        ));
        assert!(matches!(
            LinterError::from_markup(path, MarkupError::invalid_pattern("*.{md", "bad")),
            LinterError::Config(_)
        ));
        assert!(matches!(
            LinterError::from_markup(path, MarkupError::tool_missing("xsltproc")),
            LinterError::ToolMissing { ref tool } if tool == "xsltproc"
        ));
        assert!(matches!(
            LinterError::from_markup(path, MarkupError::invalid_source("x")),
            LinterError::Parse { .. }
        ));
        assert!(matches!(
            LinterError::from_markup(path, MarkupError::filesystem("gone")),
            LinterError::Filesystem { ref path, .. } if path == "a.xml"
        ));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            LinterError::ToolMissing {
                tool: "rst2html".to_string()
            }
            .to_string(),
            "rst2html not found"
        );
        assert_eq!(
            LinterError::unsupported_format("txt").to_string(),
            "Unsupported format: txt"
        );
    }
}
