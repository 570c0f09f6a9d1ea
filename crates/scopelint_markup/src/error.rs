//! Markup error types.

use thiserror::Error;

/// Errors that can occur while preparing or converting markup.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// A configured ignore glob could not be compiled.
    #[error("Invalid ignore pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending glob.
        pattern: String,
        /// Compiler message.
        message: String,
    },

    /// A required external converter is not on the search path.
    #[error("{tool} not found")]
    ToolMissing {
        /// Name of the missing tool.
        tool: String,
    },

    /// XML conversion was requested without a transform sheet.
    #[error("no XSLT transform provided")]
    MissingTransform,

    /// The external converter could not be started or exited unsuccessfully.
    #[error("{tool} failed: {message}")]
    ConversionFailed {
        /// Name of the converter.
        tool: String,
        /// Diagnostic output of the converter.
        message: String,
    },

    /// The embedded converter rejected the source.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// Temporary directory or generated file handling failed.
    #[error("Filesystem error: {0}")]
    Filesystem(String),
}

impl MarkupError {
    /// Creates a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates a new missing tool error.
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        Self::ToolMissing { tool: tool.into() }
    }

    /// Creates a new conversion failure.
    pub fn conversion_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConversionFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Creates a new invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource(message.into())
    }

    /// Creates a new filesystem error.
    pub fn filesystem(message: impl Into<String>) -> Self {
        Self::Filesystem(message.into())
    }
}
