//! Documents being linted.

use std::fs;
use std::path::{Path, PathBuf};

use scopelint_markup::Format;
use tracing::debug;

use crate::LinterError;

/// Maximum size of a document read from disk.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// A source document and the prose summary accumulated while linting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    content: String,
    format: Format,
    ext: String,
    summary: String,
}

impl Document {
    /// Creates a document, detecting the format from the path's extension.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Result<Self, LinterError> {
        let path = path.into();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();

        let format = Format::from_extension(&extension).ok_or_else(|| {
            LinterError::unsupported_format(if extension.is_empty() {
                path.display().to_string()
            } else {
                extension.clone()
            })
        })?;

        Ok(Self::with_format(path, content, format))
    }

    /// Creates a document with an explicit format.
    ///
    /// The format identifier is the lowercase extension of `path`, or the
    /// format's canonical extension when the path has none.
    pub fn with_format(
        path: impl Into<PathBuf>,
        content: impl Into<String>,
        format: Format,
    ) -> Self {
        let path = path.into();
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| format.canonical_extension().to_string());

        Self {
            path,
            content: content.into(),
            format,
            ext,
            summary: String::new(),
        }
    }

    /// Reads a document from disk.
    ///
    /// Non-regular files and files larger than [`MAX_FILE_SIZE`] are rejected.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        debug!("Reading {}", path.display());

        let metadata = fs::metadata(path).map_err(|e| {
            LinterError::file(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                e
            ))
        })?;

        if !metadata.is_file() {
            return Err(LinterError::file(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        if metadata.len() > MAX_FILE_SIZE {
            return Err(LinterError::file(format!(
                "File size exceeds limit of {} bytes: {}",
                MAX_FILE_SIZE,
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::file(format!("Failed to read {}: {}", path.display(), e)))?;

        Self::new(path, content)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// The format identifier used as the scope suffix (e.g. `md`).
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Prose accumulated so far, each block followed by a space.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    pub(crate) fn append_summary(&mut self, text: &str) {
        self.summary.push_str(text);
        self.summary.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case("README.md", Format::Markdown, "md")]
    #[case("notes.MARKDOWN", Format::Markdown, "markdown")]
    #[case("index.rst", Format::ReStructuredText, "rst")]
    #[case("guide.adoc", Format::AsciiDoc, "adoc")]
    #[case("book.xml", Format::Xml, "xml")]
    #[case("topic.dita", Format::Dita, "dita")]
    #[case("page.htm", Format::Html, "htm")]
    fn test_new_detects_format(#[case] path: &str, #[case] format: Format, #[case] ext: &str) {
        let doc = Document::new(path, "x").unwrap();
        assert_eq!(doc.format(), format);
        assert_eq!(doc.ext(), ext);
    }

    #[rstest]
    #[case("notes.txt", "Unsupported format: txt")]
    #[case("Makefile", "Unsupported format: Makefile")]
    fn test_new_unsupported(#[case] path: &str, #[case] message: &str) {
        let err = Document::new(path, "x").unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_with_format_without_extension() {
        let doc = Document::with_format("README", "# Hi", Format::Markdown);
        assert_eq!(doc.ext(), "md");
        assert_eq!(doc.path(), Path::new("README"));
    }

    #[test]
    fn test_summary_and_lines() {
        let mut doc = Document::with_format("a.md", "one\ntwo\n", Format::Markdown);
        assert_eq!(doc.line_count(), 2);
        doc.append_summary("First.");
        doc.append_summary("Second.");
        assert_eq!(doc.summary(), "First. Second. ");
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "# Title").unwrap();

        let doc = Document::from_file(&path).unwrap();
        assert_eq!(doc.content(), "# Title");
        assert_eq!(doc.format(), Format::Markdown);
    }

    #[test]
    fn test_from_file_rejects_directory() {
        let dir = tempdir().unwrap();
        let err = Document::from_file(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Not a regular file"));
    }

    #[test]
    fn test_from_file_rejects_large_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.md");
        let file = fs::File::create(&path).unwrap();
        file.set_len(MAX_FILE_SIZE + 1).unwrap();

        let err = Document::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("File size exceeds limit"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Document::from_file("/nonexistent/doc.md").unwrap_err();
        assert!(matches!(err, LinterError::File(_)));
    }
}
