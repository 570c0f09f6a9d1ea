//! Linter configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use scopelint_markup::ConverterOptions;
use serde::{Deserialize, Serialize};

use crate::LinterError;

/// Configuration for the markup engine.
///
/// Every field is optional in JSON. Empty tag lists keep the built-in
/// defaults (see [`crate::TagTables`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinterConfig {
    /// Tags whose content is never linted. Replaces the defaults.
    pub skipped_scopes: Vec<String>,

    /// Classes whose text is redacted. Extends the defaults.
    pub ignored_classes: Vec<String>,

    /// Inline tags whose text is redacted. Replaces the defaults.
    pub ignored_scopes: Vec<String>,

    /// Glob → regexes replaced by inline code before conversion.
    pub token_ignores: BTreeMap<String, Vec<String>>,

    /// Glob → regexes replaced by code blocks before conversion.
    pub block_ignores: BTreeMap<String, Vec<String>>,

    /// Prebuilt Sphinx output used instead of running `rst2html`.
    pub sphinx_build_dir: Option<PathBuf>,

    /// XSLT sheet for XML documents.
    pub transform: Option<PathBuf>,

    /// Base directory for resolving relative paths.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl LinterConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        serde_json::from_str(json)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Resolves `path` against `base_dir` when it is relative.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Returns the converter settings with paths resolved.
    pub fn converter_options(&self) -> ConverterOptions {
        ConverterOptions {
            sphinx_build_dir: self.sphinx_build_dir.as_deref().map(|p| self.resolve_path(p)),
            transform: self.transform.as_deref().map(|p| self.resolve_path(p)),
        }
    }
}
