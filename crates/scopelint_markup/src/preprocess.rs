//! Source preprocessing applied before conversion.
//!
//! Front matter and user-configured ignore patterns are replaced with
//! code placeholders so that converters render them as code, which the
//! classifier never lints as prose.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use globset::{Glob, GlobMatcher};
use regex::{Captures, Regex};
use tracing::debug;

use crate::{Format, MarkupError};

static FRONT_MATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A(?:---|\+\+\+)\n(.+?)\n(?:---|\+\+\+)").expect("Invalid front matter regex")
});

static FENCE_INFO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("```.+").expect("Invalid fence info regex"));

/// A glob-keyed list of ignore regexes.
#[derive(Debug)]
struct IgnoreSection {
    glob: String,
    matcher: Result<GlobMatcher, String>,
    patterns: Vec<Regex>,
}

impl IgnoreSection {
    fn compile(glob: &str, regexes: &[String]) -> Self {
        let matcher = Glob::new(glob)
            .map(|g| g.compile_matcher())
            .map_err(|e| e.to_string());

        let patterns = regexes
            .iter()
            .filter_map(|source| match Regex::new(source) {
                Ok(re) => Some(re),
                Err(e) => {
                    debug!("Dropping ignore pattern '{}': {}", source, e);
                    None
                }
            })
            .collect();

        Self {
            glob: glob.to_string(),
            matcher,
            patterns,
        }
    }

    fn applies_to(&self, extension: &str) -> bool {
        self.matcher
            .as_ref()
            .is_ok_and(|matcher| matcher.is_match(extension))
    }
}

/// Format-specific code placeholders.
#[derive(Debug, Clone, Copy)]
struct Placeholders {
    format: Format,
}

impl Placeholders {
    fn for_format(format: Format) -> Option<Self> {
        match format {
            Format::Markdown | Format::AsciiDoc | Format::ReStructuredText => {
                Some(Self { format })
            }
            _ => None,
        }
    }

    fn inline(&self, body: &str) -> String {
        self.format.codify(body)
    }

    fn block(&self, body: &str) -> String {
        match self.format {
            Format::Markdown => format!("\n```\n{body}\n```\n"),
            Format::AsciiDoc => format!("\n----\n{body}\n----\n"),
            // Literal blocks must be indented relative to the `::` marker.
            _ => format!("\n::\n\n{}\n", indent(body, "    ")),
        }
    }
}

/// Applies front-matter and ignore-pattern substitutions.
///
/// Patterns are compiled once; an invalid glob is only reported when a
/// document is preprocessed, so that a bad pattern fails the document being
/// linted instead of the whole run.
#[derive(Debug, Default)]
pub struct Preprocessor {
    token_ignores: Vec<IgnoreSection>,
    block_ignores: Vec<IgnoreSection>,
}

impl Preprocessor {
    /// Compiles the configured token and block ignore patterns.
    pub fn new(
        token_ignores: &BTreeMap<String, Vec<String>>,
        block_ignores: &BTreeMap<String, Vec<String>>,
    ) -> Self {
        let compile = |sections: &BTreeMap<String, Vec<String>>| {
            sections
                .iter()
                .map(|(glob, regexes)| IgnoreSection::compile(glob, regexes))
                .collect()
        };

        Self {
            token_ignores: compile(token_ignores),
            block_ignores: compile(block_ignores),
        }
    }

    /// Returns the content to feed the converter for `format`.
    ///
    /// Formats without a code syntax (XML, DITA, HTML) are returned unchanged.
    pub fn preprocess(&self, content: &str, format: Format) -> Result<String, MarkupError> {
        let Some(placeholders) = Placeholders::for_format(format) else {
            return Ok(content.to_string());
        };

        if let Some(section) = self
            .token_ignores
            .iter()
            .chain(&self.block_ignores)
            .find(|section| section.matcher.is_err())
        {
            let message = section.matcher.as_ref().err().cloned().unwrap_or_default();
            return Err(MarkupError::invalid_pattern(&section.glob, message));
        }

        let extension = format.dotted_extension();

        let mut text = FRONT_MATTER
            .replace(content, |caps: &Captures| placeholders.block(&caps[1]))
            .into_owned();
        text = FENCE_INFO.replace_all(&text, "```").into_owned();

        for section in self.token_ignores.iter().filter(|s| s.applies_to(&extension)) {
            for pattern in &section.patterns {
                text = pattern
                    .replace_all(&text, |caps: &Captures| {
                        placeholders.inline(first_group(caps))
                    })
                    .into_owned();
            }
        }

        for section in self.block_ignores.iter().filter(|s| s.applies_to(&extension)) {
            for pattern in &section.patterns {
                text = pattern
                    .replace_all(&text, |caps: &Captures| {
                        if format == Format::ReStructuredText {
                            placeholders.block(&caps[0])
                        } else {
                            placeholders.block(first_group(caps))
                        }
                    })
                    .into_owned();
            }
        }

        Ok(text)
    }
}

/// Replaces every fence info string with `*` of equal byte length.
///
/// The result is used as the position-tracking source for Markdown so that
/// words in info strings (```` ```json ````) are never matched as prose.
pub fn mask_info_strings(content: &str) -> String {
    FENCE_INFO
        .replace_all(content, |caps: &Captures| {
            format!("```{}", "*".repeat(caps[0].len() - 3))
        })
        .into_owned()
}

fn first_group<'c>(caps: &'c Captures<'_>) -> &'c str {
    caps.get(1).map_or("", |m| m.as_str())
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
