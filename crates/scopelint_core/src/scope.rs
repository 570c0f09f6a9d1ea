//! Tag classification tables and scope derivation.

use crate::LinterConfig;

const DEFAULT_SKIP_TAGS: &[&str] = &["script", "style", "pre", "figure"];

/// `problematic` marks rst2html processing errors; `pre` marks rst2html
/// code spans.
const DEFAULT_SKIP_CLASSES: &[&str] = &["problematic", "pre"];

const DEFAULT_IGNORED_INLINE: &[&str] = &["tt", "code"];

const INLINE_TAGS: &[&str] = &[
    "b", "big", "i", "small", "abbr", "acronym", "cite", "dfn", "em", "kbd", "strong", "a", "br",
    "img", "span", "sub", "sup", "code", "tt", "del",
];

/// Returns the scope label of a tag, without the format suffix.
pub fn scope_for(tag: &str) -> Option<&'static str> {
    let scope = match tag {
        "th" => "text.table.header",
        "td" => "text.table.cell",
        "li" => "text.list",
        "blockquote" => "text.blockquote",
        // Inline scopes must not inherit from `text`.
        "strong" | "b" => "strong",
        "a" => "link",
        "em" | "i" => "emphasis",
        "code" => "code",
        _ => return None,
    };
    Some(scope)
}

/// Returns true for inline tags, which never close a block.
pub fn is_inline(tag: &str) -> bool {
    INLINE_TAGS.contains(&tag)
}

/// Returns true for `h0` through `h9`.
pub fn is_heading(tag: &str) -> bool {
    let bytes = tag.as_bytes();
    bytes.len() == 2 && bytes[0] == b'h' && bytes[1].is_ascii_digit()
}

/// Derives the label of a block from the open tags, innermost first.
///
/// The first non-inline tag with a scope entry, or the first heading,
/// wins. Returns `None` for plain prose.
pub fn derive_scope(stack: &[String], ext: &str) -> Option<String> {
    stack.iter().rev().find_map(|tag| {
        if is_inline(tag) {
            None
        } else if let Some(scope) = scope_for(tag) {
            Some(format!("{scope}.{ext}"))
        } else if is_heading(tag) {
            Some(format!("text.heading.{tag}.{ext}"))
        } else {
            None
        }
    })
}

/// Skip and redaction sets, built once from defaults and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTables {
    skip_tags: Vec<String>,
    skip_classes: Vec<String>,
    ignored_inline: Vec<String>,
}

impl TagTables {
    /// Builds the tables.
    ///
    /// `skipped_scopes` and `ignored_scopes` replace their defaults when
    /// non-empty; `ignored_classes` extends the default classes.
    pub fn from_config(config: &LinterConfig) -> Self {
        let or_default = |configured: &[String], defaults: &[&str]| -> Vec<String> {
            if configured.is_empty() {
                defaults.iter().map(|s| s.to_string()).collect()
            } else {
                configured.to_vec()
            }
        };

        let mut skip_classes: Vec<String> =
            DEFAULT_SKIP_CLASSES.iter().map(|s| s.to_string()).collect();
        skip_classes.extend(config.ignored_classes.iter().cloned());

        Self {
            skip_tags: or_default(&config.skipped_scopes, DEFAULT_SKIP_TAGS),
            skip_classes,
            ignored_inline: or_default(&config.ignored_scopes, DEFAULT_IGNORED_INLINE),
        }
    }

    /// Tags whose whole content is left unlinted.
    pub fn is_skip_tag(&self, tag: &str) -> bool {
        self.skip_tags.iter().any(|t| t == tag)
    }

    /// Inline tags whose text is redacted.
    pub fn is_ignored_inline(&self, tag: &str) -> bool {
        self.ignored_inline.iter().any(|t| t == tag)
    }

    /// Returns true if any space-separated class in `class_attr` is skipped.
    pub fn has_skip_class(&self, class_attr: &str) -> bool {
        class_attr
            .split(' ')
            .any(|class| self.skip_classes.iter().any(|c| c == class))
    }
}

impl Default for TagTables {
    fn default() -> Self {
        Self::from_config(&LinterConfig::default())
    }
}
