//! Classified text fragments.

use std::ops::Range;

use crate::context::{Position, SourceContext};

/// How a block is delivered to the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Delivered through `lint_text`.
    Scoped,
    /// Delivered through `lint_prose`.
    Prose,
}

/// A fragment of rendered text with its scope and source context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    context: SourceContext,
    text: String,
    raw: String,
    scope: String,
    kind: BlockKind,
}

impl Block {
    pub fn scoped(
        context: SourceContext,
        text: impl Into<String>,
        raw: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::new(context, text, raw, scope, BlockKind::Scoped)
    }

    pub fn prose(
        context: SourceContext,
        text: impl Into<String>,
        raw: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::new(context, text, raw, scope, BlockKind::Prose)
    }

    fn new(
        context: SourceContext,
        text: impl Into<String>,
        raw: impl Into<String>,
        scope: impl Into<String>,
        kind: BlockKind,
    ) -> Self {
        Self {
            context,
            text: text.into(),
            raw: raw.into(),
            scope: scope.into(),
            kind,
        }
    }

    /// Snapshot of the source context at emission time.
    pub fn context(&self) -> &SourceContext {
        &self.context
    }

    /// Rendered text, with redacted spans masked.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text closer to the source, with inline-code delimiters restored.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Finds `fragment` in the unconsumed part of the source.
    pub fn locate(&self, fragment: &str) -> Option<Range<usize>> {
        self.context.locate(fragment)
    }

    /// Line and column of the first unconsumed occurrence of `fragment`.
    pub fn position_of(&self, fragment: &str) -> Option<Position> {
        self.locate(fragment)
            .map(|range| self.context.position(range.start))
    }
}
