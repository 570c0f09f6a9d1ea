//! Delivery of classified blocks to the rule engine.

use tracing::debug;

use crate::block::{Block, BlockKind};
use crate::classifier::BlockSink;
use crate::context::SourceContext;
use crate::document::Document;

/// The rule-matching engine that checks blocks against style rules.
///
/// Both methods receive every block of their kind exactly once, in
/// document order. Matches are returned to the caller of the linter
/// untouched.
pub trait RuleEngine {
    /// A single rule match.
    type Match;

    /// Checks a scoped block (headings, table cells, links, summary, raw, ...).
    fn lint_text(
        &mut self,
        doc: &Document,
        block: &Block,
        line_offset: usize,
        column_offset: usize,
    ) -> Vec<Self::Match>;

    /// Checks a prose block.
    fn lint_prose(
        &mut self,
        doc: &Document,
        block: &Block,
        line_offset: usize,
        column_offset: usize,
    ) -> Vec<Self::Match>;
}

/// Forwards blocks to a [`RuleEngine`] and collects its matches.
pub struct Dispatcher<'a, E: RuleEngine> {
    doc: &'a mut Document,
    engine: &'a mut E,
    line_offset: usize,
    matches: Vec<E::Match>,
    scoped: usize,
    prose: usize,
}

impl<'a, E: RuleEngine> Dispatcher<'a, E> {
    pub fn new(doc: &'a mut Document, engine: &'a mut E, line_offset: usize) -> Self {
        Self {
            doc,
            engine,
            line_offset,
            matches: Vec::new(),
            scoped: 0,
            prose: 0,
        }
    }

    /// Runs the document-level passes and returns every match.
    ///
    /// The summary block carries the untouched source as context and the
    /// accumulated prose as text; the raw block carries the whole content
    /// with an empty context.
    pub fn finish(mut self) -> Vec<E::Match> {
        let ext = self.doc.ext().to_string();

        let summary = Block::scoped(
            SourceContext::new(self.doc.content()),
            self.doc.summary(),
            "",
            format!("summary.{ext}"),
        );
        self.emit(summary);

        let raw = Block::scoped(
            SourceContext::new(""),
            self.doc.content(),
            "",
            format!("raw.{ext}"),
        );
        self.emit(raw);

        debug!(
            "Dispatched {} scoped and {} prose blocks for {}",
            self.scoped,
            self.prose,
            self.doc.path().display()
        );

        self.matches
    }
}

impl<E: RuleEngine> BlockSink for Dispatcher<'_, E> {
    fn emit(&mut self, block: Block) {
        let found = match block.kind() {
            BlockKind::Scoped => {
                self.scoped += 1;
                self.engine.lint_text(self.doc, &block, self.line_offset, 0)
            }
            BlockKind::Prose => {
                self.prose += 1;
                self.doc.append_summary(block.text());
                self.engine.lint_prose(self.doc, &block, self.line_offset, 0)
            }
        };
        self.matches.extend(found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scopelint_markup::Format;

    #[derive(Default)]
    struct Scopes;

    impl RuleEngine for Scopes {
        type Match = String;

        fn lint_text(&mut self, _: &Document, block: &Block, _: usize, _: usize) -> Vec<String> {
            vec![format!("text:{}", block.scope())]
        }

        fn lint_prose(&mut self, doc: &Document, block: &Block, _: usize, _: usize) -> Vec<String> {
            vec![format!("prose:{}:{}", block.scope(), doc.summary())]
        }
    }

    #[test]
    fn test_prose_appended_to_summary_before_linting() {
        let mut doc = Document::with_format("a.md", "One. Two.", Format::Markdown);
        let mut engine = Scopes;
        let mut dispatcher = Dispatcher::new(&mut doc, &mut engine, 0);

        dispatcher.emit(Block::prose(SourceContext::new("One. Two."), "One.", "One.", "text.md"));
        dispatcher.emit(Block::prose(SourceContext::new("One. Two."), "Two.", "Two.", "text.md"));
        let matches = dispatcher.finish();

        assert_eq!(
            matches,
            vec![
                "prose:text.md:One. ",
                "prose:text.md:One. Two. ",
                "text:summary.md",
                "text:raw.md",
            ]
        );
        assert_eq!(doc.summary(), "One. Two. ");
    }

    #[test]
    fn test_finish_on_empty_document() {
        let mut doc = Document::with_format("empty.rst", "", Format::ReStructuredText);
        let mut engine = Scopes;
        let matches = Dispatcher::new(&mut doc, &mut engine, 0).finish();
        assert_eq!(matches, vec!["text:summary.rst", "text:raw.rst"]);
    }
}
