//! Scope classification of an HTML token stream.
//!
//! The classifier walks the tokens of converted markup once. Text inside
//! structural tags is accumulated into a block that is emitted when the
//! enclosing non-inline tag closes; inline tags with their own scope (links,
//! emphasis, ...) are additionally emitted on their own as soon as their text
//! is seen. Every fragment walked past is consumed from the
//! [`SourceContext`] so later blocks anchor after it.

use std::mem;

use scopelint_markup::{Format, HtmlTokenizer, Token};

use crate::block::Block;
use crate::context::SourceContext;
use crate::scope::{TagTables, derive_scope, is_inline, scope_for};

/// Punctuation that attaches to the preceding inline span without a space.
const STARTERS: &[char] = &['.', '?', '!', ',', ':', ';'];

/// Receiver of classified blocks.
pub trait BlockSink {
    fn emit(&mut self, block: Block);
}

impl BlockSink for Vec<Block> {
    fn emit(&mut self, block: Block) {
        self.push(block);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    /// The most recent start tag was block-level.
    Scanning { redact_next: bool },
    /// The most recent start tag was inline. `tag` is cleared by the inline
    /// end tag or once its scoped text has been emitted.
    InInlineSpan {
        tag: Option<String>,
        redact_next: bool,
    },
    /// Inside a skip tag; nested tags of the same name are counted.
    InSkipBlock { tag: String, depth: usize },
}

/// Single-pass classifier over one document's token stream.
pub struct Classifier<'t> {
    tables: &'t TagTables,
    format: Format,
    ext: String,
    context: SourceContext,
    state: ScanState,
    stack: Vec<String>,
    queue: Vec<String>,
    rendered: String,
    raw: String,
    skip_class: bool,
}

impl<'t> Classifier<'t> {
    /// Creates a classifier labelling blocks with the `ext` suffix.
    pub fn new(
        tables: &'t TagTables,
        format: Format,
        ext: impl Into<String>,
        context: SourceContext,
    ) -> Self {
        Self {
            tables,
            format,
            ext: ext.into(),
            context,
            state: ScanState::Scanning { redact_next: false },
            stack: Vec::new(),
            queue: Vec::new(),
            rendered: String::new(),
            raw: String::new(),
            skip_class: false,
        }
    }

    /// Returns the context as advanced so far.
    pub fn context(&self) -> &SourceContext {
        &self.context
    }

    /// Classifies every token and returns the final context.
    pub fn run<S: BlockSink>(
        mut self,
        tokenizer: &mut HtmlTokenizer,
        sink: &mut S,
    ) -> SourceContext {
        while self.feed(&tokenizer.next_token(), sink) {}
        self.context
    }

    /// Processes one token. Returns `false` once the stream has ended.
    pub fn feed<S: BlockSink>(&mut self, token: &Token, sink: &mut S) -> bool {
        let skip_class = mem::take(&mut self.skip_class);

        match token {
            Token::EndOfStream => {
                self.flush(sink);
                return false;
            }
            Token::StartTag { name, .. } => self.start_tag(name),
            Token::SelfClosingTag { .. } => {}
            Token::EndTag { name } => self.end_tag(name, sink),
            Token::Comment(text) => self.context.advance(text.trim()),
            Token::Text(text) => self.text(text.trim(), skip_class, sink),
        }

        self.attributes(token, sink);
        true
    }

    fn start_tag(&mut self, name: &str) {
        if let ScanState::InSkipBlock { tag, depth } = &mut self.state {
            if tag == name {
                *depth += 1;
            }
            return;
        }

        if self.tables.is_skip_tag(name) {
            self.state = ScanState::InSkipBlock {
                tag: name.to_string(),
                depth: 1,
            };
            return;
        }

        let redact_next = self.tables.is_ignored_inline(name);
        self.stack.push(name.to_string());
        self.state = if is_inline(name) {
            ScanState::InInlineSpan {
                tag: Some(name.to_string()),
                redact_next,
            }
        } else {
            ScanState::Scanning { redact_next }
        };
    }

    fn end_tag<S: BlockSink>(&mut self, name: &str, sink: &mut S) {
        if let ScanState::InSkipBlock { tag, depth } = &mut self.state {
            if tag == name {
                *depth -= 1;
            }
            if *depth == 0 {
                self.state = ScanState::Scanning { redact_next: false };
                self.flush(sink);
            }
            return;
        }

        if is_inline(name) {
            if let ScanState::InInlineSpan { tag, .. } = &mut self.state {
                *tag = None;
            }
        } else {
            self.flush(sink);
        }
    }

    fn text<S: BlockSink>(&mut self, text: &str, skip_class: bool, sink: &mut S) {
        if matches!(self.state, ScanState::InSkipBlock { .. }) {
            self.queue.push(text.to_string());
            return;
        }

        if let ScanState::InInlineSpan { tag, .. } = &mut self.state
            && let Some(scope) = tag.as_deref().and_then(scope_for)
            && !text.is_empty()
        {
            // The same text is linted again as part of its enclosing block,
            // so it is anchored against a snapshot.
            let mut snapshot = self.context.clone();
            snapshot.advance_all(&self.queue);
            sink.emit(Block::scoped(
                snapshot,
                text,
                text,
                format!("{}.{}", scope, self.ext),
            ));
            *tag = None;
        }

        self.queue.push(text.to_string());
        if text.is_empty() {
            return;
        }

        let (inline, redact_next) = match &mut self.state {
            ScanState::Scanning { redact_next } => (false, mem::take(redact_next)),
            ScanState::InInlineSpan { redact_next, .. } => (true, mem::take(redact_next)),
            ScanState::InSkipBlock { .. } => return,
        };

        let redact_code = redact_next || self.in_nested_teletype();
        let starter = text.starts_with(STARTERS) && !redact_code;

        let (mut rendered, mut raw) = if redact_code || skip_class {
            let masked: String = text
                .chars()
                .map(|c| if c == '\n' { c } else { '*' })
                .collect();
            (self.format.codify(&masked), self.format.codify(text))
        } else {
            (text.to_string(), text.to_string())
        };

        if inline && !starter {
            rendered.insert(0, ' ');
            raw.insert(0, ' ');
        }

        self.rendered.push_str(&rendered);
        self.raw.push_str(&raw);
    }

    /// rst2html wraps parts of inline literals in `span`s inside a `tt`.
    fn in_nested_teletype(&self) -> bool {
        if self.format != Format::ReStructuredText {
            return false;
        }

        self.stack
            .iter()
            .enumerate()
            .rev()
            .find(|(_, tag)| tag.as_str() != "span")
            .is_some_and(|(i, tag)| tag == "tt" && i + 1 != self.stack.len())
    }

    /// Emits the accumulated block and consumes the queued text.
    fn flush<S: BlockSink>(&mut self, sink: &mut S) {
        let rendered = mem::take(&mut self.rendered);
        let raw = mem::take(&mut self.raw);

        if !rendered.trim().is_empty() {
            let block = match derive_scope(&self.stack, &self.ext) {
                Some(scope) => Block::scoped(
                    self.context.clone(),
                    rendered.trim_start_matches(' '),
                    raw,
                    scope,
                ),
                None => Block::prose(
                    self.context.clone(),
                    rendered,
                    raw,
                    format!("text.{}", self.ext),
                ),
            };
            sink.emit(block);
        }

        self.context.advance_all(self.queue.drain(..));
        self.stack.clear();
    }

    fn attributes<S: BlockSink>(&mut self, token: &Token, sink: &mut S) {
        let Some(name) = token.name() else {
            return;
        };

        self.skip_class = token
            .attribute("class")
            .is_some_and(|class| self.tables.has_skip_class(class));

        if matches!(name, "img" | "a" | "p" | "script") {
            for attr in token
                .attributes()
                .iter()
                .filter(|attr| matches!(attr.key.as_str(), "href" | "id" | "src"))
            {
                self.context.advance(&attr.value);
            }
        }

        if name == "img" {
            for attr in token.attributes().iter().filter(|attr| attr.key == "alt") {
                sink.emit(Block::scoped(
                    self.context.clone(),
                    &attr.value,
                    &attr.value,
                    format!("text.attr.alt.{}", self.ext),
                ));
            }
        }
    }
}
