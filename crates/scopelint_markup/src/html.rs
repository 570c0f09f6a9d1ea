//! HTML token stream.
//!
//! Converter output is tokenized with the `html5ever` tokenizer, so HTML
//! rules apply: `script`, `style` and similar elements hold raw text, a bare
//! `<` in text stays text, and character references are decoded. Void
//! elements such as `<br>` are reported as self-closing and adjacent
//! character data is merged into a single text token.

use std::cell::RefCell;

use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token as RawToken, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};
use html5ever::tendril::StrTendril;
use tracing::debug;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A single attribute of a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercase attribute name.
    pub key: String,
    /// Entity-decoded value.
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A token of the HTML stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
    },
    SelfClosingTag {
        name: String,
        attributes: Vec<Attribute>,
    },
    EndTag {
        name: String,
    },
    /// Decoded character data, untrimmed.
    Text(String),
    Comment(String),
    /// End of input. Returned for every call once reached.
    EndOfStream,
}

impl Token {
    /// Returns the tag name of tag tokens.
    pub fn name(&self) -> Option<&str> {
        match self {
            Token::StartTag { name, .. }
            | Token::SelfClosingTag { name, .. }
            | Token::EndTag { name } => Some(name),
            _ => None,
        }
    }

    /// Returns the attributes of start and self-closing tags.
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Token::StartTag { attributes, .. } | Token::SelfClosingTag { attributes, .. } => {
                attributes
            }
            _ => &[],
        }
    }

    /// Returns the value of the first attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

/// Collects tokens pushed by the `html5ever` tokenizer.
#[derive(Default)]
struct Collector {
    tokens: RefCell<Vec<Token>>,
}

impl Collector {
    fn push(&self, token: Token) {
        self.tokens.borrow_mut().push(token);
    }

    fn push_text(&self, chunk: &str) {
        let mut tokens = self.tokens.borrow_mut();
        match tokens.last_mut() {
            Some(Token::Text(text)) => text.push_str(chunk),
            _ => tokens.push(Token::Text(chunk.to_string())),
        }
    }

    fn tag(&self, tag: Tag) -> TokenSinkResult<()> {
        let name = tag.name.to_string();
        let void = VOID_ELEMENTS.contains(&name.as_str());

        match tag.kind {
            // Void elements were already closed at their start tag.
            TagKind::EndTag if void => TokenSinkResult::Continue,
            TagKind::EndTag => {
                self.push(Token::EndTag { name });
                TokenSinkResult::Continue
            }
            TagKind::StartTag => {
                let attributes = tag
                    .attrs
                    .iter()
                    .map(|attr| Attribute::new(&*attr.name.local, &*attr.value))
                    .collect();

                if void || tag.self_closing {
                    self.push(Token::SelfClosingTag { name, attributes });
                    TokenSinkResult::Continue
                } else {
                    let next = content_model(&name);
                    self.push(Token::StartTag { name, attributes });
                    next
                }
            }
        }
    }
}

impl TokenSink for Collector {
    type Handle = ();

    fn process_token(&self, token: RawToken, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            RawToken::TagToken(tag) => return self.tag(tag),
            RawToken::CharacterTokens(chunk) => self.push_text(&chunk),
            RawToken::NullCharacterToken => self.push_text("\u{fffd}"),
            RawToken::CommentToken(text) => self.push(Token::Comment(text.to_string())),
            RawToken::ParseError(message) => debug!("Recovered from malformed markup: {}", message),
            RawToken::DoctypeToken(_) | RawToken::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}

/// Tokenizer state to switch to after the start tag `name`.
fn content_model(name: &str) -> TokenSinkResult<()> {
    match name {
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "textarea" | "title" => TokenSinkResult::RawData(RawKind::Rcdata),
        "plaintext" => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

/// Tokenizer over converted HTML markup.
///
/// The whole input is tokenized up front; tokens are then handed out one
/// at a time.
pub struct HtmlTokenizer {
    tokens: std::vec::IntoIter<Token>,
}

impl HtmlTokenizer {
    pub fn new(markup: &[u8]) -> Self {
        let input = BufferQueue::default();
        input.push_back(StrTendril::from_slice(&String::from_utf8_lossy(markup)));

        let tokenizer = Tokenizer::new(Collector::default(), TokenizerOpts::default());
        let _ = tokenizer.feed(&input);
        tokenizer.end();

        Self {
            tokens: tokenizer.sink.tokens.take().into_iter(),
        }
    }

    /// Returns the next token, or [`Token::EndOfStream`] once the input is
    /// exhausted.
    pub fn next_token(&mut self) -> Token {
        self.tokens.next().unwrap_or(Token::EndOfStream)
    }
}

impl Iterator for HtmlTokenizer {
    type Item = Token;

    /// Yields tokens up to, but not including, the end of the stream.
    fn next(&mut self) -> Option<Token> {
        self.tokens.next()
    }
}
