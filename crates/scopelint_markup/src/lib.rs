//! # scopelint_markup
//!
//! Markup normalization layer for scopelint.
//!
//! This crate provides:
//! - Format detection from file extensions
//! - Source preprocessing (front matter and configured ignore patterns)
//! - A `MarkupConverter` trait with an embedded Markdown renderer and
//!   converters backed by `rst2html`, `asciidoctor`, `xsltproc` and the DITA
//!   Open Toolkit
//! - An HTML5 token stream over the converted output
//!
//! ## Example
//!
//! ```rust,ignore
//! use scopelint_markup::{ConversionInput, HtmlTokenizer, MarkdownConverter, MarkupConverter};
//! use std::path::Path;
//!
//! let converter = MarkdownConverter::new();
//! let input = ConversionInput { path: Path::new("README.md"), content: "# Hello" };
//! let html = converter.convert(&input).unwrap();
//!
//! for token in HtmlTokenizer::new(html.as_bytes()) {
//!     println!("{token:?}");
//! }
//! ```

mod converter;
mod error;
mod external;
mod format;
mod html;
mod markdown;
mod preprocess;
mod tools;

pub use converter::{
    ConversionInput, ConvertedMarkup, ConverterOptions, HtmlConverter, MarkupConverter,
    select_converter,
};
pub use error::MarkupError;
pub use external::{
    AsciiDocConverter, DitaConverter, RstConverter, XsltConverter, extract_body,
    normalize_apostrophes, strip_head,
};
pub use format::Format;
pub use html::{Attribute, HtmlTokenizer, Token};
pub use markdown::MarkdownConverter;
pub use preprocess::{Preprocessor, mask_info_strings};
pub use tools::{ToolResolver, run_piped};
