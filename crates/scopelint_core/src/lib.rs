//! # scopelint_core
//!
//! Scope tagging engine for scopelint.
//!
//! This crate provides:
//! - Document loading and configuration
//! - A single-pass classifier that turns converted markup into scoped blocks
//! - Source position tracking through a consumed-range context
//! - Dispatch of blocks to a pluggable rule engine
//!
//! ## Example
//!
//! ```rust,ignore
//! use scopelint_core::{Block, Document, Linter, LinterConfig, RuleEngine};
//!
//! struct Printer;
//!
//! impl RuleEngine for Printer {
//!     type Match = ();
//!
//!     fn lint_text(&mut self, _: &Document, block: &Block, _: usize, _: usize) -> Vec<()> {
//!         println!("{}: {}", block.scope(), block.text());
//!         Vec::new()
//!     }
//!
//!     fn lint_prose(&mut self, doc: &Document, block: &Block, l: usize, c: usize) -> Vec<()> {
//!         self.lint_text(doc, block, l, c)
//!     }
//! }
//!
//! let linter = Linter::new(LinterConfig::default());
//! let mut doc = Document::new("README.md", "# Hello\n\nThis is a paragraph.")?;
//! linter.lint_document(&mut doc, &mut Printer)?;
//! ```

mod block;
mod classifier;
mod config;
mod context;
mod dispatch;
mod document;
mod error;
mod linter;
mod scope;

pub use block::{Block, BlockKind};
pub use classifier::{BlockSink, Classifier};
pub use config::LinterConfig;
pub use context::{Position, SourceContext};
pub use dispatch::{Dispatcher, RuleEngine};
pub use document::{Document, MAX_FILE_SIZE};
pub use error::LinterError;
pub use linter::Linter;
pub use scope::{TagTables, derive_scope, is_heading, is_inline, scope_for};
