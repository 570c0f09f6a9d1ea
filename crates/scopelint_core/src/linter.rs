//! Core linter engine.

use std::sync::Arc;

use tracing::debug;

use scopelint_markup::{
    ConversionInput, ConverterOptions, Format, HtmlTokenizer, Preprocessor, ToolResolver,
    mask_info_strings, select_converter,
};

use crate::classifier::Classifier;
use crate::context::SourceContext;
use crate::dispatch::{Dispatcher, RuleEngine};
use crate::document::Document;
use crate::scope::TagTables;
use crate::{LinterConfig, LinterError};

/// The core linter engine.
///
/// Orchestrates preprocessing, conversion, classification and dispatch of
/// a document. Holds only data built once from the configuration, so a
/// single linter can be shared across threads.
pub struct Linter {
    /// Linter configuration.
    config: LinterConfig,
    /// Skip and redaction sets.
    tables: TagTables,
    /// Compiled ignore patterns.
    preprocessor: Preprocessor,
    /// Converter settings with paths resolved.
    options: ConverterOptions,
    /// Lookup for external converters.
    resolver: ToolResolver,
}

impl Linter {
    /// Creates a new linter that finds converters on `PATH`.
    pub fn new(config: LinterConfig) -> Self {
        Self::with_resolver(config, ToolResolver::from_env())
    }

    /// Creates a new linter with an explicit tool resolver.
    pub fn with_resolver(config: LinterConfig, resolver: ToolResolver) -> Self {
        let tables = TagTables::from_config(&config);
        let preprocessor = Preprocessor::new(&config.token_ignores, &config.block_ignores);
        let options = config.converter_options();

        Self {
            config,
            tables,
            preprocessor,
            options,
            resolver,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    /// Lints a document and returns the rule engine's matches.
    ///
    /// Conversion completes before any block is emitted, so a failing
    /// document produces no matches at all.
    pub fn lint_document<E: RuleEngine>(
        &self,
        doc: &mut Document,
        engine: &mut E,
    ) -> Result<Vec<E::Match>, LinterError> {
        debug!("Linting {} as {}", doc.path().display(), doc.format());

        let content = self
            .preprocessor
            .preprocess(doc.content(), doc.format())
            .map_err(|e| LinterError::from_markup(doc.path(), e))?;

        let converter = select_converter(doc.format(), &self.options, &self.resolver);
        debug!("Converting with {}", converter.name());

        let markup = converter
            .convert(&ConversionInput {
                path: doc.path(),
                content: &content,
            })
            .map_err(|e| LinterError::from_markup(doc.path(), e))?;

        let context_source = match doc.format() {
            Format::Markdown => mask_info_strings(doc.content()),
            _ => doc.content().to_string(),
        };

        Ok(self.lint_markup(doc, context_source, markup.as_bytes(), 0, engine))
    }

    /// Lints already converted markup.
    ///
    /// `context_source` is the text blocks are anchored against and
    /// `line_offset` is passed through to the rule engine, for markup
    /// embedded in a larger document.
    pub fn lint_markup<E: RuleEngine>(
        &self,
        doc: &mut Document,
        context_source: impl Into<Arc<str>>,
        markup: &[u8],
        line_offset: usize,
        engine: &mut E,
    ) -> Vec<E::Match> {
        let format = doc.format();
        let ext = doc.ext().to_string();

        let classifier = Classifier::new(
            &self.tables,
            format,
            ext,
            SourceContext::new(context_source),
        );
        let mut dispatcher = Dispatcher::new(doc, engine, line_offset);
        classifier.run(&mut HtmlTokenizer::new(markup), &mut dispatcher);

        dispatcher.finish()
    }
}
