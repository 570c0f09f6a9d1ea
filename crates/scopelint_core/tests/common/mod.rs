//! Shared helpers for integration tests.

#![allow(dead_code)]

use scopelint_core::{Block, BlockKind, Document, Position, RuleEngine};

/// A block as seen by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub scope: String,
    pub text: String,
    pub raw: String,
    pub kind: BlockKind,
    /// Position of the block's first word in its context, if found.
    pub position: Option<Position>,
    pub line_offset: usize,
}

impl Recorded {
    fn from_block(block: &Block, line_offset: usize) -> Self {
        let position = block
            .text()
            .split_whitespace()
            .next()
            .and_then(|word| block.position_of(word));

        Self {
            scope: block.scope().to_string(),
            text: block.text().to_string(),
            raw: block.raw().to_string(),
            kind: block.kind(),
            position,
            line_offset,
        }
    }
}

/// Rule engine that records every block it receives and reports each one
/// back as a match.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub blocks: Vec<Recorded>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scopes(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.scope.as_str()).collect()
    }

    pub fn with_scope(&self, scope: &str) -> Vec<&Recorded> {
        self.blocks.iter().filter(|b| b.scope == scope).collect()
    }

    fn record(&mut self, block: &Block, line_offset: usize) -> Vec<Recorded> {
        let recorded = Recorded::from_block(block, line_offset);
        self.blocks.push(recorded.clone());
        vec![recorded]
    }
}

impl RuleEngine for RecordingEngine {
    type Match = Recorded;

    fn lint_text(
        &mut self,
        _doc: &Document,
        block: &Block,
        line_offset: usize,
        _column_offset: usize,
    ) -> Vec<Recorded> {
        self.record(block, line_offset)
    }

    fn lint_prose(
        &mut self,
        _doc: &Document,
        block: &Block,
        line_offset: usize,
        _column_offset: usize,
    ) -> Vec<Recorded> {
        self.record(block, line_offset)
    }
}

/// Writes an executable shell script standing in for an external converter.
#[cfg(unix)]
pub fn write_tool(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
