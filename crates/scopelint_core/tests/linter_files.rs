//! Linting documents loaded from disk, and sharing one linter across threads.

mod common;

use std::fs;
use std::thread;

use common::RecordingEngine;
use pretty_assertions::assert_eq;
use scopelint_core::{Document, Linter, LinterConfig, Position};
use scopelint_markup::ToolResolver;
use tempfile::TempDir;

fn create_test_linter() -> Linter {
    Linter::with_resolver(LinterConfig::default(), ToolResolver::new(vec![]))
}

#[test]
fn test_lint_document_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.markdown");
    fs::write(&path, "## Notes\n\nShort note.\n").unwrap();

    let mut doc = Document::from_file(&path).unwrap();
    assert_eq!(doc.ext(), "markdown");

    let mut engine = RecordingEngine::new();
    create_test_linter()
        .lint_document(&mut doc, &mut engine)
        .unwrap();

    assert_eq!(
        engine.scopes(),
        vec![
            "text.heading.h2.markdown",
            "text.markdown",
            "summary.markdown",
            "raw.markdown"
        ]
    );
}

#[test]
fn test_config_file_drives_linting() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("scopelint.json");
    fs::write(
        &config_path,
        r#"{ "skipped_scopes": ["blockquote"], "ignored_scopes": ["em"] }"#,
    )
    .unwrap();

    let config = LinterConfig::from_file(&config_path).unwrap();
    let linter = Linter::with_resolver(config, ToolResolver::new(vec![]));

    let mut doc = Document::new(
        "quote.md",
        "> Quoted text.\n\nAn *odd* word.",
    )
    .unwrap();
    let mut engine = RecordingEngine::new();
    linter.lint_document(&mut doc, &mut engine).unwrap();

    assert_eq!(
        engine.scopes(),
        vec!["emphasis.md", "text.md", "summary.md", "raw.md"]
    );
    assert_eq!(engine.blocks[1].text, "An `***` word.");
    assert_eq!(engine.blocks[1].position, Some(Position::new(3, 0)));
}

#[test]
fn test_linter_shared_across_threads() {
    let linter = create_test_linter();

    let summaries: Vec<String> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let linter = &linter;
                s.spawn(move || {
                    let mut doc =
                        Document::new(format!("doc{i}.md"), format!("# Doc {i}\n\nBody {i}."))
                            .unwrap();
                    let mut engine = RecordingEngine::new();
                    linter.lint_document(&mut doc, &mut engine).unwrap();
                    doc.summary().to_string()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(summaries, vec!["Body 0. ", "Body 1. ", "Body 2. ", "Body 3. "]);
}
