//! Source position tracking.
//!
//! Converters emit no source maps, so rendered text is re-anchored to the
//! original document by string matching. [`SourceContext`] holds the
//! immutable source plus the byte ranges already matched; every fragment
//! the classifier walks past is consumed so that later searches skip it.

use std::ops::Range;
use std::sync::Arc;

/// A position in source text.
///
/// Uses 1-indexed lines and 0-indexed byte columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (0-indexed, in bytes).
    pub column: usize,
}

impl Position {
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The original source and the set of byte ranges already consumed.
///
/// Consumed ranges are kept sorted and disjoint. A consumed range is never
/// selected again and the source itself never changes, so every offset
/// returned by [`locate`](Self::locate) stays valid for the whole document.
/// Clones share the source and copy only the range list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    source: Arc<str>,
    line_starts: Arc<[usize]>,
    consumed: Vec<Range<usize>>,
}

impl SourceContext {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            source,
            line_starts,
            consumed: Vec::new(),
        }
    }

    /// Returns the untouched source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Length of the source in bytes. Never changes.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Returns the consumed ranges in ascending order.
    pub fn consumed(&self) -> &[Range<usize>] {
        &self.consumed
    }

    /// Returns true if the byte at `offset` has been consumed.
    pub fn is_consumed(&self, offset: usize) -> bool {
        let idx = self.consumed.partition_point(|r| r.end <= offset);
        self.consumed.get(idx).is_some_and(|r| r.start <= offset)
    }

    /// Finds the first occurrence of `fragment` that does not overlap a
    /// consumed range, without consuming it.
    pub fn locate(&self, fragment: &str) -> Option<Range<usize>> {
        if fragment.is_empty() {
            return None;
        }

        let mut from = 0;
        while let Some(found) = self.source.get(from..)?.find(fragment) {
            let range = from + found..from + found + fragment.len();
            match self.first_overlap(&range) {
                None => return Some(range),
                // Any later candidate overlapping this range would be rejected too.
                Some(blocking) => from = blocking.end,
            }
        }
        None
    }

    /// Locates `fragment` and marks it consumed.
    pub fn consume(&mut self, fragment: &str) -> Option<Range<usize>> {
        let range = self.locate(fragment)?;
        let idx = self.consumed.partition_point(|r| r.start < range.start);
        self.consumed.insert(idx, range.clone());
        Some(range)
    }

    /// Consumes a run of rendered text.
    ///
    /// Each line is consumed whole when a contiguous unconsumed occurrence
    /// exists; otherwise its whitespace-separated words are consumed one by
    /// one. Words may then match an earlier duplicate than the one rendered.
    pub fn advance(&mut self, fragment: &str) {
        for line in fragment.split('\n').filter(|line| !line.is_empty()) {
            if self.consume(line).is_none() {
                for word in line.split_whitespace() {
                    self.consume(word);
                }
            }
        }
    }

    /// Advances by every fragment in order.
    pub fn advance_all<I, S>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for fragment in fragments {
            self.advance(fragment.as_ref());
        }
    }

    /// Renders the source with every consumed byte replaced by `placeholder`.
    ///
    /// Non-ASCII placeholders fall back to `@` so the length is unchanged.
    pub fn masked(&self, placeholder: u8) -> String {
        let placeholder = if placeholder.is_ascii() {
            placeholder
        } else {
            b'@'
        };

        let mut bytes = self.source.as_bytes().to_vec();
        for range in &self.consumed {
            bytes[range.clone()].fill(placeholder);
        }
        // Consumed ranges start and end on character boundaries.
        String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }

    /// Converts a byte offset into a line and column.
    ///
    /// Offsets past the end are clamped to the end of the source.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let idx = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[idx.saturating_sub(1)];
        Position::new(idx, offset - line_start)
    }

    fn first_overlap(&self, range: &Range<usize>) -> Option<&Range<usize>> {
        let idx = self.consumed.partition_point(|r| r.end <= range.start);
        self.consumed.get(idx).filter(|r| r.start < range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_consume_never_rematches() {
        let mut ctx = SourceContext::new("go to go");
        assert_eq!(ctx.consume("go"), Some(0..2));
        assert_eq!(ctx.consume("go"), Some(6..8));
        assert_eq!(ctx.consume("go"), None);
        assert_eq!(ctx.masked(b'@'), "@@ to @@");
    }

    #[test]
    fn test_locate_does_not_consume() {
        let ctx = SourceContext::new("abc abc");
        assert_eq!(ctx.locate("abc"), Some(0..3));
        assert_eq!(ctx.locate("abc"), Some(0..3));
        assert!(ctx.consumed().is_empty());
    }

    #[test]
    fn test_locate_skips_partially_consumed_occurrence() {
        let mut ctx = SourceContext::new("aaaa");
        ctx.consume("a");
        // "aa" at 0 overlaps the consumed byte; the next free pair starts at 1.
        assert_eq!(ctx.locate("aa"), Some(1..3));
    }

    #[test]
    fn test_empty_fragment_is_noop() {
        let mut ctx = SourceContext::new("text");
        assert_eq!(ctx.consume(""), None);
        ctx.advance("");
        ctx.advance("\n\n");
        assert!(ctx.consumed().is_empty());
    }

    #[test]
    fn test_advance_whole_line() {
        let mut ctx = SourceContext::new("# Hello world\n\nHello again.");
        ctx.advance("Hello world");
        assert_eq!(ctx.masked(b'@'), "# @@@@@@@@@@@\n\nHello again.");
    }

    #[test]
    fn test_advance_falls_back_to_words() {
        let mut ctx = SourceContext::new("See [docs](https://example.com) for more.");
        ctx.advance("See docs for more.");
        assert_eq!(
            ctx.masked(b'@'),
            "@@@ [@@@@](https://example.com) @@@ @@@@@"
        );
    }

    #[test]
    fn test_advance_multiline() {
        let mut ctx = SourceContext::new("one\ntwo\nthree");
        ctx.advance("one\nthree");
        assert_eq!(ctx.masked(b'#'), "###\ntwo\n#####");
    }

    #[test]
    fn test_advance_all() {
        let mut ctx = SourceContext::new("a b c");
        ctx.advance_all(["a", "c"]);
        assert!(ctx.is_consumed(0));
        assert!(!ctx.is_consumed(2));
        assert!(ctx.is_consumed(4));
    }

    #[test]
    fn test_length_invariant() {
        let source = "Caf\u{e9} au lait, caf\u{e9}.";
        let mut ctx = SourceContext::new(source);
        ctx.advance("caf\u{e9}.");
        ctx.advance("Caf\u{e9} au");
        assert_eq!(ctx.len(), source.len());
        assert_eq!(ctx.masked(b'@').len(), source.len());
        assert_eq!(ctx.masked(0xff).len(), source.len());
        assert_eq!(ctx.source(), source);
    }

    #[test]
    fn test_consumed_ranges_sorted_and_disjoint() {
        let mut ctx = SourceContext::new("x y x y x");
        ctx.consume("y");
        ctx.consume("x");
        ctx.consume("x y");
        assert_eq!(ctx.consumed(), &[0..1, 2..3, 4..7]);
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let mut ctx = SourceContext::new("one two");
        ctx.consume("one");
        let mut snapshot = ctx.clone();
        snapshot.consume("two");
        assert_eq!(ctx.locate("two"), Some(4..7));
        assert_eq!(snapshot.locate("two"), None);
    }

    #[rstest]
    #[case(0, Position::new(1, 0))]
    #[case(3, Position::new(1, 3))]
    #[case(4, Position::new(2, 0))]
    #[case(6, Position::new(2, 2))]
    #[case(8, Position::new(3, 0))]
    #[case(100, Position::new(3, 0))]
    fn test_position(#[case] offset: usize, #[case] expected: Position) {
        let ctx = SourceContext::new("abc\ndef\n");
        assert_eq!(ctx.position(offset), expected);
    }

    #[test]
    fn test_empty_source() {
        let ctx = SourceContext::new("");
        assert!(ctx.is_empty());
        assert_eq!(ctx.position(0), Position::new(1, 0));
        assert_eq!(ctx.masked(b'@'), "");
    }
}
