//! Span-based rewriting.
//!
//! Edits are recorded against byte ranges of the original text and applied in
//! one forward pass that copies the untouched spans into a new buffer. Earlier
//! edits never shift the offsets of later ones, so two identical statements at
//! different positions are always replaced independently.

use std::ops::Range;

/// Collects span edits for single-pass application.
///
/// # Example
///
/// ```
/// use pal_directive::Rewrite;
///
/// let mut rewrite = Rewrite::new();
/// rewrite.replace(6..11, "there");
/// rewrite.remove(0..1);
/// assert_eq!(rewrite.apply("Xhey, world"), "hey, there");
/// ```
#[derive(Debug, Default)]
pub struct Rewrite {
    edits: Vec<(Range<usize>, String)>,
}

impl Rewrite {
    /// Create an empty rewrite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty rewrite with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            edits: Vec::with_capacity(capacity),
        }
    }

    /// Replace the text in `span` with `to`.
    pub fn replace(&mut self, span: Range<usize>, to: impl Into<String>) {
        self.edits.push((span, to.into()));
    }

    /// Drop the text in `span`.
    pub fn remove(&mut self, span: Range<usize>) {
        self.edits.push((span, String::new()));
    }

    /// Check if there are any edits registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Get the number of registered edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Apply all edits to `text`, producing the rewritten text.
    ///
    /// Edits may be registered in any order. Spans must lie on character
    /// boundaries of `text`; an edit overlapping an earlier one is ignored.
    #[must_use]
    pub fn apply(mut self, text: &str) -> String {
        if self.edits.is_empty() {
            return text.to_owned();
        }

        self.edits.sort_by_key(|(span, _)| span.start);

        let mut output = String::with_capacity(text.len());
        let mut copied = 0;
        for (span, to) in self.edits {
            debug_assert!(span.start >= copied, "overlapping edit at {}", span.start);
            if span.start < copied {
                continue;
            }
            output.push_str(&text[copied..span.start]);
            output.push_str(&to);
            copied = span.end;
        }
        output.push_str(&text[copied..]);

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_rewrite() {
        assert_eq!(Rewrite::new().apply("unchanged"), "unchanged");
    }

    #[test]
    fn test_single_replacement() {
        let mut rewrite = Rewrite::new();
        rewrite.replace(6..11, "universe");
        assert_eq!(rewrite.apply("hello world"), "hello universe");
    }

    #[test]
    fn test_replacements_registered_out_of_order() {
        let mut rewrite = Rewrite::new();
        rewrite.replace(4..5, "B");
        rewrite.replace(0..1, "A");
        assert_eq!(rewrite.apply("a - b"), "A - B");
    }

    #[test]
    fn test_identical_text_replaced_by_position() {
        let mut rewrite = Rewrite::new();
        rewrite.replace(4..7, "second");
        rewrite.replace(0..3, "first");
        assert_eq!(rewrite.apply("abc abc abc"), "first second abc");
    }

    #[test]
    fn test_removal() {
        let mut rewrite = Rewrite::new();
        rewrite.remove(2..3);
        assert_eq!(rewrite.apply(r"p \pal(a)"), "p pal(a)");
    }

    #[test]
    fn test_replacement_longer_and_shorter() {
        let mut rewrite = Rewrite::new();
        rewrite.replace(0..1, "xyz");
        rewrite.replace(2..7, "");
        assert_eq!(rewrite.apply("a bbbbb c"), "xyz  c");
    }

    #[test]
    fn test_adjacent_edits() {
        let mut rewrite = Rewrite::new();
        rewrite.replace(0..2, "1");
        rewrite.replace(2..4, "2");
        assert_eq!(rewrite.apply("aabb"), "12");
    }

    #[test]
    fn test_len_and_is_empty() {
        let mut rewrite = Rewrite::with_capacity(4);
        assert!(rewrite.is_empty());
        rewrite.replace(0..1, "a");
        rewrite.remove(1..2);
        assert_eq!(rewrite.len(), 2);
    }
}
