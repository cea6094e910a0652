//! Single-pass span substitution.
//!
//! Collects replacements for marker spans and rebuilds the content once.

use std::ops::Range;

/// Collects span replacements for single-pass application.
///
/// Instead of calling `content.replace()` once per distinct marker
/// (O(N × `content_length`) with an allocation each time), all replacements
/// are registered against the byte spans reported by the finder, then
/// [`apply()`](Self::apply) copies the untouched text between them exactly
/// once. Text outside the registered spans is never inspected, so rendered
/// output can never be re-matched by a later replacement.
#[derive(Debug, Default)]
pub(crate) struct Replacements<'r> {
    items: Vec<(Range<usize>, &'r str)>,
}

impl<'r> Replacements<'r> {
    /// Create a new empty replacements collector.
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Create a new replacements collector with pre-allocated capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Register a replacement for the bytes in `span`.
    pub(crate) fn add(&mut self, span: Range<usize>, replacement: &'r str) {
        self.items.push((span, replacement));
    }

    /// Check if there are any replacements registered.
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build the substituted content.
    ///
    /// Spans are applied in source order. A span overlapping an earlier one,
    /// or falling outside `content`, is skipped.
    pub(crate) fn apply(mut self, content: &str) -> String {
        if self.is_empty() {
            return content.to_owned();
        }

        self.items.sort_by_key(|(span, _)| span.start);

        let mut result = String::with_capacity(content.len());
        let mut copied_to = 0;

        for (span, replacement) in self.items {
            if span.start < copied_to
                || span.end > content.len()
                || !content.is_char_boundary(span.start)
                || !content.is_char_boundary(span.end)
            {
                continue;
            }
            result.push_str(&content[copied_to..span.start]);
            result.push_str(replacement);
            copied_to = span.end;
        }

        result.push_str(&content[copied_to..]);
        result
    }
}
