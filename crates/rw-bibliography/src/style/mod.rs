//! Pluggable citation styles.
//!
//! A [`ReferenceStyle`] owns everything style-specific: ordering, in-text
//! rendering and bibliography rendering. The processor only sequences calls,
//! so adding a style means implementing this trait and registering it in a
//! [`StyleRegistry`](crate::StyleRegistry).

mod harvard;

pub use harvard::HarvardStyle;

use std::fmt::Write;

use crate::marker::{ReferenceListMarker, ReferenceMarker};

/// Formatting and ordering rules of a citation style.
///
/// Implementations must be deterministic: the same markers always produce the
/// same order and the same output.
pub trait ReferenceStyle: Send + Sync {
    /// Registry name of this style (case-sensitive), e.g. `"Harvard"`.
    fn name(&self) -> &str;

    /// Order references for the bibliography.
    ///
    /// Must be a total, stable order over the input. Styles that list each
    /// work once deduplicate by identity key here.
    fn sort_references<'a>(&self, references: &'a [ReferenceMarker]) -> Vec<&'a ReferenceMarker>;

    /// Render the in-text replacement for one marker.
    ///
    /// Output depends only on the marker, never on its position, so every
    /// occurrence of the same raw text renders identically.
    fn render_reference(&self, reference: &ReferenceMarker) -> String;

    /// Render the bibliography for already sorted references.
    ///
    /// Entry anchors must match the links emitted by
    /// [`render_reference`](Self::render_reference).
    fn render_reference_list(
        &self,
        list: &ReferenceListMarker,
        sorted: &[&ReferenceMarker],
    ) -> String;
}

/// Encode an identity key as an HTML id fragment.
///
/// ASCII alphanumerics and `-` are kept; every other character becomes
/// `_<hex codepoint>_`. The mapping is injective, so distinct keys never
/// share an anchor.
///
/// # Example
///
/// ```
/// use rw_bibliography::anchor_id;
///
/// assert_eq!(anchor_id("Smith2020"), "Smith2020");
/// assert_eq!(anchor_id("smith 2020"), "smith_20_2020");
/// ```
#[must_use]
pub fn anchor_id(key: &str) -> String {
    let mut id = String::with_capacity(key.len());
    for c in key.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            id.push(c);
        } else {
            // Writing to a String cannot fail
            let _ = write!(id, "_{:x}_", u32::from(c));
        }
    }
    id
}

/// Escape text for HTML element content and double-quoted attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
