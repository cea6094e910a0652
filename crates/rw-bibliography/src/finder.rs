//! Lexical scanner for reference markers.
//!
//! Recognizes two tag forms anywhere in the content, without interpreting
//! the surrounding HTML:
//!
//! ```text
//! <ref author="Smith, J." year="2020">Smith2020</ref>   in-text reference
//! <reflist style="Harvard"/>                           bibliography placeholder
//! ```
//!
//! Anything that does not match exactly is left as literal text.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::attrs::{decode_entities, parse_attributes};
use crate::marker::{ReferenceDetails, ReferenceListMarker, ReferenceMarker};

/// Matches either marker form. Leftmost-first alternation keeps matches
/// non-overlapping; the key may not contain `<`, so tags never nest.
///
/// Attribute lists prefer whole quoted values, so a `>` inside quotes does
/// not end the tag. A stray quote falls back to a plain character.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<ref(?:\s(?P<attrs>(?:"[^"]*"|'[^']*'|[^>])*))?>(?P<key>[^<]*)</ref>|<reflist(?:\s(?P<list_attrs>(?:"[^"]*"|'[^']*'|[^>])*?))?\s*/?>(?:</reflist>)?"#,
    )
    .unwrap()
});

/// Attribute on `<reflist>` naming the citation style.
const STYLE_ATTRIBUTE: &str = "style";

/// Result of scanning a document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FoundReferences {
    /// Every reference occurrence, in order of appearance.
    pub references: Vec<ReferenceMarker>,
    /// The first reference-list placeholder, if any.
    pub reference_list: Option<ReferenceListMarker>,
    /// Byte ranges of later placeholders with the same raw text as
    /// [`reference_list`](Self::reference_list). They are substituted with it.
    pub repeated_list_spans: Vec<Range<usize>>,
    /// Diagnostics for tolerated problems (skipped markers, unknown attributes).
    pub warnings: Vec<String>,
}

impl FoundReferences {
    /// Whether at least one reference marker was found.
    ///
    /// Independent of whether a reference list was found.
    #[must_use]
    pub fn contains_any_references(&self) -> bool {
        !self.references.is_empty()
    }

    /// Whether a reference-list placeholder was found.
    #[must_use]
    pub fn has_reference_list(&self) -> bool {
        self.reference_list.is_some()
    }

    /// Distinct identity keys in order of first appearance.
    #[must_use]
    pub fn distinct_keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.references
            .iter()
            .map(|r| r.key.as_str())
            .filter(|key| seen.insert(*key))
            .collect()
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

/// Scans content for reference markers.
///
/// # Example
///
/// ```
/// use rw_bibliography::ReferenceFinder;
///
/// let found = ReferenceFinder::find(r#"See <ref>Smith2020</ref>. <reflist style="Harvard"/>"#);
///
/// assert!(found.contains_any_references());
/// assert_eq!(found.references[0].key, "Smith2020");
/// assert_eq!(
///     found.reference_list.unwrap().style_name.as_deref(),
///     Some("Harvard")
/// );
/// ```
pub struct ReferenceFinder;

impl ReferenceFinder {
    /// Extract all reference markers and the reference-list marker.
    ///
    /// Never fails: malformed markers are skipped and reported in
    /// [`FoundReferences::warnings`].
    #[must_use]
    pub fn find(content: &str) -> FoundReferences {
        let mut found = FoundReferences::default();

        for caps in MARKER_RE.captures_iter(content) {
            if caps.name("key").is_some() {
                Self::push_reference(&mut found, &caps);
            } else {
                Self::push_reference_list(&mut found, &caps);
            }
        }

        found
    }

    fn push_reference(found: &mut FoundReferences, caps: &Captures<'_>) {
        let Some(whole) = caps.get(0) else {
            return;
        };
        let key = caps.name("key").map_or("", |m| m.as_str().trim());

        if key.is_empty() {
            found.warn(format!(
                "reference at byte {}: empty key, left as text",
                whole.start()
            ));
            return;
        }

        let mut details = ReferenceDetails::default();
        let attrs = parse_attributes(caps.name("attrs").map_or("", |m| m.as_str()));
        for token in attrs.skipped {
            found.warn(format!(
                "reference '{key}' at byte {}: unparsable attribute text '{token}' ignored",
                whole.start()
            ));
        }
        for (name, value) in attrs.pairs {
            if !details.set(&name, value) {
                found.warn(format!(
                    "reference '{key}' at byte {}: unknown attribute '{name}' ignored (valid: {})",
                    whole.start(),
                    ReferenceDetails::ATTRIBUTES.join(", ")
                ));
            }
        }

        found.references.push(ReferenceMarker {
            raw_text: whole.as_str().to_owned(),
            key: decode_entities(key),
            details,
            span: whole.range(),
        });
    }

    fn push_reference_list(found: &mut FoundReferences, caps: &Captures<'_>) {
        let Some(whole) = caps.get(0) else {
            return;
        };

        if let Some(first) = &found.reference_list {
            if first.raw_text == whole.as_str() {
                found.repeated_list_spans.push(whole.range());
                found.warn(format!(
                    "reference list at byte {}: repeats the first reference list, replaced the same way",
                    whole.start()
                ));
            } else {
                found.warn(format!(
                    "reference list at byte {}: only one reference list is allowed, left as text",
                    whole.start()
                ));
            }
            return;
        }

        let mut style_name = None;
        let attrs = parse_attributes(caps.name("list_attrs").map_or("", |m| m.as_str()));
        for token in attrs.skipped {
            found.warn(format!(
                "reference list at byte {}: unparsable attribute text '{token}' ignored",
                whole.start()
            ));
        }
        for (name, value) in attrs.pairs {
            if name == STYLE_ATTRIBUTE {
                let value = value.trim();
                style_name = (!value.is_empty()).then(|| value.to_owned());
            } else {
                found.warn(format!(
                    "reference list at byte {}: unknown attribute '{name}' ignored (valid: {STYLE_ATTRIBUTE})",
                    whole.start()
                ));
            }
        }

        found.reference_list = Some(ReferenceListMarker {
            raw_text: whole.as_str().to_owned(),
            style_name,
            span: whole.range(),
        });
    }
}
