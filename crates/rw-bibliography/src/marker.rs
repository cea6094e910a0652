//! Reference marker types.
//!
//! Markers are located by [`ReferenceFinder`](crate::ReferenceFinder) and are
//! transient: they borrow nothing and live for a single processing call.

use std::ops::Range;

/// Bibliographic attributes carried on a `<ref>` tag.
///
/// All fields are optional; a bare `<ref>Key</ref>` has empty details and
/// styles fall back to the identity key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceDetails {
    /// Author(s) as written, e.g. `Smith, J. and Jones, K.`.
    pub author: Option<String>,
    /// Publication year.
    pub year: Option<String>,
    /// Work title.
    pub title: Option<String>,
    /// Publisher or journal.
    pub publisher: Option<String>,
    /// Online location of the work.
    pub url: Option<String>,
    /// Date the URL was accessed.
    pub accessed: Option<String>,
    /// Page locator for this citation (in-text only).
    pub page: Option<String>,
}

impl ReferenceDetails {
    /// Attribute names recognized on `<ref>` tags.
    pub const ATTRIBUTES: [&'static str; 7] = [
        "author",
        "year",
        "title",
        "publisher",
        "url",
        "accessed",
        "page",
    ];

    /// Set a field by attribute name.
    ///
    /// Returns `false` if `name` is not a recognized attribute. Empty values
    /// are treated as absent.
    pub(crate) fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "author" => &mut self.author,
            "year" => &mut self.year,
            "title" => &mut self.title,
            "publisher" => &mut self.publisher,
            "url" => &mut self.url,
            "accessed" => &mut self.accessed,
            "page" => &mut self.page,
            _ => return false,
        };
        let value = value.trim();
        *slot = (!value.is_empty()).then(|| value.to_owned());
        true
    }

    /// Whether the bibliographic fields (everything except `page`) match.
    ///
    /// Two citations of the same work may cite different pages.
    #[must_use]
    pub fn same_work(&self, other: &Self) -> bool {
        self.author == other.author
            && self.year == other.year
            && self.title == other.title
            && self.publisher == other.publisher
            && self.url == other.url
            && self.accessed == other.accessed
    }
}

/// A single in-text reference occurrence: `<ref ...>Key</ref>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMarker {
    /// Exact matched source text, including the tags.
    pub raw_text: String,
    /// Identity key (trimmed element content).
    pub key: String,
    /// Attributes parsed from the opening tag.
    pub details: ReferenceDetails,
    /// Byte range of this occurrence in the source text.
    pub span: Range<usize>,
}

/// The bibliography placeholder: `<reflist style="..."/>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceListMarker {
    /// Exact matched source text.
    pub raw_text: String,
    /// Style requested by the `style` attribute, if any.
    pub style_name: Option<String>,
    /// Byte range of the placeholder in the source text.
    pub span: Range<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_attributes() {
        let mut details = ReferenceDetails::default();
        for name in ReferenceDetails::ATTRIBUTES {
            assert!(details.set(name, format!("{name}-value")), "{name}");
        }

        assert_eq!(details.author.as_deref(), Some("author-value"));
        assert_eq!(details.page.as_deref(), Some("page-value"));
    }

    #[test]
    fn test_set_unknown_attribute() {
        let mut details = ReferenceDetails::default();
        assert!(!details.set("isbn", "123".to_owned()));
        assert_eq!(details, ReferenceDetails::default());
    }

    #[test]
    fn test_set_blank_value_is_absent() {
        let mut details = ReferenceDetails::default();
        details.set("year", "  ".to_owned());
        assert_eq!(details.year, None);
    }

    #[test]
    fn test_same_work_ignores_page() {
        let mut a = ReferenceDetails::default();
        a.set("author", "Smith".to_owned());
        let mut b = a.clone();
        b.set("page", "12".to_owned());

        assert!(a.same_work(&b));

        b.set("year", "2021".to_owned());
        assert!(!a.same_work(&b));
    }
}
