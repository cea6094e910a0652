//! Attribute parsing for marker tags.
//!
//! Parses the `key="value" key='value' key=value` list found between a tag
//! name and its closing `>`.

/// Attributes read from a tag, plus the text that could not be read.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedAttributes {
    /// `(name, value)` pairs in source order, values entity-decoded.
    pub(crate) pairs: Vec<(String, String)>,
    /// Tokens skipped as unparsable: bare words and unterminated quoted values.
    pub(crate) skipped: Vec<String>,
}

/// Parse a tag's attribute string into `(name, value)` pairs in source order.
///
/// Unparsable tokens are collected in [`ParsedAttributes::skipped`], so
/// partial input yields whatever pairs could be read. An unterminated quoted
/// value swallows the rest of the string.
pub(crate) fn parse_attributes(attrs_str: &str) -> ParsedAttributes {
    let mut parsed = ParsedAttributes::default();
    let mut remaining = attrs_str.trim();

    while !remaining.is_empty() {
        remaining = remaining.trim_start();

        if let Some((key, value, rest)) = parse_key_value(remaining) {
            parsed.pairs.push((key.to_owned(), decode_entities(value)));
            remaining = rest;
        } else {
            let skip = if opens_quoted_value(remaining) {
                remaining.len()
            } else {
                // Skip to the next whitespace-separated token
                remaining
                    .find(char::is_whitespace)
                    .unwrap_or(remaining.len())
            };
            parsed.skipped.push(remaining[..skip].to_owned());
            remaining = &remaining[skip..];
        }
    }

    parsed
}

/// Whether `s` starts with `key=` followed by an opening quote.
fn opens_quoted_value(s: &str) -> bool {
    s.split_once('=').is_some_and(|(key, value)| {
        let key = key.trim();
        !key.is_empty()
            && !key.contains(char::is_whitespace)
            && value.trim_start().starts_with(['"', '\''])
    })
}

/// Parse a key-value pair from the start of `s`.
///
/// Supports: `key="value"`, `key='value'`, `key=value`
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();

    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after_eq = s[eq_pos + 1..].trim_start();

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}

/// Decode the entities [`escape_html`](crate::escape_html) produces.
///
/// Authors write attribute values inside HTML, so `&amp;` means `&`.
pub(crate) fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_owned();
    }

    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
