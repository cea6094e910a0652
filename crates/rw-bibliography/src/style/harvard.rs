//! Harvard (author-date) style.

use std::collections::HashMap;

use super::{ReferenceStyle, anchor_id, escape_html};
use crate::marker::{ReferenceDetails, ReferenceListMarker, ReferenceMarker};

/// Author-date citations with an alphabetical, unnumbered bibliography.
///
/// In-text: `(Smith, 2020)` or `(Smith, 2020, p. 4)`, falling back to the
/// identity key when the tag carries no author. Each in-text link targets
/// `#ref-<id>`; each bibliography entry links back to `#cite-<id>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HarvardStyle;

impl HarvardStyle {
    /// Registry name.
    pub const NAME: &'static str = "Harvard";
}

impl ReferenceStyle for HarvardStyle {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn sort_references<'a>(&self, references: &'a [ReferenceMarker]) -> Vec<&'a ReferenceMarker> {
        let mut first_by_key: HashMap<&str, &ReferenceMarker> = HashMap::new();
        let mut unique: Vec<&ReferenceMarker> = Vec::new();

        for reference in references {
            match first_by_key.get(reference.key.as_str()) {
                Some(first) => {
                    if !first.details.same_work(&reference.details) {
                        tracing::warn!(
                            key = %reference.key,
                            "Conflicting details for reference, using first occurrence"
                        );
                    }
                }
                None => {
                    first_by_key.insert(reference.key.as_str(), reference);
                    unique.push(reference);
                }
            }
        }

        unique.sort_by(|a, b| {
            sort_name(a)
                .cmp(&sort_name(b))
                .then_with(|| a.details.year.cmp(&b.details.year))
                .then_with(|| a.key.cmp(&b.key))
        });
        unique
    }

    fn render_reference(&self, reference: &ReferenceMarker) -> String {
        let id = anchor_id(&reference.key);
        format!(
            r##"<a class="citation" id="cite-{id}" href="#ref-{id}">({})</a>"##,
            escape_html(&in_text_label(reference))
        )
    }

    fn render_reference_list(
        &self,
        _list: &ReferenceListMarker,
        sorted: &[&ReferenceMarker],
    ) -> String {
        let mut lines = Vec::with_capacity(sorted.len() + 2);
        lines.push(format!(
            r#"<ul class="references" data-style="{}">"#,
            Self::NAME
        ));
        for reference in sorted {
            let id = anchor_id(&reference.key);
            lines.push(format!(
                r##"<li id="ref-{id}" data-key="{}">{} <a class="citation-backref" href="#cite-{id}">&#8617;</a></li>"##,
                escape_html(&reference.key),
                list_entry(&reference.key, &reference.details)
            ));
        }
        lines.push("</ul>".to_owned());
        lines.join("\n")
    }
}

/// Case-insensitive primary sort name: the author, or the key without one.
fn sort_name(reference: &ReferenceMarker) -> String {
    reference
        .details
        .author
        .as_deref()
        .unwrap_or(&reference.key)
        .to_lowercase()
}

/// Surname for in-text use: the author text before the first comma.
fn surname(author: &str) -> Option<&str> {
    let surname = author.split(',').next().unwrap_or(author).trim();
    (!surname.is_empty()).then_some(surname)
}

/// Unescaped in-text label without parentheses.
fn in_text_label(reference: &ReferenceMarker) -> String {
    let details = &reference.details;
    let mut label = match details.author.as_deref().and_then(surname) {
        Some(name) => match &details.year {
            Some(year) => format!("{name}, {year}"),
            None => name.to_owned(),
        },
        None => reference.key.clone(),
    };
    if let Some(page) = &details.page {
        label.push_str(", p. ");
        label.push_str(page);
    }
    label
}

/// Bibliography entry body (HTML).
///
/// `Author (Year) <em>Title</em>. Publisher. Available at: <a href="URL">URL</a> (Accessed: DATE).`
fn list_entry(key: &str, details: &ReferenceDetails) -> String {
    let mut entry = escape_html(details.author.as_deref().unwrap_or(key));

    if let Some(year) = &details.year {
        entry.push_str(&format!(" ({})", escape_html(year)));
    }
    if let Some(title) = &details.title {
        entry.push_str(&format!(" <em>{}</em>", escape_html(title)));
    }
    end_sentence(&mut entry);

    if let Some(publisher) = &details.publisher {
        entry.push(' ');
        entry.push_str(&escape_html(publisher));
        end_sentence(&mut entry);
    }

    if let Some(url) = &details.url {
        let url = escape_html(url);
        entry.push_str(&format!(r#" Available at: <a href="{url}">{url}</a>"#));
        if let Some(accessed) = &details.accessed {
            entry.push_str(&format!(" (Accessed: {})", escape_html(accessed)));
        }
        end_sentence(&mut entry);
    }

    entry
}

/// Terminate with a period unless the text already ends with one.
fn end_sentence(entry: &mut String) {
    if !entry.ends_with('.') {
        entry.push('.');
    }
}
