//! Bibliography processing for a single document.
//!
//! This module provides [`BibliographyProcessor`], which finds reference
//! markers, resolves the citation style and substitutes rendered output.
//!
//! # Processing paths
//!
//! | references | list | result |
//! |---|---|---|
//! | no | no | content returned unchanged |
//! | yes | no | reference markers removed |
//! | no | yes | list placeholder removed |
//! | yes | yes | citations and bibliography rendered |

use std::borrow::Cow;
use std::collections::HashMap;

use rw_config::BibliographyConfig;

use crate::error::BibliographyError;
use crate::finder::{FoundReferences, ReferenceFinder};
use crate::marker::ReferenceListMarker;
use crate::registry::StyleRegistry;
use crate::replacements::Replacements;
use crate::style::ReferenceStyle;

/// Style used when the reference list does not name one.
pub const DEFAULT_STYLE: &str = rw_config::DEFAULT_STYLE;

/// Read/write access to a host document's text content.
///
/// The processor never needs to know where the text came from.
pub trait Document {
    /// Current text content.
    fn content(&self) -> &str;

    /// Replace the text content.
    fn set_content(&mut self, content: String);
}

impl Document for String {
    fn content(&self) -> &str {
        self
    }

    fn set_content(&mut self, content: String) {
        *self = content;
    }
}

/// Rewrites reference markers into rendered citations and a bibliography.
///
/// Stateless between calls: one processor can serve any number of documents,
/// including concurrently from several threads.
///
/// # Configuration
///
/// - [`default_style`](Self::default_style): style used when `<reflist>` has
///   no `style` attribute (default: `"Harvard"`)
/// - [`with_registry`](Self::with_registry): registry to resolve style names
///   (default: [`StyleRegistry::global`])
///
/// # Example
///
/// ```
/// use rw_bibliography::BibliographyProcessor;
///
/// let processor = BibliographyProcessor::new();
/// let output = processor
///     .process(r#"See <ref>Smith2020</ref> and <ref>Jones2019</ref>. <reflist style="Harvard"/>"#)
///     .unwrap();
///
/// let jones = output.find(r#"id="ref-Jones2019""#).unwrap();
/// let smith = output.find(r#"id="ref-Smith2020""#).unwrap();
/// assert!(jones < smith);
/// ```
#[derive(Debug)]
pub struct BibliographyProcessor<'r> {
    registry: &'r StyleRegistry,
    default_style: String,
}

impl BibliographyProcessor<'static> {
    /// Create a processor using the global registry and the default
    /// configuration (Harvard style).
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&BibliographyConfig::default())
    }

    /// Create a processor from the `[bibliography]` configuration section.
    #[must_use]
    pub fn from_config(config: &BibliographyConfig) -> Self {
        Self {
            registry: StyleRegistry::global(),
            default_style: config.default_style.clone(),
        }
    }
}

impl Default for BibliographyProcessor<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> BibliographyProcessor<'r> {
    /// Set the style used when the reference list names none.
    ///
    /// The name is resolved lazily, so an unknown default only fails for
    /// documents that need it.
    #[must_use]
    pub fn default_style(mut self, name: impl Into<String>) -> Self {
        self.default_style = name.into();
        self
    }

    /// Resolve style names against a custom registry.
    #[must_use]
    pub fn with_registry<'n>(self, registry: &'n StyleRegistry) -> BibliographyProcessor<'n> {
        BibliographyProcessor {
            registry,
            default_style: self.default_style,
        }
    }

    /// Process one document's content.
    ///
    /// Returns the input borrowed when no marker is present. Content outside
    /// the markers is preserved byte-for-byte.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::UnknownStyle`] if the document has both
    /// references and a reference list and the requested style is not
    /// registered. The style is resolved before any output is built.
    pub fn process<'a>(&self, content: &'a str) -> Result<Cow<'a, str>, BibliographyError> {
        let found = ReferenceFinder::find(content);

        match (found.contains_any_references(), &found.reference_list) {
            (false, None) => Ok(Cow::Borrowed(content)),
            (true, None) => {
                tracing::debug!(
                    references = found.references.len(),
                    "No reference list, removing reference markers"
                );
                Ok(Cow::Owned(remove_references(content, &found)))
            }
            (false, Some(list)) => {
                tracing::debug!(
                    placeholders = found.repeated_list_spans.len() + 1,
                    "No references, removing reference list"
                );
                let mut replacements =
                    Replacements::with_capacity(found.repeated_list_spans.len() + 1);
                add_list_spans(&mut replacements, &found, list, "");
                Ok(Cow::Owned(replacements.apply(content)))
            }
            (true, Some(list)) => {
                let style = self.resolve_style(list)?;
                Ok(Cow::Owned(render(content, &found, list, style)))
            }
        }
    }

    /// Process a host document in place.
    ///
    /// Content is written back only if it changed. Returns whether it changed.
    ///
    /// # Errors
    ///
    /// Same as [`process`](Self::process); the document is left untouched.
    pub fn process_document<D: Document + ?Sized>(
        &self,
        document: &mut D,
    ) -> Result<bool, BibliographyError> {
        let processed = match self.process(document.content())? {
            Cow::Borrowed(_) => return Ok(false),
            Cow::Owned(processed) => processed,
        };
        document.set_content(processed);
        Ok(true)
    }

    fn resolve_style(
        &self,
        list: &ReferenceListMarker,
    ) -> Result<&'r dyn ReferenceStyle, BibliographyError> {
        let name = list.style_name.as_deref().unwrap_or(&self.default_style);
        self.registry.get(name)
    }
}

/// Register `replacement` for the list placeholder and its identical repeats.
fn add_list_spans<'r>(
    replacements: &mut Replacements<'r>,
    found: &FoundReferences,
    list: &ReferenceListMarker,
    replacement: &'r str,
) {
    replacements.add(list.span.clone(), replacement);
    for span in &found.repeated_list_spans {
        replacements.add(span.clone(), replacement);
    }
}

/// Remove every reference marker occurrence.
fn remove_references(content: &str, found: &FoundReferences) -> String {
    let mut replacements = Replacements::with_capacity(found.references.len());
    for reference in &found.references {
        replacements.add(reference.span.clone(), "");
    }
    replacements.apply(content)
}

/// Render citations and the bibliography with a resolved style.
fn render(
    content: &str,
    found: &FoundReferences,
    list: &ReferenceListMarker,
    style: &dyn ReferenceStyle,
) -> String {
    let sorted = style.sort_references(&found.references);

    // Rendering depends only on the marker, so identical raw text is rendered once
    let mut rendered: HashMap<&str, String> = HashMap::new();
    for reference in &found.references {
        rendered
            .entry(reference.raw_text.as_str())
            .or_insert_with(|| style.render_reference(reference));
    }
    let rendered_list = style.render_reference_list(list, &sorted);

    tracing::debug!(
        style = style.name(),
        references = found.references.len(),
        distinct = rendered.len(),
        entries = sorted.len(),
        "Rendering bibliography"
    );

    let mut replacements = Replacements::with_capacity(
        found.references.len() + found.repeated_list_spans.len() + 1,
    );
    for reference in &found.references {
        if let Some(html) = rendered.get(reference.raw_text.as_str()) {
            replacements.add(reference.span.clone(), html);
        }
    }
    add_list_spans(&mut replacements, found, list, &rendered_list);
    replacements.apply(content)
}
