//! Citation markers and bibliography rendering for RW.
//!
//! This crate rewrites document content that contains bibliographic
//! reference markers:
//! - `<ref>` tags are replaced with hyperlinked in-text citations
//! - a single `<reflist/>` placeholder is replaced with the rendered bibliography
//! - everything else is preserved byte-for-byte
//!
//! # Architecture
//!
//! - [`finder`]: Lexical scanner producing [`ReferenceMarker`]s and the
//!   optional [`ReferenceListMarker`]
//! - [`style`]: The [`ReferenceStyle`] trait and the built-in [`HarvardStyle`]
//! - [`registry`]: [`StyleRegistry`] mapping style names to implementations
//! - [`processor`]: [`BibliographyProcessor`] orchestrating find, sort, render
//!   and substitution
//!
//! # Example
//!
//! ```
//! use rw_bibliography::BibliographyProcessor;
//!
//! let content = r#"See <ref>Smith2020</ref>. <reflist style="Harvard"/>"#;
//! let output = BibliographyProcessor::new().process(content).unwrap();
//!
//! assert!(output.contains(r##"href="#ref-Smith2020""##));
//! assert!(!output.contains("<ref>"));
//! ```

mod attrs;
mod error;
pub mod finder;
mod marker;
pub mod processor;
pub mod registry;
mod replacements;
pub mod style;

pub use error::BibliographyError;
pub use finder::{FoundReferences, ReferenceFinder};
pub use marker::{ReferenceDetails, ReferenceListMarker, ReferenceMarker};
pub use processor::{BibliographyProcessor, DEFAULT_STYLE, Document};
pub use registry::{StyleRegistry, StyleRegistryBuilder};
pub use style::{HarvardStyle, ReferenceStyle, anchor_id, escape_html};
