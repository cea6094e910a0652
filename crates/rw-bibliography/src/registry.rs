//! Style lookup by name.
//!
//! A [`StyleRegistry`] is built once and never mutated afterwards, so a shared
//! reference can be used from any number of threads. [`StyleRegistry::global`]
//! holds the built-in styles; hosts that add their own styles build a
//! separate registry with [`StyleRegistry::builder`].

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::error::BibliographyError;
use crate::style::{HarvardStyle, ReferenceStyle};

static GLOBAL: LazyLock<StyleRegistry> =
    LazyLock::new(|| StyleRegistry::builder().with_builtin_styles().build());

/// Immutable mapping from style name to [`ReferenceStyle`].
///
/// # Example
///
/// ```
/// use rw_bibliography::StyleRegistry;
///
/// let style = StyleRegistry::global().get("Harvard").unwrap();
/// assert_eq!(style.name(), "Harvard");
/// assert!(StyleRegistry::global().get("harvard").is_err());
/// ```
pub struct StyleRegistry {
    styles: HashMap<String, Arc<dyn ReferenceStyle>>,
}

impl StyleRegistry {
    /// Process-wide registry containing the built-in styles.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Start building a custom registry.
    #[must_use]
    pub fn builder() -> StyleRegistryBuilder {
        StyleRegistryBuilder::default()
    }

    /// Look up a style by its case-sensitive name.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::UnknownStyle`] if no style is registered
    /// under `name`.
    pub fn get(&self, name: &str) -> Result<&dyn ReferenceStyle, BibliographyError> {
        self.styles
            .get(name)
            .map(|style| &**style)
            .ok_or_else(|| BibliographyError::UnknownStyle {
                name: name.to_owned(),
                available: self.names(),
            })
    }

    /// Registered style names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.styles.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("styles", &self.names())
            .finish()
    }
}

/// Builder for a [`StyleRegistry`].
#[derive(Default)]
pub struct StyleRegistryBuilder {
    styles: HashMap<String, Arc<dyn ReferenceStyle>>,
}

impl StyleRegistryBuilder {
    /// Register the styles shipped with this crate.
    #[must_use]
    pub fn with_builtin_styles(self) -> Self {
        self.register(HarvardStyle)
    }

    /// Register a style under its [`name`](ReferenceStyle::name).
    ///
    /// A later registration with the same name replaces the earlier one.
    #[must_use]
    pub fn register(mut self, style: impl ReferenceStyle + 'static) -> Self {
        self.styles.insert(style.name().to_owned(), Arc::new(style));
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> StyleRegistry {
        StyleRegistry {
            styles: self.styles,
        }
    }
}
