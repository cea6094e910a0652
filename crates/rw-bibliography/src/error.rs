//! Error types for bibliography processing.

/// Error returned by [`BibliographyProcessor::process`](crate::BibliographyProcessor::process).
///
/// Malformed markers are not errors: the finder leaves them as literal text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BibliographyError {
    /// The requested citation style has no registered implementation.
    #[error("Unknown reference style '{name}' (available: {})", .available.join(", "))]
    UnknownStyle {
        /// Requested style name.
        name: String,
        /// Registered style names, sorted.
        available: Vec<String>,
    },
}
