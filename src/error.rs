//! Error taxonomy for scene document handling.

use thiserror::Error;

/// Errors produced while ingesting or loading scene documents.
///
/// All variants are recovered at the call boundary: a failing import or
/// apply discards the parsed candidate and the prior config stays live.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document text failed to parse, or its top level is not a mapping.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Strict apply only: the document text omits one of the required
    /// top-level keys (`background`, `lighting`, `objects`).
    #[error("missing required keys: {}", .0.join(", "))]
    MissingRequiredKeys(Vec<String>),

    /// A startup scene resource could not be read.
    #[error("failed to load scene resource: {0}")]
    ResourceFetch(String),
}
