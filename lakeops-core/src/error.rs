//! Validation errors for the core domain

use thiserror::Error;

/// Errors raised while constructing a selector.
///
/// All variants are detected before any remote call is made.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// The name pattern did not compile.
    #[error("invalid regex expression: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A tag filter was not of the form `key=value`.
    #[error("invalid tag selector '{0}' (expected key=value)")]
    InvalidTag(String),

    /// Neither a name pattern nor a tag filter was supplied.
    #[error("at least one selector is required (--name or --tag)")]
    Empty,
}
