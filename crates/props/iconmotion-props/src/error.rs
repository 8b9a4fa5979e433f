//! Error types for property discovery and rewriting.

use crate::descriptor::PropertyKind;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PropsError {
    /// Color token is not a hex color or a known CSS color name.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Path text could not be parsed.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Path does not resolve inside the store.
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// Input shape cannot be written to a descriptor of this kind.
    #[error("cannot write {input} to a {kind:?} property")]
    MismatchedInput { kind: PropertyKind, input: String },

    /// Required argument absent.
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// Malformed `name:value` list.
    #[error("invalid palette entry: {0}")]
    InvalidPalette(String),
}
