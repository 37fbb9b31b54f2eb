//! Interpretation error types.

use thiserror::Error;

use crate::core::RelativePath;
use crate::schema::ContentType;

/// Errors raised while interpreting a document against its schema.
#[derive(Debug, Error)]
pub enum InterpretError {
    /// The value cannot be parsed as a URI reference. Recoverable per
    /// document: reported, the node keeps its value, the pass continues.
    #[error("`{value}` is not a valid href (in {file})")]
    InvalidHref { value: String, file: RelativePath },

    /// The schema declares a content type incompatible with the runtime
    /// value. A schema-authoring bug; always fatal, never coerced.
    #[error("{path}: content type {content_type:?} requires a string value, found {actual}")]
    TypeContract {
        path: String,
        content_type: ContentType,
        actual: &'static str,
    },

    /// Markup rendering failed. Recoverable per document.
    #[error("markup rendering failed in {file}: {message}")]
    Markup { file: RelativePath, message: String },
}

impl InterpretError {
    /// Whether the walker may report this error and continue with the
    /// node's previous value.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InterpretError::InvalidHref { .. } | InterpretError::Markup { .. }
        )
    }
}
