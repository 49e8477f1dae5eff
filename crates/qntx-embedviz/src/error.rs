//! Error types for embedding diagnostics.

use thiserror::Error;

/// Errors raised by the embedding renderer and the recall estimator.
///
/// Degenerate inputs (a single cluster, empty edge groups) are not errors;
/// they render with reduced content instead.
#[derive(Error, Debug)]
pub enum VizError {
    /// Point counts or dimensions disagree between inputs
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A parameter or option is outside its valid range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The nearest-neighbor search collaborator failed
    #[error("neighbor search error: {0}")]
    Search(String),

    /// The plot backend failed while drawing a recorded figure
    #[error("render error: {0}")]
    Render(String),

    /// Option set could not be parsed
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl VizError {
    pub(crate) fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        VizError::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        VizError::InvalidParameter(msg.into())
    }
}

/// Result type alias using [`VizError`].
pub type Result<T> = std::result::Result<T, VizError>;
