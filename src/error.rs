//! Error types for the inlining pass.
//!
//! Only [`InlineError::Read`] and [`InlineError::Optimize`] abort a pass.
//! A malformed reference is reported and skipped.

use std::path::PathBuf;

use thiserror::Error;

use crate::html::Span;

// ============================================================================
// InlineError
// ============================================================================

/// Errors raised while inlining one document.
#[derive(Debug, Error)]
pub enum InlineError {
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to optimize `{path}`")]
    Optimize {
        path: PathBuf,
        #[source]
        source: OptimizeError,
    },

    #[error("<image inline> at {span} has no usable svg source")]
    MalformedReference { span: Span },

    #[error("failed to parse HTML: {0}")]
    Parse(String),

    /// A span from a stale tree applied to a newer string.
    #[error("span {span} is out of bounds for a document of {len} bytes")]
    InvalidSpan { span: Span, len: usize },
}

impl InlineError {
    /// Whether this error aborts the whole pass.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MalformedReference { .. })
    }
}

// ============================================================================
// OptimizeError
// ============================================================================

/// Errors reported by an optimizer backend.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("invalid svg")]
    Parse(#[from] usvg::Error),

    #[error("invalid value for option `{name}`: {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("optimizer task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl OptimizeError {
    pub fn invalid_option(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
