//! Loader error types.

use std::fmt::Write as _;

use pal_resolve::ResolveError;

/// A directive whose resolution failed.
#[derive(Debug, thiserror::Error)]
#[error("{locator:?} at byte {offset}: {error}")]
pub struct UnresolvedDirective {
    /// Locator as written in the document.
    pub locator: String,
    /// Byte offset of the directive in the document.
    pub offset: usize,
    /// Underlying resolution error.
    #[source]
    pub error: ResolveError,
}

/// Loader error.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// One or more directives could not be resolved.
    ///
    /// `output` is the document with every resolved directive replaced and the
    /// failed ones left verbatim.
    #[error("{} asset reference(s) could not be resolved:{}", .failures.len(), list(.failures))]
    Unresolved {
        /// Partially rewritten document.
        output: String,
        /// Failed directives, in document order.
        failures: Vec<UnresolvedDirective>,
    },
}

impl LoaderError {
    /// Failed directives, in document order.
    #[must_use]
    pub fn unresolved(&self) -> &[UnresolvedDirective] {
        match self {
            Self::Unresolved { failures, .. } => failures,
        }
    }

    /// Document with the resolved directives replaced.
    #[must_use]
    pub fn partial_output(&self) -> &str {
        match self {
            Self::Unresolved { output, .. } => output,
        }
    }
}

fn list(failures: &[UnresolvedDirective]) -> String {
    failures.iter().fold(String::new(), |mut out, failure| {
        let _ = write!(out, "\n  - {failure}");
        out
    })
}
