//! Recognized directive invocations.

use std::ops::Range;

/// One recognized `name(locator)` call.
///
/// Created by the [`Scanner`](crate::Scanner) and never mutated afterwards.
/// Two directives may share the same `raw_statement`; the `span` tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Directive {
    /// Exact source text from the function name through the closing parenthesis.
    pub raw_statement: String,
    /// Argument with surrounding quotes removed (may be empty).
    pub locator: String,
    /// Byte range of `raw_statement` in the original text.
    pub span: Range<usize>,
}

impl Directive {
    /// Byte offset of the function name token in the original text.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.span.start
    }

    /// Final path segment of the locator (the file name).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.locator
            .rsplit_once('/')
            .map_or(self.locator.as_str(), |(_, name)| name)
    }

    /// Locator with its final path segment replaced by `file_name`.
    ///
    /// `images/logo.png` with `logo.a1b2.png` becomes `images/logo.a1b2.png`;
    /// a locator without a directory yields `file_name` unchanged.
    #[must_use]
    pub fn with_file_name(&self, file_name: &str) -> String {
        match self.locator.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/{file_name}"),
            None => file_name.to_owned(),
        }
    }
}
