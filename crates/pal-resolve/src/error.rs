//! Resolution error types.

use std::path::PathBuf;
use std::time::Duration;

/// Single asset resolution error.
#[derive(Debug, thiserror::Error)]
#[error("{}: {kind}", .path.display())]
pub struct ResolveError {
    /// Load path that failed to resolve.
    pub path: PathBuf,
    /// Failure category.
    pub kind: ResolveErrorKind,
}

/// Kind of asset resolution error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveErrorKind {
    #[error("file not found")]
    NotFound,
    #[error("I/O error: {0}")]
    Io(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("resolver returned no result")]
    Empty,
    #[error("rejected: {0}")]
    Rejected(String),
}

impl ResolveError {
    /// Create a new resolution error for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: ResolveErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Map an I/O error, distinguishing missing files.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::NotFound => ResolveErrorKind::NotFound,
            _ => ResolveErrorKind::Io(error.to_string()),
        };
        Self::new(path, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path_and_kind() {
        let err = ResolveError::new("assets/logo.png", ResolveErrorKind::NotFound);
        assert_eq!(err.to_string(), "assets/logo.png: file not found");
    }

    #[test]
    fn test_from_io_not_found() {
        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = ResolveError::from_io("a.png", &io);
        assert_eq!(err.kind, ResolveErrorKind::NotFound);
    }

    #[test]
    fn test_from_io_other() {
        let io = std::io::Error::other("disk on fire");
        let err = ResolveError::from_io("a.png", &io);
        assert_eq!(err.kind, ResolveErrorKind::Io("disk on fire".to_owned()));
    }

    #[test]
    fn test_timeout_display() {
        let err = ResolveError::new("a.png", ResolveErrorKind::Timeout(Duration::from_secs(2)));
        assert_eq!(err.to_string(), "a.png: timed out after 2s");
    }
}
