//! Mock resolver implementation for testing.
//!
//! Provides [`MockResolver`] for exercising the pipeline without touching the
//! filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::{ResolveError, ResolveErrorKind, Resolution, Resolver};

/// Canned outcome for one load path.
#[derive(Debug, Clone)]
enum MockOutcome {
    Resolved(Resolution),
    Failed(String),
}

/// Mock resolver for testing.
///
/// Serves configured outcomes per load path; unknown paths fail with
/// [`ResolveErrorKind::NotFound`]. Records every requested path and the
/// highest number of requests in flight at once.
///
/// # Example
///
/// ```ignore
/// use pal_resolve::MockResolver;
///
/// let resolver = MockResolver::new()
///     .with_relocated("assets/logo.png", "logo.a1b2.png")
///     .with_inline("assets/dot.png", "data:image/png;base64,AA")
///     .with_failure("assets/broken.png", "corrupt file");
/// ```
#[derive(Debug, Default)]
pub struct MockResolver {
    outcomes: HashMap<PathBuf, MockOutcome>,
    delays: HashMap<PathBuf, Duration>,
    calls: Mutex<Vec<PathBuf>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockResolver {
    /// Create a new empty mock resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `path` to a relocated file.
    #[must_use]
    pub fn with_relocated(mut self, path: impl Into<PathBuf>, value: impl Into<String>) -> Self {
        self.outcomes.insert(
            path.into(),
            MockOutcome::Resolved(Resolution::Relocated(value.into())),
        );
        self
    }

    /// Resolve `path` to an inlined representation.
    #[must_use]
    pub fn with_inline(mut self, path: impl Into<PathBuf>, value: impl Into<String>) -> Self {
        self.outcomes.insert(
            path.into(),
            MockOutcome::Resolved(Resolution::Inline(value.into())),
        );
        self
    }

    /// Fail `path` with [`ResolveErrorKind::Rejected`].
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        self.outcomes
            .insert(path.into(), MockOutcome::Failed(message.into()));
        self
    }

    /// Delay the response for `path`.
    #[must_use]
    pub fn with_delay(mut self, path: impl Into<PathBuf>, delay: Duration) -> Self {
        self.delays.insert(path.into(), delay);
        self
    }

    /// Paths requested so far, in request order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of requests observed in flight at the same time.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Tracks one in-flight request; released on drop so timed-out requests count too.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(resolver: &'a MockResolver) -> Self {
        let current = resolver.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        resolver.max_in_flight.fetch_max(current, Ordering::SeqCst);
        Self(&resolver.in_flight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Resolver for MockResolver {
    async fn resolve(&self, path: &Path) -> Result<Resolution, ResolveError> {
        let _in_flight = InFlight::enter(self);
        self.calls.lock().unwrap().push(path.to_path_buf());

        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }

        match self.outcomes.get(path) {
            Some(MockOutcome::Resolved(resolution)) => Ok(resolution.clone()),
            Some(MockOutcome::Failed(message)) => Err(ResolveError::new(
                path,
                ResolveErrorKind::Rejected(message.clone()),
            )),
            None => Err(ResolveError::new(path, ResolveErrorKind::NotFound)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_configured_outcomes() {
        let resolver = MockResolver::new()
            .with_relocated("a.png", "a.1.png")
            .with_inline("b.png", "data:image/png;base64,AA")
            .with_failure("c.png", "boom");

        assert_eq!(
            resolver.resolve(Path::new("a.png")).await.unwrap(),
            Resolution::Relocated("a.1.png".to_owned())
        );
        assert!(resolver.resolve(Path::new("b.png")).await.unwrap().is_inline());
        assert_eq!(
            resolver.resolve(Path::new("c.png")).await.unwrap_err().kind,
            ResolveErrorKind::Rejected("boom".to_owned())
        );
        assert_eq!(
            resolver.resolve(Path::new("d.png")).await.unwrap_err().kind,
            ResolveErrorKind::NotFound
        );
        assert_eq!(resolver.calls().len(), 4);
        assert_eq!(resolver.max_in_flight(), 1);
    }
}
