//! Concurrent resolution of scanned directives.
//!
//! All requests are issued up front and joined at a single barrier: the result
//! is available only once every request has produced an outcome. Outcomes are
//! returned in directive order, independent of completion order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use pal_directive::Directive;

use crate::{ResolveError, ResolveErrorKind, Resolution, Resolver};

/// Fans out resolution requests for a document's directives.
///
/// # Example
///
/// ```ignore
/// let outcomes = Orchestrator::new(&resolver, "assets")
///     .concurrency(Some(8))
///     .timeout(Some(Duration::from_secs(30)))
///     .resolve_all(&scan.directives)
///     .await;
/// ```
pub struct Orchestrator<'a, R: Resolver + ?Sized> {
    resolver: &'a R,
    /// Contextual root that locators are relative to.
    root: PathBuf,
    /// Maximum requests in flight (unbounded when `None`).
    concurrency: Option<usize>,
    /// Per-request timeout (none when `None`).
    timeout: Option<Duration>,
}

impl<'a, R: Resolver + ?Sized> Orchestrator<'a, R> {
    /// Create an orchestrator resolving locators relative to `root`.
    #[must_use]
    pub fn new(resolver: &'a R, root: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            root: root.into(),
            concurrency: None,
            timeout: None,
        }
    }

    /// Limit the number of requests in flight. `None` or `Some(0)` means unbounded.
    #[must_use]
    pub fn concurrency(mut self, limit: Option<usize>) -> Self {
        self.concurrency = limit.filter(|&n| n > 0);
        self
    }

    /// Fail requests that take longer than `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Contextual root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load path for a directive: the root joined with its locator.
    ///
    /// Locators are always relative to the root, even with a leading `/`.
    #[must_use]
    pub fn load_path(&self, directive: &Directive) -> PathBuf {
        self.root.join(directive.locator.trim_start_matches('/'))
    }

    /// Resolve every directive, returning one outcome per directive in order.
    ///
    /// Relocated results are reduced to the file's base name. A failed request
    /// is recorded and never affects its siblings.
    pub async fn resolve_all(
        &self,
        directives: &[Directive],
    ) -> Vec<Result<Resolution, ResolveError>> {
        if directives.is_empty() {
            return Vec::new();
        }

        let requests = directives.iter().map(|d| self.resolve_one(d));
        let outcomes: Vec<_> = match self.concurrency {
            Some(limit) => stream::iter(requests).buffered(limit).collect().await,
            None => join_all(requests).await,
        };

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        tracing::debug!(
            total = outcomes.len(),
            failed,
            "Resolution requests completed"
        );

        outcomes
    }

    async fn resolve_one(&self, directive: &Directive) -> Result<Resolution, ResolveError> {
        let path = self.load_path(directive);
        tracing::debug!(locator = %directive.locator, path = %path.display(), "Resolving asset");

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.resolver.resolve(&path))
                .await
                .unwrap_or_else(|_| {
                    Err(ResolveError::new(&path, ResolveErrorKind::Timeout(limit)))
                }),
            None => self.resolver.resolve(&path).await,
        };

        if let Err(e) = &outcome {
            tracing::debug!(locator = %directive.locator, error = %e, "Asset resolution failed");
        }

        outcome.map(Resolution::into_base_name)
    }
}
