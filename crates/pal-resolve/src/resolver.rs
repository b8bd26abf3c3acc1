//! Resolution service trait.

use std::path::Path;

use async_trait::async_trait;

use crate::{ResolveError, Resolution};

/// Resolves one asset load path.
///
/// Implementations must not block the calling task: the orchestrator runs all
/// requests of a document concurrently on a single task.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve the asset at `path`.
    async fn resolve(&self, path: &Path) -> Result<Resolution, ResolveError>;
}
