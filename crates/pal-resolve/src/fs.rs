//! Content-addressed filesystem resolver.
//!
//! Resolves load paths against the local filesystem:
//! - images no larger than the inline limit become base64 data URIs
//! - everything else is copied into the output directory as
//!   `<stem>.<hash>.<ext>`, where `<hash>` is a prefix of the SHA-256 of the
//!   file content

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;

use crate::consts::{DEFAULT_HASH_LENGTH, DEFAULT_INLINE_LIMIT, MAX_HASH_LENGTH};
use crate::hash::{content_hash, hashed_file_name};
use crate::{ResolveError, Resolution, Resolver};

/// Filesystem resolver emitting content-addressed files.
///
/// # Example
///
/// ```ignore
/// let resolver = FsResolver::new("dist/assets")
///     .inline_limit(4096)
///     .hash_length(12);
/// let resolution = resolver.resolve(Path::new("assets/logo.png")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct FsResolver {
    /// Directory receiving relocated files.
    out_dir: PathBuf,
    /// Images up to this many bytes are inlined; 0 disables inlining.
    inline_limit: u64,
    /// Number of hash hex digits in relocated file names.
    hash_length: usize,
}

impl FsResolver {
    /// Create a resolver writing relocated files into `out_dir`.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            inline_limit: DEFAULT_INLINE_LIMIT,
            hash_length: DEFAULT_HASH_LENGTH,
        }
    }

    /// Set the size limit for inlining images (0 disables inlining).
    #[must_use]
    pub fn inline_limit(mut self, limit: u64) -> Self {
        self.inline_limit = limit;
        self
    }

    /// Set the number of hash hex digits in relocated names (1 to 64).
    #[must_use]
    pub fn hash_length(mut self, length: usize) -> Self {
        self.hash_length = length.clamp(1, MAX_HASH_LENGTH);
        self
    }

    /// MIME type to inline `path` with, if it qualifies.
    fn inline_mime(&self, path: &Path, size: u64) -> Option<String> {
        if self.inline_limit == 0 || size > self.inline_limit {
            return None;
        }
        let mime = mime_guess::from_path(path).first()?;
        (mime.type_().as_str() == "image").then(|| mime.essence_str().to_owned())
    }

    /// Write `data` to `target` unless it already exists.
    ///
    /// The name is derived from the content, so an existing file is identical.
    async fn emit(&self, target: &Path, data: &[u8]) -> std::io::Result<()> {
        if tokio::fs::try_exists(target).await? {
            return Ok(());
        }
        tokio::fs::create_dir_all(&self.out_dir).await?;
        tokio::fs::write(target, data).await
    }
}

#[async_trait]
impl Resolver for FsResolver {
    async fn resolve(&self, path: &Path) -> Result<Resolution, ResolveError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ResolveError::from_io(path, &e))?;
        let size = u64::try_from(data.len()).unwrap_or(u64::MAX);

        if let Some(mime) = self.inline_mime(path, size) {
            tracing::debug!(path = %path.display(), size, "Inlining asset");
            let payload = BASE64_STANDARD.encode(&data);
            return Ok(Resolution::Inline(format!("data:{mime};base64,{payload}")));
        }

        let hash = content_hash(&data);
        let name = hashed_file_name(path, &hash[..self.hash_length]);
        let target = self.out_dir.join(name);

        self.emit(&target, &data)
            .await
            .map_err(|e| ResolveError::from_io(&target, &e))?;
        tracing::debug!(path = %path.display(), target = %target.display(), "Relocated asset");

        Ok(Resolution::Relocated(target.to_string_lossy().into_owned()))
    }
}
