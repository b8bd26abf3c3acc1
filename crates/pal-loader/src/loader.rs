//! Asset reference rewriting pipeline.
//!
//! One run scans the document, resolves every directive concurrently, and
//! applies all replacements and escape removals by source span in a single
//! pass over the original text.

use pal_config::UnresolvedPolicy;
use pal_directive::{Rewrite, Scan, Scanner};
use pal_resolve::{Orchestrator, Resolver};

use crate::error::{LoaderError, UnresolvedDirective};
use crate::options::LoaderOptions;
use crate::replacement::replacement_text;

/// Rewrites asset directives in a document into resolved references.
///
/// # Example
///
/// ```ignore
/// use pal_loader::{AssetLoader, LoaderOptions};
/// use pal_resolve::FsResolver;
///
/// let loader = AssetLoader::new(
///     FsResolver::new("dist/assets"),
///     LoaderOptions::new("assets").output_path("/static"),
/// );
/// let output = loader.load("img(src=pal('logo.png'))").await?;
/// ```
pub struct AssetLoader<R: Resolver> {
    resolver: R,
    options: LoaderOptions,
    scanner: Scanner,
}

impl<R: Resolver> AssetLoader<R> {
    /// Create a loader resolving directives with `resolver`.
    #[must_use]
    pub fn new(resolver: R, options: LoaderOptions) -> Self {
        let scanner = Scanner::new(options.name());
        Self {
            resolver,
            options,
            scanner,
        }
    }

    #[must_use]
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Scan `text` for directives and escaped occurrences without resolving.
    #[must_use]
    pub fn scan(&self, text: &str) -> Scan {
        self.scanner.scan(text)
    }

    /// Rewrite every directive in `text`.
    ///
    /// Escaped occurrences lose their backslash. With the `error` policy any
    /// failed resolution fails the run, listing every failed directive; with
    /// `keep` failed directives are left unchanged. Either way a failure never
    /// prevents the other directives from being replaced.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::Unresolved` if a directive could not be resolved
    /// under the `error` policy. The error carries the rewritten document with
    /// the failed directives left verbatim.
    pub async fn load(&self, text: &str) -> Result<String, LoaderError> {
        let scan = self.scan(text);
        if scan.is_empty() {
            tracing::debug!("No asset directives found");
            return Ok(text.to_owned());
        }

        let outcomes = Orchestrator::new(&self.resolver, self.options.root())
            .concurrency(self.options.concurrency_limit())
            .timeout(self.options.request_timeout())
            .resolve_all(&scan.directives)
            .await;

        let mut rewrite = Rewrite::with_capacity(scan.directives.len() + scan.escapes.len());
        for &offset in &scan.escapes {
            rewrite.remove(offset..offset + 1);
        }

        let mut failures = Vec::new();
        let mut kept = 0;
        for (directive, outcome) in scan.directives.iter().zip(outcomes) {
            match outcome {
                Ok(resolution) => {
                    let replacement =
                        replacement_text(directive, &resolution, self.options.output_prefix());
                    tracing::debug!(
                        statement = %directive.raw_statement,
                        %replacement,
                        "Resolved asset directive"
                    );
                    rewrite.replace(directive.span.clone(), replacement);
                }
                Err(error) => match self.options.policy() {
                    UnresolvedPolicy::Error => failures.push(UnresolvedDirective {
                        locator: directive.locator.clone(),
                        offset: directive.offset(),
                        error,
                    }),
                    UnresolvedPolicy::Keep => {
                        tracing::warn!(
                            statement = %directive.raw_statement,
                            offset = directive.offset(),
                            error = %error,
                            "Leaving unresolved asset directive unchanged"
                        );
                        kept += 1;
                    }
                },
            }
        }

        let output = rewrite.apply(text);
        if !failures.is_empty() {
            return Err(LoaderError::Unresolved { output, failures });
        }

        tracing::info!(
            directives = scan.directives.len(),
            kept,
            escapes = scan.escapes.len(),
            "Rewrote asset directives"
        );

        Ok(output)
    }
}
