//! Per-run loader options.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pal_config::{Config, ConfigError, UnresolvedPolicy};
use pal_directive::DEFAULT_FUNC_NAME;

/// Immutable options for one loader run.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    root: PathBuf,
    output_path: Option<String>,
    func_name: String,
    on_unresolved: UnresolvedPolicy,
    concurrency: Option<usize>,
    timeout: Option<Duration>,
}

impl LoaderOptions {
    /// Options resolving locators relative to `root`, with defaults elsewhere.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_path: None,
            func_name: DEFAULT_FUNC_NAME.to_owned(),
            on_unresolved: UnresolvedPolicy::default(),
            concurrency: None,
            timeout: None,
        }
    }

    /// Build options from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no root is configured.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let loader = &config.loader_resolved;
        let mut options = Self::new(config.require_root()?)
            .func_name(loader.func_name.clone())
            .on_unresolved(loader.on_unresolved)
            .concurrency(config.resolve_resolved.concurrency)
            .timeout(config.resolve_resolved.timeout);
        if let Some(prefix) = &loader.output_path {
            options = options.output_path(prefix.clone());
        }
        Ok(options)
    }

    /// Prefix for relocated file names. A trailing `/` is added if missing;
    /// an empty prefix clears it.
    #[must_use]
    pub fn output_path(mut self, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if prefix.is_empty() {
            self.output_path = None;
            return self;
        }
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.output_path = Some(prefix);
        self
    }

    /// Directive function name. An empty name keeps the default.
    #[must_use]
    pub fn func_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.func_name = name;
        }
        self
    }

    /// Policy for directives whose resolution failed.
    #[must_use]
    pub fn on_unresolved(mut self, policy: UnresolvedPolicy) -> Self {
        self.on_unresolved = policy;
        self
    }

    /// Maximum resolution requests in flight.
    #[must_use]
    pub fn concurrency(mut self, limit: Option<usize>) -> Self {
        self.concurrency = limit;
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn output_prefix(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.func_name
    }

    #[must_use]
    pub fn policy(&self) -> UnresolvedPolicy {
        self.on_unresolved
    }

    #[must_use]
    pub fn concurrency_limit(&self) -> Option<usize> {
        self.concurrency
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
