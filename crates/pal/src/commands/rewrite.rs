//! `pal rewrite` command implementation.

use std::path::PathBuf;

use clap::Args;
use pal_config::{CliSettings, Config, UnresolvedPolicy};
use pal_loader::{AssetLoader, LoaderOptions};
use pal_resolve::FsResolver;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the rewrite command.
#[derive(Args)]
pub(crate) struct RewriteArgs {
    /// Document to rewrite.
    input: PathBuf,

    /// Write the rewritten document here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover pal.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory asset locators are relative to (overrides config).
    #[arg(long, env = "PAL_ROOT")]
    root: Option<PathBuf>,

    /// Prefix for relocated asset names (overrides config).
    #[arg(long)]
    output_path: Option<String>,

    /// Directive function name (overrides config).
    #[arg(long)]
    func_name: Option<String>,

    /// Directory relocated assets are written to (overrides config).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Leave unresolved directives unchanged instead of failing.
    #[arg(long)]
    keep_unresolved: bool,

    /// Enable verbose output (log every resolved directive).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RewriteArgs {
    /// Execute the rewrite command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the input cannot be read,
    /// or a directive cannot be resolved.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            root: self.root,
            output_path: self.output_path,
            func_name: self.func_name,
            out_dir: self.out_dir,
            on_unresolved: self.keep_unresolved.then_some(UnresolvedPolicy::Keep),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let options = LoaderOptions::from_config(&config)?;

        let resolve = &config.resolve_resolved;
        let resolver = FsResolver::new(&resolve.out_dir)
            .inline_limit(resolve.inline_limit)
            .hash_length(resolve.hash_length);
        tracing::debug!(
            root = %options.root().display(),
            out_dir = %resolve.out_dir.display(),
            "Rewriting {}",
            self.input.display()
        );

        let text = std::fs::read_to_string(&self.input)?;
        let loader = AssetLoader::new(resolver, options);
        let rewritten = loader.load(&text).await?;

        match self.output {
            Some(path) => {
                std::fs::write(&path, rewritten)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => output.document(&rewritten)?,
        }

        Ok(())
    }
}
