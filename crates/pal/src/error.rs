//! CLI error types.

use pal_config::ConfigError;
use pal_loader::LoaderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Loader(#[from] LoaderError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
