//! Asset reference rewriting for PAL.
//!
//! [`AssetLoader`] ties the pipeline together: scan the document for
//! `pal(path)` directives, resolve them concurrently through a
//! [`Resolver`](pal_resolve::Resolver), and substitute the results by source
//! span. The run completes exactly once with the rewritten text or a
//! [`LoaderError`] listing every directive that failed.

mod error;
mod loader;
mod options;
mod replacement;

pub use error::{LoaderError, UnresolvedDirective};
pub use loader::AssetLoader;
pub use options::LoaderOptions;
pub use pal_config::UnresolvedPolicy;
