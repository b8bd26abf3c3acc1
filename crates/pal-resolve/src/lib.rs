//! Asset resolution for PAL.
//!
//! Turns scanned directives into resolved references:
//! - [`Resolver`] is the seam to the resolution service: given a load path it
//!   returns a [`Resolution`] (`Inline` data or a `Relocated` file) or fails.
//! - [`Orchestrator`] issues one request per directive, all concurrently, and
//!   waits for every outcome. A failure never cancels sibling requests.
//! - [`FsResolver`] is a content-addressed filesystem resolver: small images
//!   become data URIs, everything else is copied under a hashed name.
//! - [`MockResolver`] (feature `mock`) serves canned outcomes for tests.
//!
//! # Example
//!
//! ```ignore
//! use pal_directive::Scanner;
//! use pal_resolve::{FsResolver, Orchestrator};
//!
//! let scan = Scanner::default().scan(&source);
//! let resolver = FsResolver::new("dist/assets");
//! let outcomes = Orchestrator::new(&resolver, "assets")
//!     .resolve_all(&scan.directives)
//!     .await;
//! ```

mod consts;
mod error;
mod fs;
mod hash;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod orchestrator;
mod resolution;
mod resolver;

pub use consts::{DEFAULT_HASH_LENGTH, DEFAULT_INLINE_LIMIT, MAX_HASH_LENGTH};
pub use error::{ResolveError, ResolveErrorKind};
pub use fs::FsResolver;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockResolver;
pub use orchestrator::Orchestrator;
pub use resolution::{INLINE_MARKER, Resolution};
pub use resolver::Resolver;
