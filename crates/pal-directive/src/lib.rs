//! Asset directive scanning for PAL.
//!
//! Documents reference assets through calls of the form `pal(path)`. This crate
//! finds those calls and rewrites the document once replacements are known:
//!
//! - [`Scanner`] walks the text and produces a [`Scan`]: the recognized
//!   [`Directive`]s in document order plus the escape markers (`\pal(...)`)
//!   that must be dropped from the output.
//! - [`Rewrite`] collects span-based edits against the original text and
//!   applies them in a single pass.
//!
//! # Example
//!
//! ```
//! use pal_directive::{Rewrite, Scanner};
//!
//! let text = "img(src=pal('images/logo.png'))";
//! let scan = Scanner::new("pal").scan(text);
//! assert_eq!(scan.directives[0].locator, "images/logo.png");
//!
//! let mut rewrite = Rewrite::new();
//! rewrite.replace(scan.directives[0].span.clone(), "images/logo.a1b2.png");
//! assert_eq!(rewrite.apply(text), "img(src=images/logo.a1b2.png)");
//! ```

mod directive;
mod rewrite;
mod scanner;

pub use directive::Directive;
pub use rewrite::Rewrite;
pub use scanner::{DEFAULT_FUNC_NAME, Scan, Scanner};
